use std::fmt::Display;

use crate::{
	libsh::term::{Style, Styled},
	prelude::*,
};

pub type ShResult<T> = Result<T, ShErr>;

pub trait ShResultExt {
	fn note(self, note: impl Into<String>) -> Self;
}

impl<T> ShResultExt for Result<T, ShErr> {
	/// Attach a note to an error
	fn note(self, note: impl Into<String>) -> Self {
		self.map_err(|e| e.with_note(note))
	}
}

#[derive(Debug)]
pub struct ShErr {
	kind: ShErrKind,
	notes: Vec<String>,
}

impl ShErr {
	pub fn new(kind: ShErrKind) -> Self {
		Self { kind, notes: vec![] }
	}
	pub fn simple(kind: ShErrKind, msg: impl Into<String>) -> Self {
		Self { kind, notes: vec![msg.into()] }
	}
	pub fn kind(&self) -> &ShErrKind {
		&self.kind
	}
	pub fn notes(&self) -> &[String] {
		&self.notes
	}
	pub fn with_note(self, note: impl Into<String>) -> Self {
		let ShErr { kind, mut notes } = self;
		notes.push(note.into());
		Self { kind, notes }
	}
	/// Fatal errors unwind the whole evaluation. Everything else is attached
	/// to the output of the stage that produced it.
	pub fn is_fatal(&self) -> bool {
		!matches!(self.kind, ShErrKind::SpawnFailed(_))
	}
	pub fn print_error(&self) {
		let error = "error".styled(Style::Red | Style::Bold);
		eprintln!("{error}: {}", self.kind);
		for note in &self.notes {
			let label = "note".styled(Style::Green);
			eprintln!("  {label}: {note}");
		}
	}
}

impl Display for ShErr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.notes.first() {
			None => write!(f, "{}", self.kind),
			Some(note) => write!(f, "{} - {}", self.kind, note),
		}
	}
}

impl std::error::Error for ShErr {}

impl From<std::io::Error> for ShErr {
	fn from(e: std::io::Error) -> Self {
		ShErr::simple(ShErrKind::IoErr(e.kind()), e.to_string())
	}
}

impl From<Errno> for ShErr {
	fn from(value: Errno) -> Self {
		ShErr::simple(ShErrKind::Errno(value), value.desc())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShErrKind {
	IoErr(io::ErrorKind),
	Errno(Errno),
	/// An argument kind that code generation should never have produced
	ConfigErr,
	/// The program could not be exec'd at all
	SpawnFailed(Errno),
	RelayErr,
	Timeout,
	SyntaxErr,
	InternalErr,
}

impl Display for ShErrKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let output = match self {
			Self::IoErr(e) => &format!("I/O Error: {e}"),
			Self::Errno(e) => &format!("Errno: {}", e.desc()),
			Self::ConfigErr => "Unrecognized argument kind",
			Self::SpawnFailed(e) => &format!("Failed to spawn: {}", e.desc()),
			Self::RelayErr => "Relay I/O Error",
			Self::Timeout => "Deadline exceeded",
			Self::SyntaxErr => "Syntax Error",
			Self::InternalErr => "Internal Error",
		};
		write!(f, "{output}")
	}
}
