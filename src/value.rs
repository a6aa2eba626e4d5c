use std::ops::Deref;

use crate::prelude::*;

/// A typed value carried as a command argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Int(i64),
	Float(f64),
	Bool(bool),
	Char(u8),
	Str(String),
}

impl Value {
	pub fn kind(&self) -> ArgKind {
		match self {
			Value::Int(_) => ArgKind::Int,
			Value::Float(_) => ArgKind::Float,
			Value::Bool(_) => ArgKind::Bool,
			Value::Char(_) => ArgKind::Char,
			Value::Str(_) => ArgKind::Str,
		}
	}
	/// Render the value as a single process argument
	pub fn to_arg(&self) -> OsString {
		match self {
			Value::Int(n) => n.to_string().into(),
			Value::Float(x) => fmt_fixed(*x).into(),
			Value::Bool(true) => "true".into(),
			Value::Bool(false) => "false".into(),
			Value::Char(byte) => OsString::from_vec(vec![*byte]),
			Value::Str(s) => s.into(),
		}
	}
}

/// Fixed point with six fractional digits, the way `%f` prints it
fn fmt_fixed(x: f64) -> String {
	if x.is_nan() {
		"nan".into()
	} else if x.is_infinite() {
		if x.is_sign_negative() { "-inf".into() } else { "inf".into() }
	} else {
		format!("{x:.6}")
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Value::Int(n)
	}
}

impl From<f64> for Value {
	fn from(x: f64) -> Self {
		Value::Float(x)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<u8> for Value {
	fn from(byte: u8) -> Self {
		Value::Char(byte)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

/// Kind tags as emitted by code generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArgKind {
	Int = 0,
	Float = 1,
	Bool = 2,
	Char = 3,
	Str = 4,
}

impl ArgKind {
	pub fn from_tag(tag: u8) -> Option<Self> {
		match tag {
			0 => Some(ArgKind::Int),
			1 => Some(ArgKind::Float),
			2 => Some(ArgKind::Bool),
			3 => Some(ArgKind::Char),
			4 => Some(ArgKind::Str),
			_ => None,
		}
	}
	pub fn tag(self) -> u8 {
		self as u8
	}
}

/// Untyped payload handed over alongside a kind tag
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
	Int(i64),
	Float(f64),
	Byte(u8),
	Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
	Typed(Value),
	/// A tag that names none of the known kinds, or a payload that does not fit its tag
	Unrecognized { tag: u8 },
}

impl Arg {
	pub fn from_raw(tag: u8, payload: RawPayload) -> Self {
		let Some(kind) = ArgKind::from_tag(tag) else {
			return Arg::Unrecognized { tag };
		};
		let value = match (kind, payload) {
			(ArgKind::Int, RawPayload::Int(n)) => Value::Int(n),
			(ArgKind::Float, RawPayload::Float(x)) => Value::Float(x),
			// Only the low bit counts
			(ArgKind::Bool, RawPayload::Int(n)) => Value::Bool(n & 1 == 1),
			(ArgKind::Char, RawPayload::Byte(b)) => Value::Char(b),
			(ArgKind::Str, RawPayload::Text(s)) => Value::Str(s),
			_ => return Arg::Unrecognized { tag },
		};
		Arg::Typed(value)
	}
}

macro_rules! typed_arg_from {
	($($ty:ty),+ $(,)?) => {
		$(
			impl From<$ty> for Arg {
				fn from(value: $ty) -> Self {
					Arg::Typed(value.into())
				}
			}
		)+
	};
}
typed_arg_from!(Value, i64, f64, bool, u8, &str, String);

/// Ordered command arguments; insertion order is argv order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgList(Vec<Arg>);

impl ArgList {
	pub fn new() -> Self {
		Self(vec![])
	}
	pub fn push(&mut self, arg: impl Into<Arg>) {
		self.0.push(arg.into())
	}
	pub fn push_raw(&mut self, tag: u8, payload: RawPayload) {
		self.0.push(Arg::from_raw(tag, payload))
	}
	pub fn with(mut self, arg: impl Into<Arg>) -> Self {
		self.push(arg);
		self
	}
}

impl Deref for ArgList {
	type Target = [Arg];
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<A: Into<Arg>> FromIterator<A> for ArgList {
	fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}
