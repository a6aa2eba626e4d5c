use std::fmt::Display;

use crate::{jobs::ExitStatus, prelude::*};

/// Default capture capacity in bytes
pub const CAPTURE_CAP: usize = 16 * 1024;

/// Something that went wrong in a stage without aborting the evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
	SpawnFailed { cmd: String, errno: Errno },
	NonzeroExit { cmd: String, status: ExitStatus },
}

impl Display for Fault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Fault::SpawnFailed { cmd, errno } => write!(f, "{cmd}: failed to spawn: {}", errno.desc()),
			Fault::NonzeroExit { cmd, status } => write!(f, "{cmd}: {status}"),
		}
	}
}

/// Bounded stdout capture of one stage or one subtree.
///
/// Bytes past `cap` are dropped and `truncated` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedOutput {
	bytes: Vec<u8>,
	cap: usize,
	truncated: bool,
	status: Option<ExitStatus>,
	faults: Vec<Fault>,
}

impl CapturedOutput {
	pub fn new(cap: usize) -> Self {
		Self { bytes: vec![], cap, truncated: false, status: None, faults: vec![] }
	}
	pub fn from_bytes(bytes: &[u8], cap: usize) -> Self {
		let mut new = Self::new(cap);
		new.append(bytes);
		new
	}
	/// Append as much of `bytes` as fits. Returns the number of bytes kept.
	pub fn append(&mut self, bytes: &[u8]) -> usize {
		let room = self.cap.saturating_sub(self.bytes.len());
		let keep = bytes.len().min(room);
		self.bytes.extend_from_slice(&bytes[..keep]);
		if keep < bytes.len() {
			self.truncated = true;
		}
		keep
	}
	/// Byte-for-byte concatenation of `other` onto `self`.
	///
	/// The status becomes `other`'s, faults are kept in order.
	pub fn concat(&mut self, other: CapturedOutput) {
		let CapturedOutput { bytes, truncated, status, faults, .. } = other;
		self.append(&bytes);
		self.truncated |= truncated;
		self.status = status;
		self.faults.extend(faults);
	}
	/// Put `earlier` faults in front of this output's own
	pub fn prepend_faults(&mut self, earlier: Vec<Fault>) {
		let later = std::mem::replace(&mut self.faults, earlier);
		self.faults.extend(later);
	}
	pub fn push_fault(&mut self, fault: Fault) {
		self.faults.push(fault)
	}
	pub fn take_faults(&mut self) -> Vec<Fault> {
		std::mem::take(&mut self.faults)
	}
	pub fn set_status(&mut self, status: Option<ExitStatus>) {
		self.status = status
	}
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
	pub fn len(&self) -> usize {
		self.bytes.len()
	}
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}
	pub fn cap(&self) -> usize {
		self.cap
	}
	pub fn is_full(&self) -> bool {
		self.bytes.len() >= self.cap
	}
	pub fn is_truncated(&self) -> bool {
		self.truncated
	}
	/// Exit status of the last stage, `None` if it never spawned
	pub fn status(&self) -> Option<ExitStatus> {
		self.status
	}
	pub fn faults(&self) -> &[Fault] {
		&self.faults
	}
	pub fn to_string_lossy(&self) -> String {
		String::from_utf8_lossy(&self.bytes).into_owned()
	}
}
