use std::fmt::Display;

use crate::prelude::*;

/// How long a deadline-bound wait sleeps between `WNOHANG` polls
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How a spawned program finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
	Exited(i32),
	Signaled(Signal),
}

impl ExitStatus {
	/// `None` while the child is still running or only stopped/continued
	pub fn from_wait(stat: WtStat) -> Option<Self> {
		match stat {
			WtStat::Exited(_, code) => Some(ExitStatus::Exited(code)),
			WtStat::Signaled(_, sig, _) => Some(ExitStatus::Signaled(sig)),
			_ => None,
		}
	}
	pub fn success(&self) -> bool {
		matches!(self, ExitStatus::Exited(0))
	}
	pub fn code(&self) -> Option<i32> {
		match self {
			ExitStatus::Exited(code) => Some(*code),
			ExitStatus::Signaled(_) => None,
		}
	}
}

impl Display for ExitStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExitStatus::Exited(0) => write!(f, "done"),
			ExitStatus::Exited(code) => write!(f, "failed: {code}"),
			ExitStatus::Signaled(sig) => write!(f, "signaled: {sig:?}"),
		}
	}
}

/// A forked child that has to be reaped.
///
/// Dropping a child that was never reaped kills it and reaps it, so error
/// and timeout paths cannot leave zombies behind.
#[derive(Debug)]
pub struct ChildProc {
	pid: Pid,
	command: String,
	stat: Option<ExitStatus>,
}

impl ChildProc {
	pub fn new(pid: Pid, command: impl Into<String>) -> Self {
		Self { pid, command: command.into(), stat: None }
	}
	pub fn pid(&self) -> Pid {
		self.pid
	}
	pub fn cmd(&self) -> &str {
		&self.command
	}
	pub fn stat(&self) -> Option<ExitStatus> {
		self.stat
	}
	pub fn is_reaped(&self) -> bool {
		self.stat.is_some()
	}
	/// Block until the child terminates
	pub fn wait(&mut self) -> Result<ExitStatus, Errno> {
		if let Some(stat) = self.stat {
			return Ok(stat)
		}
		loop {
			match waitpid(self.pid, None) {
				Ok(stat) => {
					if let Some(stat) = ExitStatus::from_wait(stat) {
						self.stat = Some(stat);
						return Ok(stat)
					}
				}
				Err(Errno::EINTR) => continue,
				Err(e) => return Err(e),
			}
		}
	}
	pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, Errno> {
		if self.stat.is_some() {
			return Ok(self.stat)
		}
		loop {
			match waitpid(self.pid, Some(WtFlag::WNOHANG)) {
				Ok(stat) => {
					self.stat = ExitStatus::from_wait(stat);
					return Ok(self.stat)
				}
				Err(Errno::EINTR) => continue,
				Err(e) => return Err(e),
			}
		}
	}
	/// Wait for the child, giving up at `deadline`.
	///
	/// On timeout the child is killed and reaped before `Timeout` is returned.
	pub fn wait_until(&mut self, deadline: Option<Instant>) -> ShResult<ExitStatus> {
		let Some(deadline) = deadline else {
			return Ok(self.wait()?)
		};
		loop {
			if let Some(stat) = self.try_wait()? {
				return Ok(stat)
			}
			let left = deadline.saturating_duration_since(Instant::now());
			if left.is_zero() {
				self.kill_and_reap();
				return Err(
					ShErr::simple(ShErrKind::Timeout, format!("'{}' was still running", self.command))
				)
			}
			std::thread::sleep(left.min(WAIT_POLL_INTERVAL));
		}
	}
	pub fn kill(&self, sig: Signal) -> ShResult<()> {
		Ok(kill(self.pid, sig)?)
	}
	pub fn kill_and_reap(&mut self) {
		if self.is_reaped() {
			return
		}
		if let Err(e) = self.kill(Signal::SIGKILL) {
			flog!(WARN, "failed to kill {} ({}): {}", self.command, self.pid, e);
		}
		match self.wait() {
			Ok(stat) => flog!(DEBUG, "reaped {} ({}) after kill: {}", self.command, self.pid, stat),
			Err(e) => flog!(WARN, "failed to reap {} ({}): {}", self.command, self.pid, e),
		}
	}
}

impl Drop for ChildProc {
	fn drop(&mut self) {
		self.kill_and_reap()
	}
}

/// Every child a single run has forked, in spawn order
#[derive(Debug, Default)]
pub struct ChildSet {
	children: Vec<ChildProc>,
}

impl ChildSet {
	pub fn new() -> Self {
		Self { children: vec![] }
	}
	pub fn push(&mut self, child: ChildProc) -> &mut ChildProc {
		self.children.push(child);
		let last = self.children.len() - 1;
		&mut self.children[last]
	}
	/// Reap every child that has not been waited on yet
	pub fn reap_all(&mut self) -> ShResult<Vec<ExitStatus>> {
		let mut stats = vec![];
		for child in self.children.iter_mut().filter(|chld| !chld.is_reaped()) {
			match child.wait() {
				Ok(stat) => {
					flog!(DEBUG, "reaped {} ({}): {}", child.cmd(), child.pid(), stat);
					stats.push(stat);
				}
				Err(Errno::ECHILD) => break,
				Err(e) => return Err(e.into()),
			}
		}
		Ok(stats)
	}
}
