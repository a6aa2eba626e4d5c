use std::{ffi::c_char, ptr};

use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::{
	capture::CapturedOutput,
	jobs::{ChildProc, ChildSet, ExitStatus},
	libsh::sys::remaining,
	prelude::*,
	relay::Relay,
};

const READ_CHUNK: usize = 4096;

/// Where a spawned program's standard input comes from
#[derive(Debug, Clone, Copy)]
pub enum StdinSource<'r> {
	/// Whatever the host process was given
	Inherited,
	/// The materialized output of the previous pipeline stage
	Relay(&'r Relay),
}

/// Spawns one program at a time and collects its stdout
#[derive(Debug, Clone)]
pub struct ProcessRunner {
	cap: usize,
	deadline: Option<Instant>,
}

impl ProcessRunner {
	pub fn new(cap: usize, deadline: Option<Instant>) -> Self {
		Self { cap, deadline }
	}
	pub fn cap(&self) -> usize {
		self.cap
	}
	/// Run `argv[0]` with `argv`, wait for it and return what it wrote.
	///
	/// A program that cannot be exec'd at all is `SpawnFailed`, which is
	/// distinct from a program that ran and exited nonzero. When this returns,
	/// every child it forked has been reaped.
	pub fn run(&self, argv: &[OsString], stdin: StdinSource<'_>) -> ShResult<(CapturedOutput, ExitStatus)> {
		let Some(program) = argv.first() else {
			return Err(ShErr::simple(ShErrKind::InternalErr, "empty argv"))
		};
		let cmd = program.to_string_lossy().into_owned();
		let c_argv = argv
			.iter()
			.map(|arg| CString::new(arg.as_bytes()))
			.collect::<Result<Vec<_>, _>>()
			.map_err(|_| {
				ShErr::simple(ShErrKind::SpawnFailed(Errno::EINVAL), format!("'{cmd}': argument contains a NUL byte"))
			})?;

		// execvp's argv, built here so the child never allocates
		let mut argv_ptrs = c_argv.iter().map(|arg| arg.as_ptr()).collect::<Vec<*const c_char>>();
		argv_ptrs.push(ptr::null());

		let stdin_file = match stdin {
			StdinSource::Inherited => None,
			StdinSource::Relay(relay) => Some(relay.open_for_read()?),
		};
		let (out_r, out_w) = pipe2(OFlag::O_CLOEXEC)?;
		// Only ever written to if exec fails; O_CLOEXEC closes it on success
		let (status_r, status_w) = pipe2(OFlag::O_CLOEXEC)?;

		let mut children = ChildSet::new();
		match unsafe { fork()? } {
			ForkResult::Child => {
				exec_child(&argv_ptrs, stdin_file.as_ref().map(|f| f.as_raw_fd()), out_w.as_raw_fd(), &status_w)
			}
			ForkResult::Parent { child } => {
				drop(out_w);
				drop(status_w);
				drop(stdin_file);
				flog!(DEBUG, "spawned {} as {}", cmd, child);
				let child = children.push(ChildProc::new(child, cmd.as_str()));

				if let Some(errno) = read_exec_errno(status_r)? {
					let stat = child.wait()?;
					flog!(DEBUG, "{} failed to exec ({}), child {}", cmd, errno, stat);
					return Err(ShErr::simple(ShErrKind::SpawnFailed(errno), format!("'{cmd}'")))
				}

				let output = self.drain(File::from(out_r), &cmd)?;
				let stat = child.wait_until(self.deadline)?;
				flog!(DEBUG, "{} exited: {}, {} bytes captured", cmd, stat, output.len());

				children.reap_all()?;
				Ok((output, stat))
			}
		}
	}
	/// Read the pipe to end-of-stream, keeping at most `cap` bytes
	fn drain(&self, mut pipe: File, cmd: &str) -> ShResult<CapturedOutput> {
		let mut output = CapturedOutput::new(self.cap);
		let mut chunk = [0u8; READ_CHUNK];
		loop {
			if self.deadline.is_some() && !self.wait_readable(&pipe)? {
				return Err(ShErr::simple(ShErrKind::Timeout, format!("'{cmd}' did not finish writing")))
			}
			match pipe.read(&mut chunk) {
				Ok(0) => break,
				// Past the cap the bytes are still read so the writer never blocks
				Ok(n) => {
					output.append(&chunk[..n]);
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}
		if output.is_truncated() {
			flog!(DEBUG, "{} wrote more than {} bytes, output truncated", cmd, self.cap);
		}
		Ok(output)
	}
	/// Wait for the pipe to become readable. `false` means the deadline passed.
	fn wait_readable(&self, pipe: &File) -> ShResult<bool> {
		loop {
			let Some(left) = remaining(self.deadline) else {
				return Ok(true)
			};
			if left.is_zero() {
				return Ok(false)
			}
			let millis = left.as_millis().clamp(1, u16::MAX as u128) as u16;
			let mut fds = [PollFd::new(pipe.as_fd(), PollFlags::POLLIN)];
			match poll(&mut fds, PollTimeout::from(millis)) {
				Ok(0) => continue,
				Ok(_) => return Ok(true),
				Err(Errno::EINTR) => continue,
				Err(e) => return Err(e.into()),
			}
		}
	}
}

/// Runs in the forked child. Never returns.
///
/// Only async-signal-safe calls happen here. `argv` is null-terminated and
/// its strings outlive the exec.
fn exec_child(argv: &[*const c_char], stdin_fd: Option<RawFd>, out_fd: RawFd, status_w: &OwnedFd) -> ! {
	let errno = (|| -> Errno {
		if let Some(fd) = stdin_fd {
			if let Err(e) = dup2(fd, STDIN_FILENO) {
				return e
			}
		}
		if let Err(e) = dup2(out_fd, STDOUT_FILENO) {
			return e
		}
		unsafe { nix::libc::execvp(argv[0], argv.as_ptr()) };
		// Only reached if exec failed
		Errno::last()
	})();
	let _ = nix::unistd::write(status_w, &(errno as i32).to_ne_bytes());
	unsafe { nix::libc::_exit(127) }
}

/// `Some(errno)` if the child reported an exec failure, `None` if exec went through
fn read_exec_errno(status_r: OwnedFd) -> ShResult<Option<Errno>> {
	let mut pipe = File::from(status_r);
	let mut buf = [0u8; 4];
	let mut filled = 0;
	while filled < buf.len() {
		match pipe.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e.into()),
		}
	}
	match filled {
		0 => Ok(None),
		4 => Ok(Some(Errno::from_raw(i32::from_ne_bytes(buf)))),
		_ => Err(ShErr::simple(ShErrKind::InternalErr, "short read on exec status pipe")),
	}
}
