use crate::prelude::*;

pub fn borrow_fd<'f>(fd: RawFd) -> BorrowedFd<'f> {
	unsafe { BorrowedFd::borrow_raw(fd) }
}

/// Write every byte to the host's own stdout
pub fn write_out(bytes: &[u8]) -> ShResult<()> {
	write_all(borrow_fd(STDOUT_FILENO), bytes)
}

pub fn write_all(fd: BorrowedFd<'_>, mut bytes: &[u8]) -> ShResult<()> {
	while !bytes.is_empty() {
		match nix::unistd::write(fd, bytes) {
			Ok(0) => return Err(ShErr::simple(ShErrKind::IoErr(io::ErrorKind::WriteZero), "write returned zero bytes")),
			Ok(n) => bytes = &bytes[n..],
			Err(Errno::EINTR) => continue,
			Err(e) => return Err(e.into()),
		}
	}
	Ok(())
}

/// Time left before `deadline`, or `None` if there is no deadline
pub fn remaining(deadline: Option<Instant>) -> Option<Duration> {
	deadline.map(|d| d.saturating_duration_since(Instant::now()))
}
