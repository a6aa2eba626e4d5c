// Standard Library Common IO and FS Abstractions
pub use std::ffi::{CString, OsStr, OsString};
pub use std::fmt;
pub use std::fs::{self, File, OpenOptions};
pub use std::io::{self, Read, Write};
pub use std::path::{Path, PathBuf};
pub use std::time::{Duration, Instant};

// Unix-specific IO abstractions
pub use std::os::unix::ffi::{OsStrExt, OsStringExt};
pub use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

// Nix crate for POSIX APIs
pub use bitflags::bitflags;
pub use nix::{
	errno::Errno,
	fcntl::OFlag,
	libc::{STDIN_FILENO, STDOUT_FILENO},
	sys::{
		signal::{kill, Signal},
		wait::{waitpid, WaitPidFlag as WtFlag, WaitStatus as WtStat},
	},
	unistd::{dup2, fork, pipe2, ForkResult, Pid},
};

pub use crate::flog;
pub use crate::libsh::error::{ShErr, ShErrKind, ShResult, ShResultExt};
pub use crate::libsh::flog::LogLevel::*;
