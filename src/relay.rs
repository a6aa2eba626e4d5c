use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{capture::CapturedOutput, prelude::*};

/// Shared by every evaluation in the process so relay names never repeat
static RELAY_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// How many taken names `create` skips before giving up
pub const MAX_CREATE_ATTEMPTS: usize = 1 << 16;

fn relay_err<'p>(action: &'static str, path: &'p Path) -> impl FnOnce(io::Error) -> ShErr + 'p {
	move |e| {
		ShErr::simple(ShErrKind::RelayErr, format!("failed to {action} '{}'", path.display()))
			.with_note(e.to_string())
	}
}

/// Hands out relay files in one directory
#[derive(Debug, Clone)]
pub struct RelayStore {
	dir: PathBuf,
}

impl RelayStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}
	pub fn dir(&self) -> &Path {
		&self.dir
	}
	/// The path relay `id` lives at
	pub fn path_for(&self, id: usize) -> PathBuf {
		self.dir.join(format!("temp{id}.txt"))
	}
	/// Create the next free relay file.
	///
	/// Names left behind by another process are skipped, never overwritten.
	pub fn create(&self) -> ShResult<Relay> {
		let mut attempts = 0;
		loop {
			let id = RELAY_COUNTER.fetch_add(1, Ordering::Relaxed);
			let path = self.path_for(id);
			let result = OpenOptions::new()
				.read(true)
				.write(true)
				.create_new(true)
				.open(&path);
			match result {
				Ok(file) => {
					flog!(TRACE, "created relay {}", path.display());
					return Ok(Relay { id, path, file: Some(file), released: false })
				}
				Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempts + 1 < MAX_CREATE_ATTEMPTS => {
					flog!(DEBUG, "relay name {} is taken, trying the next one", path.display());
					attempts += 1;
				}
				Err(e) => return Err(relay_err("create", &path)(e).with_note(format!("after {} attempts", attempts + 1))),
			}
		}
	}
}

/// A transient file carrying one pipeline stage's output to the next.
///
/// `release` deletes it. If the handle is dropped first, the file is deleted
/// anyway.
#[derive(Debug)]
pub struct Relay {
	id: usize,
	path: PathBuf,
	file: Option<File>,
	released: bool,
}

impl Relay {
	pub fn id(&self) -> usize {
		self.id
	}
	pub fn path(&self) -> &Path {
		&self.path
	}
	pub fn write(&mut self, output: &CapturedOutput) -> ShResult<()> {
		let Some(file) = self.file.as_mut() else {
			return Err(ShErr::simple(ShErrKind::RelayErr, format!("relay '{}' is closed", self.path.display())))
		};
		file.write_all(output.as_bytes()).map_err(relay_err("write", &self.path))?;
		file.flush().map_err(relay_err("flush", &self.path))?;
		flog!(TRACE, "wrote {} bytes to relay {}", output.len(), self.path.display());
		Ok(())
	}
	/// A fresh read handle positioned at the start of the relay
	pub fn open_for_read(&self) -> ShResult<File> {
		File::open(&self.path).map_err(relay_err("open", &self.path))
	}
	/// Close and delete the backing file
	pub fn release(mut self) -> ShResult<()> {
		self.released = true;
		self.file.take();
		fs::remove_file(&self.path).map_err(relay_err("remove", &self.path))?;
		flog!(TRACE, "released relay {}", self.path.display());
		Ok(())
	}
}

impl Drop for Relay {
	fn drop(&mut self) {
		if self.released {
			return
		}
		self.file.take();
		match fs::remove_file(&self.path) {
			Ok(()) => flog!(TRACE, "dropped relay {}", self.path.display()),
			Err(e) => flog!(WARN, "failed to clean up relay {}: {}", self.path.display(), e),
		}
	}
}
