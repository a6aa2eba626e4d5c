use std::str::FromStr;

use crate::{capture::CAPTURE_CAP, prelude::*};

pub const CAPTURE_CAP_VAR: &str = "SHEXPR_CAPTURE_CAP";
pub const RELAY_DIR_VAR: &str = "SHEXPR_RELAY_DIR";
pub const TIMEOUT_MS_VAR: &str = "SHEXPR_TIMEOUT_MS";

/// Knobs for one evaluator
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
	/// Bytes kept from any one capture
	pub capture_cap: usize,
	/// Where relay files are created
	pub relay_dir: PathBuf,
	/// Wall-clock budget for a whole evaluation
	pub timeout: Option<Duration>,
}

impl Default for EvalConfig {
	fn default() -> Self {
		Self { capture_cap: CAPTURE_CAP, relay_dir: PathBuf::from("."), timeout: None }
	}
}

impl EvalConfig {
	/// Defaults, overridden by whichever `SHEXPR_*` variables are set
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Some(cap) = env_parse::<usize>(CAPTURE_CAP_VAR) {
			config.capture_cap = cap;
		}
		if let Some(dir) = std::env::var_os(RELAY_DIR_VAR).filter(|dir| !dir.is_empty()) {
			config.relay_dir = PathBuf::from(dir);
		}
		if let Some(ms) = env_parse::<u64>(TIMEOUT_MS_VAR) {
			config.timeout = Some(Duration::from_millis(ms));
		}
		config
	}
	pub fn with_capture_cap(self, capture_cap: usize) -> Self {
		Self { capture_cap, ..self }
	}
	pub fn with_relay_dir(self, relay_dir: impl Into<PathBuf>) -> Self {
		Self { relay_dir: relay_dir.into(), ..self }
	}
	pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
		Self { timeout, ..self }
	}
}

/// Unset or empty is `None`. So is garbage, after a warning.
fn env_parse<T: FromStr>(var: &str) -> Option<T> {
	let raw = std::env::var(var).ok().filter(|raw| !raw.trim().is_empty())?;
	match raw.trim().parse::<T>() {
		Ok(val) => Some(val),
		Err(_) => {
			flog!(WARN, "ignoring {}: could not parse '{}'", var, raw);
			None
		}
	}
}
