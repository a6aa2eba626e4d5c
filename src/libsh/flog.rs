use std::fmt::Display;

use super::term::{Style, Styled};

pub const LOG_LEVEL_VAR: &str = "SHEXPR_LOG_LEVEL";

#[derive(Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Debug)]
#[repr(u8)]
pub enum LogLevel {
	NONE = 0,
	ERROR = 1,
	WARN = 2,
	INFO = 3,
	DEBUG = 4,
	TRACE = 5,
}

impl Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use LogLevel::*;
		match self {
			ERROR => write!(f, "{}", "ERROR".styled(Style::Red | Style::Bold)),
			WARN => write!(f, "{}", "WARN".styled(Style::Yellow | Style::Bold)),
			INFO => write!(f, "{}", "INFO".styled(Style::Green | Style::Bold)),
			DEBUG => write!(f, "{}", "DEBUG".styled(Style::Magenta | Style::Bold)),
			TRACE => write!(f, "{}", "TRACE".styled(Style::Blue | Style::Bold)),
			NONE => write!(f, ""),
		}
	}
}

pub fn parse_level(raw: &str) -> LogLevel {
	use LogLevel::*;
	match raw.to_lowercase().as_str() {
		"error" => ERROR,
		"warn" => WARN,
		"info" => INFO,
		"debug" => DEBUG,
		"trace" => TRACE,
		_ => NONE,
	}
}

pub fn log_level() -> LogLevel {
	let level = std::env::var(LOG_LEVEL_VAR).unwrap_or_default();
	parse_level(&level)
}

/// Structured logging to stderr.
///
/// Messages are only printed when their level is at or below the level named
/// by `SHEXPR_LOG_LEVEL`. Every line is prefixed with the level, file and line
/// number.
///
/// # Usage
///
/// ## Formatted messages
/// ```rust,ignore
/// flog!(DEBUG, "spawned {} as {}", cmd, pid);
/// ```
/// **Output:**
/// ```plaintext
/// [DEBUG][src/procio.rs:10] spawned echo as 4242
/// ```
///
/// ## Literals
/// ```rust,ignore
/// flog!(TRACE, "relay released");
/// ```
///
/// ## Expressions
/// Logs the expression source next to its `Debug` value.
/// ```rust,ignore
/// flog!(TRACE, argv);
/// ```
/// **Output:**
/// ```plaintext
/// [TRACE][src/eval.rs:10] argv = [ "echo", "hi" ]
/// ```
///
/// Output goes through `eprintln!()`, so captured stdout is never touched.
#[macro_export]
macro_rules! flog {
	($level:path, $fmt:literal, $($args:expr),+ $(,)?) => {{
		use $crate::libsh::flog::log_level;
		use $crate::libsh::term::Styled;
		use $crate::libsh::term::Style;

		if $level <= log_level() {
			let file = file!().styled(Style::Cyan);
			let line = line!().to_string().styled(Style::Cyan);

			eprintln!(
				"[{}][{}:{}] {}",
				$level, file, line, format!($fmt, $($args),+)
			);
		}
	}};

	($level:path, $($lit:literal),+ $(,)?) => {{
		use $crate::libsh::flog::log_level;
		use $crate::libsh::term::Styled;
		use $crate::libsh::term::Style;

		if $level <= log_level() {
			let file = file!().styled(Style::Cyan);
			let line = line!().to_string().styled(Style::Cyan);

			$(
				eprintln!(
					"[{}][{}:{}] {}",
					$level, file, line, $lit
				);
			)+
		}
	}};

	($level:path, $($val:expr),+ $(,)?) => {{
		use $crate::libsh::flog::log_level;
		use $crate::libsh::term::Styled;
		use $crate::libsh::term::Style;

		if $level <= log_level() {
			let file = file!().styled(Style::Cyan);
			let line = line!().to_string().styled(Style::Cyan);

			$(
				let val_name = stringify!($val);
				eprintln!(
					"[{}][{}:{}] {} = {:#?}",
					$level, file, line, val_name, &$val
				);
			)+
		}
	}};
}
