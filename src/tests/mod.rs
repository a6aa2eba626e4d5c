use std::path::PathBuf;

use tempfile::TempDir;

use crate::{config::EvalConfig, eval::Evaluator, expr::Expression};

pub mod eval;
pub mod marshal;
pub mod value;

/// A quiet evaluator whose relays live in `dir`
pub fn quiet_in(dir: &TempDir) -> Evaluator {
	Evaluator::quiet(EvalConfig::default().with_relay_dir(dir.path()))
}

pub fn relay_dir() -> TempDir {
	tempfile::tempdir().expect("Failed to create relay dir")
}

/// Whatever is left in a relay directory
pub fn leftovers(dir: &TempDir) -> Vec<PathBuf> {
	std::fs::read_dir(dir.path())
		.expect("Failed to read relay dir")
		.map(|entry| entry.unwrap().path())
		.collect()
}

pub fn sh(script: &str) -> Expression {
	Expression::simple("sh", ["-c", script])
}

pub fn echo(word: &str) -> Expression {
	Expression::simple("echo", [word])
}
