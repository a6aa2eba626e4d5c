use std::process::exit;

use clap::Parser;
use shexpr::{prelude::*, words::parse_words, EvalConfig, Evaluator};

#[derive(Parser, Debug)]
#[command(name = "shexpr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
	shexpr -- printf 'a\\nb\\nc\\n' '|' grep b '|' wc -l\n\
	shexpr -- echo one + echo two\n\
	shexpr --typed -- echo i:42 f:1.5 b:3 c:x")]
#[command(about = "Evaluate a composition of external commands and print its captured output")]
struct ShexprArgs {
	/// Bytes kept from each capture
	#[arg(long)]
	capture_cap: Option<usize>,

	/// Directory for relay files
	#[arg(long)]
	relay_dir: Option<PathBuf>,

	/// Abort the evaluation after this many milliseconds
	#[arg(long)]
	timeout_ms: Option<u64>,

	/// Read kind prefixes (i: f: b: c: s: tN:) on argument words
	#[arg(long)]
	typed: bool,

	/// Print the final status and any faults to stderr
	#[arg(long)]
	report: bool,

	/// Commands separated by the operator words '|', '+' and ';'
	#[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
	words: Vec<String>,
}

impl ShexprArgs {
	fn config(&self) -> EvalConfig {
		let mut config = EvalConfig::from_env();
		if let Some(cap) = self.capture_cap {
			config = config.with_capture_cap(cap);
		}
		if let Some(dir) = &self.relay_dir {
			config = config.with_relay_dir(dir);
		}
		if let Some(ms) = self.timeout_ms {
			config = config.with_timeout(Some(Duration::from_millis(ms)));
		}
		config
	}
}

fn main() {
	let args = ShexprArgs::parse();
	flog!(DEBUG, args);

	let expr = match parse_words(&args.words, args.typed) {
		Ok(expr) => expr,
		Err(e) => {
			e.print_error();
			exit(1);
		}
	};

	let output = match Evaluator::new(args.config()).evaluate(&expr) {
		Ok(output) => output,
		Err(e) => {
			e.print_error();
			exit(1);
		}
	};

	if args.report {
		match output.status() {
			Some(stat) => eprintln!("status: {stat}"),
			None => eprintln!("status: not spawned"),
		}
		if output.is_truncated() {
			eprintln!("output truncated to {} bytes", output.cap());
		}
		for fault in output.faults() {
			eprintln!("fault: {fault}");
		}
	}
}
