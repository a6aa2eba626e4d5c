use crate::{
	capture::{CapturedOutput, Fault},
	config::EvalConfig,
	expr::{BinOp, Expression, SimpleCommand},
	libsh::sys::write_out,
	marshal::marshal,
	prelude::*,
	procio::{ProcessRunner, StdinSource},
	relay::RelayStore,
};

bitflags! {
	#[derive(Debug, Copy, Clone, PartialEq, Eq)]
	pub struct EvalFlags: u8 {
		/// Write the final output to the host's stdout
		const ECHO = 0b0000_0001;
	}
}

/// Evaluate `root` with the environment's configuration.
///
/// The result is written to stdout once and then returned.
pub fn evaluate(root: &Expression) -> ShResult<CapturedOutput> {
	Evaluator::new(EvalConfig::from_env()).evaluate(root)
}

/// Like [`evaluate`], but a fatal error ends the process with status 1
/// after printing its diagnostic.
pub fn evaluate_or_exit(root: &Expression) -> CapturedOutput {
	match evaluate(root) {
		Ok(output) => output,
		Err(e) => {
			e.print_error();
			std::process::exit(1)
		}
	}
}

/// Walks an expression tree, one process at a time
#[derive(Debug, Clone)]
pub struct Evaluator {
	config: EvalConfig,
	flags: EvalFlags,
	relays: RelayStore,
}

impl Evaluator {
	pub fn new(config: EvalConfig) -> Self {
		let relays = RelayStore::new(&config.relay_dir);
		Self { config, flags: EvalFlags::ECHO, relays }
	}
	/// An evaluator that does not write to stdout
	pub fn quiet(config: EvalConfig) -> Self {
		Self::new(config).with_flags(EvalFlags::empty())
	}
	pub fn with_flags(self, flags: EvalFlags) -> Self {
		Self { flags, ..self }
	}
	pub fn config(&self) -> &EvalConfig {
		&self.config
	}
	pub fn flags(&self) -> EvalFlags {
		self.flags
	}
	pub fn evaluate(&self, root: &Expression) -> ShResult<CapturedOutput> {
		let eval_start = Instant::now();
		let deadline = self.config.timeout.map(|t| eval_start + t);
		let runner = ProcessRunner::new(self.config.capture_cap, deadline);

		let output = self.dispatch_node(root, StdinSource::Inherited, &runner)?;
		flog!(INFO, "evaluated {} in {:?}", root, eval_start.elapsed());

		if self.flags.contains(EvalFlags::ECHO) {
			write_out(output.as_bytes()).note("while writing the result to stdout")?;
		}
		Ok(output)
	}
	/// `stdin` only reaches the leftmost command of `node`
	pub fn dispatch_node(&self, node: &Expression, stdin: StdinSource<'_>, runner: &ProcessRunner) -> ShResult<CapturedOutput> {
		match node {
			Expression::Simple(cmd) => self.exec_simple(cmd, stdin, runner),
			Expression::Binary { op, left, right } => match op {
				BinOp::Concat => self.exec_concat(left, right, stdin, runner),
				BinOp::Sequence => self.exec_sequence(left, right, stdin, runner),
				BinOp::Pipe => self.exec_pipe(left, right, stdin, runner),
			},
		}
	}
	fn exec_simple(&self, cmd: &SimpleCommand, stdin: StdinSource<'_>, runner: &ProcessRunner) -> ShResult<CapturedOutput> {
		let argv = marshal(&cmd.path, &cmd.args)?;
		flog!(TRACE, argv);

		match runner.run(&argv, stdin) {
			Ok((mut output, stat)) => {
				output.set_status(Some(stat));
				if !stat.success() {
					output.push_fault(Fault::NonzeroExit { cmd: cmd.path.clone(), status: stat });
				}
				Ok(output)
			}
			Err(e) if e.is_fatal() => Err(e),
			Err(e) => {
				flog!(WARN, "{}", e);
				let errno = match *e.kind() {
					ShErrKind::SpawnFailed(errno) => errno,
					_ => Errno::UnknownErrno,
				};
				let mut output = CapturedOutput::new(runner.cap());
				output.push_fault(Fault::SpawnFailed { cmd: cmd.path.clone(), errno });
				Ok(output)
			}
		}
	}
	fn exec_concat(&self, left: &Expression, right: &Expression, stdin: StdinSource<'_>, runner: &ProcessRunner) -> ShResult<CapturedOutput> {
		let mut output = self.dispatch_node(left, stdin, runner)?;
		let right_out = self.dispatch_node(right, StdinSource::Inherited, runner)?;
		output.concat(right_out);
		Ok(output)
	}
	fn exec_sequence(&self, left: &Expression, right: &Expression, stdin: StdinSource<'_>, runner: &ProcessRunner) -> ShResult<CapturedOutput> {
		let mut discarded = self.dispatch_node(left, stdin, runner)?;
		let mut output = self.dispatch_node(right, StdinSource::Inherited, runner)?;
		output.prepend_faults(discarded.take_faults());
		Ok(output)
	}
	fn exec_pipe(&self, left: &Expression, right: &Expression, stdin: StdinSource<'_>, runner: &ProcessRunner) -> ShResult<CapturedOutput> {
		let mut upstream = self.dispatch_node(left, stdin, runner)?;

		// Dropped on any early return, which deletes the file
		let mut relay = self.relays.create()?;
		relay.write(&upstream)?;
		flog!(TRACE, "relay {} feeds {}", relay.path().display(), right.leftmost().path);

		let mut output = self.dispatch_node(right, StdinSource::Relay(&relay), runner)?;
		relay.release()?;

		output.prepend_faults(upstream.take_faults());
		Ok(output)
	}
}
