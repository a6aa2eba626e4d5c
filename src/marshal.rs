use crate::{prelude::*, value::{Arg, ArgList}};

/// Build the argv for one program: `[path, arg_1, ..., arg_n]`.
///
/// There is no terminator; the runner adds whatever `execvp` needs. An
/// unrecognized argument is a code generation bug, so it comes back as a
/// fatal `ConfigErr` and nothing gets spawned.
pub fn marshal(path: &str, args: &ArgList) -> ShResult<Vec<OsString>> {
	let mut argv = Vec::with_capacity(args.len() + 1);
	argv.push(OsString::from(path));

	for (i, arg) in args.iter().enumerate() {
		match arg {
			Arg::Typed(value) => argv.push(value.to_arg()),
			Arg::Unrecognized { tag } => {
				return Err(
					ShErr::simple(ShErrKind::ConfigErr, format!("argument {} of '{path}' has kind tag {tag}", i + 1))
				)
			}
		}
	}
	Ok(argv)
}
