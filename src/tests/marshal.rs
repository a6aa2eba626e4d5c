use pretty_assertions::assert_eq;

use crate::{
	libsh::error::ShErrKind,
	marshal::marshal,
	value::{Arg, ArgList, RawPayload},
};

fn strings(argv: Vec<std::ffi::OsString>) -> Vec<String> {
	argv.into_iter().map(|arg| arg.into_string().unwrap()).collect()
}

#[test]
fn path_comes_first() {
	let argv = marshal("/bin/echo", &ArgList::new()).unwrap();
	assert_eq!(strings(argv), vec!["/bin/echo"]);
}

#[test]
fn mixed_kinds_in_order() {
	let args = ArgList::new()
		.with(-3i64)
		.with(2.5f64)
		.with(false)
		.with(b'z')
		.with("a b");
	let argv = marshal("prog", &args).unwrap();
	assert_eq!(strings(argv), vec!["prog", "-3", "2.500000", "false", "z", "a b"]);
}

#[test]
fn raw_bool_goes_through_bit_test() {
	let mut args = ArgList::new();
	args.push_raw(2, RawPayload::Int(6));
	args.push_raw(2, RawPayload::Int(7));
	let argv = marshal("prog", &args).unwrap();
	assert_eq!(strings(argv), vec!["prog", "false", "true"]);
}

#[test]
fn unrecognized_kind_is_config_error() {
	let args = ArgList::new().with("ok").with(Arg::Unrecognized { tag: 9 });
	let err = marshal("echo", &args).unwrap_err();

	assert_eq!(*err.kind(), ShErrKind::ConfigErr);
	assert!(err.is_fatal());
	insta::assert_snapshot!(err.to_string(), @"Unrecognized argument kind - argument 2 of 'echo' has kind tag 9");
}

#[test]
fn empty_string_is_still_an_argument() {
	let argv = marshal("prog", &ArgList::new().with("")).unwrap();
	assert_eq!(strings(argv), vec!["prog", ""]);
}
