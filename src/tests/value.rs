use pretty_assertions::assert_eq;

use crate::value::{Arg, ArgKind, ArgList, RawPayload, Value};

#[test]
fn int_renders_plain_decimal() {
	assert_eq!(Value::Int(0).to_arg(), "0");
	assert_eq!(Value::Int(-42).to_arg(), "-42");
	assert_eq!(Value::Int(i64::MAX).to_arg(), "9223372036854775807");
}

#[test]
fn float_renders_six_fraction_digits() {
	assert_eq!(Value::Float(1.5).to_arg(), "1.500000");
	assert_eq!(Value::Float(-0.25).to_arg(), "-0.250000");
	assert_eq!(Value::Float(2.0 / 3.0).to_arg(), "0.666667");
	assert_eq!(Value::Float(1e20).to_arg(), "100000000000000000000.000000");
}

#[test]
fn float_non_finite() {
	assert_eq!(Value::Float(f64::NAN).to_arg(), "nan");
	assert_eq!(Value::Float(f64::INFINITY).to_arg(), "inf");
	assert_eq!(Value::Float(f64::NEG_INFINITY).to_arg(), "-inf");
}

#[test]
fn bool_and_text_render_verbatim() {
	assert_eq!(Value::Bool(true).to_arg(), "true");
	assert_eq!(Value::Bool(false).to_arg(), "false");
	assert_eq!(Value::Char(b'x').to_arg(), "x");
	assert_eq!(Value::Str("two words".into()).to_arg(), "two words");
}

#[test]
fn char_keeps_non_ascii_byte() {
	use std::os::unix::ffi::OsStrExt;
	let arg = Value::Char(0xff).to_arg();
	assert_eq!(arg.as_bytes(), &[0xff]);
}

#[test]
fn raw_bool_tests_low_bit() {
	let tag = ArgKind::Bool.tag();
	assert_eq!(Arg::from_raw(tag, RawPayload::Int(1)), Arg::Typed(Value::Bool(true)));
	assert_eq!(Arg::from_raw(tag, RawPayload::Int(2)), Arg::Typed(Value::Bool(false)));
	assert_eq!(Arg::from_raw(tag, RawPayload::Int(3)), Arg::Typed(Value::Bool(true)));
	assert_eq!(Arg::from_raw(tag, RawPayload::Int(-1)), Arg::Typed(Value::Bool(true)));
	assert_eq!(Arg::from_raw(tag, RawPayload::Int(0)), Arg::Typed(Value::Bool(false)));
}

#[test]
fn raw_known_tags() {
	assert_eq!(Arg::from_raw(0, RawPayload::Int(7)), Arg::Typed(Value::Int(7)));
	assert_eq!(Arg::from_raw(1, RawPayload::Float(0.5)), Arg::Typed(Value::Float(0.5)));
	assert_eq!(Arg::from_raw(3, RawPayload::Byte(b'q')), Arg::Typed(Value::Char(b'q')));
	assert_eq!(Arg::from_raw(4, RawPayload::Text("hi".into())), Arg::Typed(Value::Str("hi".into())));
}

#[test]
fn raw_unknown_tag() {
	assert_eq!(Arg::from_raw(5, RawPayload::Int(1)), Arg::Unrecognized { tag: 5 });
	assert_eq!(Arg::from_raw(255, RawPayload::Text("x".into())), Arg::Unrecognized { tag: 255 });
}

#[test]
fn raw_payload_mismatch() {
	assert_eq!(Arg::from_raw(0, RawPayload::Text("7".into())), Arg::Unrecognized { tag: 0 });
	assert_eq!(Arg::from_raw(2, RawPayload::Float(1.0)), Arg::Unrecognized { tag: 2 });
}

#[test]
fn each_arg_keeps_its_own_kind() {
	let args = ArgList::new()
		.with(1i64)
		.with("two")
		.with(3.0f64)
		.with(true)
		.with(b'5');
	let kinds = args
		.iter()
		.map(|arg| match arg {
			Arg::Typed(value) => value.kind(),
			Arg::Unrecognized { .. } => panic!("{arg:?}"),
		})
		.collect::<Vec<_>>();
	assert_eq!(kinds, vec![ArgKind::Int, ArgKind::Str, ArgKind::Float, ArgKind::Bool, ArgKind::Char]);
}
