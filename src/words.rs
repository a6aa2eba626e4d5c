//! Builds an [`Expression`] from a flat list of words.
//!
//! Commands are separated by operator words: `|` (pipe) binds tightest, then
//! `+` (concat), then `;` (sequence). Every operator is left-associative, so
//! `a | b | c` is `(a | b) | c`.
//!
//! With typed arguments enabled, argument words can carry a kind prefix:
//!
//! | word      | argument              |
//! |-----------|-----------------------|
//! | `i:42`    | `Int(42)`             |
//! | `f:1.5`   | `Float(1.5)`          |
//! | `b:3`     | `Bool`, low bit of 3  |
//! | `c:x`     | `Char(b'x')`          |
//! | `s:text`  | `Str("text")`         |
//! | `t9:text` | raw tag 9, text payload |
//!
//! Anything else is a plain string.

use crate::{
	expr::{BinOp, Expression, SimpleCommand},
	prelude::*,
	value::{Arg, ArgKind, ArgList, RawPayload},
};

/// Operators from loosest to tightest
const PRECEDENCE: [BinOp; 3] = [BinOp::Sequence, BinOp::Concat, BinOp::Pipe];

fn op_word(op: BinOp) -> &'static str {
	match op {
		BinOp::Sequence => ";",
		BinOp::Concat => "+",
		BinOp::Pipe => "|",
	}
}

pub fn parse_words<S: AsRef<str>>(words: &[S], typed: bool) -> ShResult<Expression> {
	let words = words.iter().map(|w| w.as_ref()).collect::<Vec<_>>();
	parse_level(&words, 0, typed)
}

fn parse_level(words: &[&str], level: usize, typed: bool) -> ShResult<Expression> {
	let Some(&op) = PRECEDENCE.get(level) else {
		return parse_command(words, typed)
	};
	let sep = op_word(op);
	let mut segments = words.split(|w| *w == sep);

	// split() always yields at least one segment
	let first = segments.next().unwrap_or_default();
	let mut expr = parse_level(first, level + 1, typed)?;
	for segment in segments {
		let rhs = parse_level(segment, level + 1, typed)?;
		expr = Expression::binary(op, expr, rhs);
	}
	Ok(expr)
}

fn parse_command(words: &[&str], typed: bool) -> ShResult<Expression> {
	let Some((path, args)) = words.split_first() else {
		return Err(ShErr::simple(ShErrKind::SyntaxErr, "expected a command next to an operator"))
	};
	let mut arg_list = ArgList::new();
	for word in args {
		if typed {
			arg_list.push(parse_typed(word)?);
		} else {
			arg_list.push(*word);
		}
	}
	Ok(Expression::Simple(SimpleCommand::new(*path, arg_list)))
}

pub fn parse_typed(word: &str) -> ShResult<Arg> {
	let bad = |what: &str| ShErr::simple(ShErrKind::SyntaxErr, format!("'{word}' is not a valid {what}"));
	let Some((prefix, body)) = word.split_once(':') else {
		return Ok(Arg::from(word))
	};
	let arg = match prefix {
		"i" => {
			let n = body.parse::<i64>().map_err(|_| bad("integer"))?;
			Arg::from_raw(ArgKind::Int.tag(), RawPayload::Int(n))
		}
		"f" => {
			let x = body.parse::<f64>().map_err(|_| bad("float"))?;
			Arg::from_raw(ArgKind::Float.tag(), RawPayload::Float(x))
		}
		"b" => {
			let n = body.parse::<i64>().map_err(|_| bad("boolean"))?;
			Arg::from_raw(ArgKind::Bool.tag(), RawPayload::Int(n))
		}
		"c" => {
			let [byte] = body.as_bytes() else {
				return Err(bad("character"))
			};
			Arg::from_raw(ArgKind::Char.tag(), RawPayload::Byte(*byte))
		}
		"s" => Arg::from_raw(ArgKind::Str.tag(), RawPayload::Text(body.to_string())),
		_ => match prefix.strip_prefix('t').and_then(|tag| tag.parse::<u8>().ok()) {
			Some(tag) => Arg::from_raw(tag, RawPayload::Text(body.to_string())),
			None => Arg::from(word),
		},
	};
	Ok(arg)
}
