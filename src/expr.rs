use std::fmt::Display;

use crate::{prelude::*, value::{Arg, ArgList}};

/// One external program invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCommand {
	pub path: String,
	pub args: ArgList,
}

impl SimpleCommand {
	pub fn new(path: impl Into<String>, args: ArgList) -> Self {
		Self { path: path.into(), args }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
	/// Both outputs, left then right
	Concat,
	/// Right output only; left runs for its effects
	Sequence,
	/// Left output becomes right's stdin
	Pipe,
}

impl Display for BinOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BinOp::Concat => write!(f, "+"),
			BinOp::Sequence => write!(f, ";"),
			BinOp::Pipe => write!(f, "|"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Simple(SimpleCommand),
	Binary {
		op: BinOp,
		left: Box<Expression>,
		right: Box<Expression>,
	},
}

impl Expression {
	pub fn simple<I, A>(path: impl Into<String>, args: I) -> Self
	where
		I: IntoIterator<Item = A>,
		A: Into<Arg>,
	{
		Expression::Simple(SimpleCommand::new(path, args.into_iter().collect()))
	}
	/// A command with no arguments
	pub fn bare(path: impl Into<String>) -> Self {
		Expression::Simple(SimpleCommand::new(path, ArgList::new()))
	}
	pub fn binary(op: BinOp, left: Expression, right: Expression) -> Self {
		Expression::Binary { op, left: Box::new(left), right: Box::new(right) }
	}
	pub fn concat(left: Expression, right: Expression) -> Self {
		Self::binary(BinOp::Concat, left, right)
	}
	pub fn seq(left: Expression, right: Expression) -> Self {
		Self::binary(BinOp::Sequence, left, right)
	}
	pub fn pipe(left: Expression, right: Expression) -> Self {
		Self::binary(BinOp::Pipe, left, right)
	}
	/// The first command reached by following left operands
	pub fn leftmost(&self) -> &SimpleCommand {
		let mut node = self;
		loop {
			match node {
				Expression::Simple(cmd) => return cmd,
				Expression::Binary { left, .. } => node = left,
			}
		}
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Expression::Simple(cmd) => write!(f, "{}", cmd.path),
			Expression::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
		}
	}
}
