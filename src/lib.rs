pub mod prelude;
pub mod libsh;
pub mod value;
pub mod marshal;
pub mod capture;
pub mod jobs;
pub mod relay;
pub mod procio;
pub mod expr;
pub mod config;
pub mod eval;
pub mod words;
#[cfg(test)]
pub mod tests;

pub use capture::{CapturedOutput, Fault, CAPTURE_CAP};
pub use config::EvalConfig;
pub use eval::{evaluate, evaluate_or_exit, EvalFlags, Evaluator};
pub use expr::{BinOp, Expression, SimpleCommand};
pub use jobs::ExitStatus;
pub use libsh::error::{ShErr, ShErrKind, ShResult};
pub use value::{Arg, ArgKind, ArgList, RawPayload, Value};
