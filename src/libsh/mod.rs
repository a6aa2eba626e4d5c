pub mod error;
pub mod flog;
pub mod sys;
pub mod term;
