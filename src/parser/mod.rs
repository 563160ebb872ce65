//! Arithmetic expression parser
//!
//! A small recursive-descent evaluator for infix arithmetic over numeric
//! literals, used by `Fn::Calculate`. Expressions are evaluated while they
//! are parsed; no syntax tree is built.

pub mod arithmetic;
pub mod error;

pub use arithmetic::evaluate;
pub use error::{ParseError, ParseResult};
