//! Core types: values, errors and error codes

pub mod error;
pub mod error_code;
pub mod value;

pub use error::*;
pub use value::*;
