//! Error code system following the compiler pattern (RS0001, RS0002, etc.)
//!
//! Codes are grouped into numeric ranges by category so that callers can
//! branch on the class of failure without matching every variant.

use std::fmt;

/// Error categories for organizing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Argument shape and type errors (RS0001-RS0020)
    Argument,
    /// Arithmetic errors (RS0021-RS0030)
    Arithmetic,
    /// Regular expression errors (RS0031)
    Pattern,
    /// JSON and Base64 decoding errors (RS0032-RS0040)
    Encoding,
    /// Condition graph and evaluation errors (RS0041-RS0050)
    Condition,
    /// Registry and resource limits (RS0051-RS0060)
    Limit,
}

/// Error code following the compiler pattern (RS0001, RS0002, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    pub code: u16,
}

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self { code }
    }

    /// Full code string (e.g. "RS0001")
    pub fn code_str(&self) -> String {
        format!("RS{:04}", self.code)
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code {
            1..=20 => ErrorCategory::Argument,
            21..=30 => ErrorCategory::Arithmetic,
            31 => ErrorCategory::Pattern,
            32..=40 => ErrorCategory::Encoding,
            41..=50 => ErrorCategory::Condition,
            _ => ErrorCategory::Limit,
        }
    }

    /// Short human-readable title
    pub fn title(&self) -> &'static str {
        match *self {
            RS0001 => "Invalid function arguments",
            RS0002 => "Invalid argument type",
            RS0003 => "Index out of bounds",
            RS0004 => "Value is not a boolean",
            RS0021 => "Division by zero",
            RS0022 => "Modulo by zero",
            RS0023 => "Non-finite arithmetic result",
            RS0031 => "Invalid regular expression",
            RS0032 => "Invalid JSON document",
            RS0033 => "Invalid Base64 payload",
            RS0041 => "Circular condition dependency",
            RS0042 => "Condition cannot be statically evaluated",
            RS0043 => "Condition evaluation failed",
            RS0051 => "Nesting depth exceeded",
            RS0052 => "Function already registered",
            _ => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RS{:04}", self.code)
    }
}

pub const RS0001: ErrorCode = ErrorCode::new(1);
pub const RS0002: ErrorCode = ErrorCode::new(2);
pub const RS0003: ErrorCode = ErrorCode::new(3);
pub const RS0004: ErrorCode = ErrorCode::new(4);

pub const RS0021: ErrorCode = ErrorCode::new(21);
pub const RS0022: ErrorCode = ErrorCode::new(22);
pub const RS0023: ErrorCode = ErrorCode::new(23);

pub const RS0031: ErrorCode = ErrorCode::new(31);
pub const RS0032: ErrorCode = ErrorCode::new(32);
pub const RS0033: ErrorCode = ErrorCode::new(33);

pub const RS0041: ErrorCode = ErrorCode::new(41);
pub const RS0042: ErrorCode = ErrorCode::new(42);
pub const RS0043: ErrorCode = ErrorCode::new(43);

pub const RS0051: ErrorCode = ErrorCode::new(51);
pub const RS0052: ErrorCode = ErrorCode::new(52);
