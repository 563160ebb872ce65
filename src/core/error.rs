//! Core error types with error codes
//!
//! Every variant here is a hard error: it aborts the enclosing resolution
//! call. Arguments that merely cannot be evaluated yet are not errors; the
//! function returns its own call node instead.

use thiserror::Error;

pub use super::error_code::*;

/// Main resolver error type
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Wrong arity or argument shape
    #[error("{function}: {message}")]
    InvalidArguments { function: String, message: String },

    /// Argument resolved to a value of the wrong kind
    #[error("{function}: {argument} must be {expected}, got {actual}")]
    InvalidArgumentType {
        function: String,
        argument: String,
        expected: String,
        actual: String,
    },

    #[error("{function}: index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        function: String,
        index: i64,
        len: usize,
    },

    #[error("cannot convert {actual} to boolean")]
    NotBoolean { actual: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    /// Overflow to infinity or an undefined (NaN) result
    #[error("{function}: result {value} is not a finite number")]
    NonFiniteResult { function: String, value: f64 },

    #[error("{function}: invalid regex pattern: {source}")]
    InvalidPattern {
        function: String,
        #[source]
        source: regex::Error,
    },

    #[error("{function}: invalid JSON: {source}")]
    InvalidJson {
        function: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{function}: invalid Base64 string: {message}")]
    InvalidBase64 { function: String, message: String },

    /// Kahn's algorithm left these conditions unordered
    #[error("circular dependency detected in conditions: [{}]", conditions.join(", "))]
    CircularDependency { conditions: Vec<String> },

    #[error("condition {name} cannot be statically evaluated")]
    UnresolvableCondition { name: String },

    #[error("error resolving condition {name}: {source}")]
    Condition {
        name: String,
        #[source]
        source: Box<ResolverError>,
    },

    #[error("maximum nesting depth of {max_depth} exceeded")]
    DepthExceeded { max_depth: usize },

    #[error("function '{name}' is already registered")]
    DuplicateFunction { name: String },
}

impl ResolverError {
    pub fn invalid_arguments(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn invalid_type(
        function: impl Into<String>,
        argument: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidArgumentType {
            function: function.into(),
            argument: argument.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Error code for this error
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidArguments { .. } => RS0001,
            Self::InvalidArgumentType { .. } => RS0002,
            Self::IndexOutOfBounds { .. } => RS0003,
            Self::NotBoolean { .. } => RS0004,
            Self::DivisionByZero => RS0021,
            Self::ModuloByZero => RS0022,
            Self::NonFiniteResult { .. } => RS0023,
            Self::InvalidPattern { .. } => RS0031,
            Self::InvalidJson { .. } => RS0032,
            Self::InvalidBase64 { .. } => RS0033,
            Self::CircularDependency { .. } => RS0041,
            Self::UnresolvableCondition { .. } => RS0042,
            Self::Condition { .. } => RS0043,
            Self::DepthExceeded { .. } => RS0051,
            Self::DuplicateFunction { .. } => RS0052,
        }
    }

    /// Innermost error, looking through condition wrappers
    pub fn root_cause(&self) -> &ResolverError {
        match self {
            Self::Condition { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;
