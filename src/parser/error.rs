//! Parser error types

use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Arithmetic parse or evaluation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected character
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The character that was found
        character: char,
        /// Byte offset of the character
        position: usize,
    },

    /// Unexpected end of input
    #[error("Unexpected end of expression")]
    UnexpectedEof,

    /// Unclosed parenthesis
    #[error("Missing closing parenthesis at position {position}")]
    MissingClosingParen {
        /// Position where `)` was expected
        position: usize,
    },

    /// Malformed numeric literal such as `1.2.3`
    #[error("Invalid number literal at position {position}: {literal}")]
    InvalidNumber {
        /// The literal text
        literal: String,
        /// Position where the literal starts
        position: usize,
    },

    /// Right operand of `/` or `//` is zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Right operand of `%` is zero
    #[error("Modulo by zero")]
    ModuloByZero,
}

impl ParseError {
    /// Whether this is a syntax error, as opposed to an arithmetic one.
    ///
    /// Syntax errors mean the text is not a closed arithmetic expression
    /// (for instance it still names a variable).
    pub fn is_syntax_error(&self) -> bool {
        !matches!(self, ParseError::DivisionByZero | ParseError::ModuloByZero)
    }
}
