//! Recursive-descent arithmetic evaluator
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! additive       := multiplicative (("+" | "-") multiplicative)*
//! multiplicative := power (("*" | "/" | "//" | "%") power)*
//! power          := unary ("**" power)?
//! unary          := ("+" | "-") unary | primary
//! primary        := "(" additive ")" | number
//! ```

use super::error::{ParseError, ParseResult};

/// Evaluate an arithmetic expression.
///
/// Leading and trailing whitespace is ignored; any other unconsumed input
/// is an error.
pub fn evaluate(input: &str) -> ParseResult<f64> {
    let mut parser = Parser::new(input.trim());
    let result = parser.parse_additive()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(result),
        Some(character) => Err(ParseError::UnexpectedCharacter {
            character,
            position: parser.position,
        }),
    }
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.remaining();
        self.position += rest.len() - rest.trim_start().len();
    }

    /// Consume `token` if the input continues with it
    fn eat(&mut self, token: &str) -> bool {
        if self.remaining().starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn parse_additive(&mut self) -> ParseResult<f64> {
        let mut left = self.parse_multiplicative()?;
        loop {
            self.skip_whitespace();
            if self.eat("+") {
                left += self.parse_multiplicative()?;
            } else if self.eat("-") {
                left -= self.parse_multiplicative()?;
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<f64> {
        let mut left = self.parse_power()?;
        loop {
            self.skip_whitespace();
            // `//` must be tried before `/`
            if self.eat("//") {
                let right = self.parse_power()?;
                if right == 0.0 {
                    return Err(ParseError::DivisionByZero);
                }
                left = (left / right).floor();
            } else if self.eat("*") {
                left *= self.parse_power()?;
            } else if self.eat("/") {
                let right = self.parse_power()?;
                if right == 0.0 {
                    return Err(ParseError::DivisionByZero);
                }
                left /= right;
            } else if self.eat("%") {
                let right = self.parse_power()?;
                if right == 0.0 {
                    return Err(ParseError::ModuloByZero);
                }
                left %= right;
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_power(&mut self) -> ParseResult<f64> {
        let base = self.parse_unary()?;
        self.skip_whitespace();
        if self.eat("**") {
            let exponent = self.parse_power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> ParseResult<f64> {
        self.skip_whitespace();
        if self.eat("+") {
            self.parse_unary()
        } else if self.eat("-") {
            Ok(-self.parse_unary()?)
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> ParseResult<f64> {
        self.skip_whitespace();
        let start = self.position;
        match self.peek() {
            None => Err(ParseError::UnexpectedEof),
            Some('(') => {
                self.position += 1;
                let value = self.parse_additive()?;
                self.skip_whitespace();
                if !self.eat(")") {
                    return Err(ParseError::MissingClosingParen {
                        position: self.position,
                    });
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let literal_len = self
                    .remaining()
                    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .unwrap_or(self.remaining().len());
                let literal = &self.input[start..start + literal_len];
                self.position += literal_len;
                literal
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber {
                        literal: literal.to_string(),
                        position: start,
                    })
            }
            Some(character) => Err(ParseError::UnexpectedCharacter {
                character,
                position: start,
            }),
        }
    }
}
