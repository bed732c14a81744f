use std::fmt;

use thiserror::Error;

/// Errors produced while splitting rule text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

impl LexError {
    /// The character the lexer could not continue from. For unterminated
    /// strings this is the opening quote.
    #[must_use]
    pub fn ch(&self) -> char {
        match self {
            LexError::UnexpectedChar { ch, .. } => *ch,
            LexError::UnterminatedString { .. } => '\'',
        }
    }

    /// Byte offset of [`ch()`](Self::ch) in the rule text.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedChar { offset, .. } | LexError::UnterminatedString { offset } => {
                *offset
            }
        }
    }
}

/// Errors produced when the token stream does not match the rule grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    position: usize,
    offset: Option<usize>,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize, offset: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
            offset,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Index of the offending token; equal to the token count at end of input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offset of the offending token, if there is one.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at token {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::new("unexpected token", 3, Some(10));
        assert_eq!(err.to_string(), "parse error at token 3: unexpected token");
        assert_eq!(err.position(), 3);
        assert_eq!(err.offset(), Some(10));
    }

    #[test]
    fn lex_error_accessors() {
        let err = LexError::UnexpectedChar { ch: '$', offset: 4 };
        assert_eq!(err.to_string(), "unexpected character '$' at offset 4");
        assert_eq!((err.ch(), err.offset()), ('$', 4));

        let err = LexError::UnterminatedString { offset: 7 };
        assert_eq!(
            err.to_string(),
            "unterminated string literal starting at offset 7"
        );
        assert_eq!((err.ch(), err.offset()), ('\'', 7));
    }
}
