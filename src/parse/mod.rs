mod error;
mod lexer;
mod parser;

pub use error::{LexError, ParseError};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{MAX_DEPTH, MAX_NESTING, parse_tokens};

use crate::{Node, RuleError};

/// Parse rule text into a [`Node`] tree.
///
/// # Errors
///
/// Returns [`RuleError::Lex`] if the text contains characters outside the
/// rule language, or [`RuleError::Parse`] if the tokens do not form a rule.
pub fn parse(source: &str) -> Result<Node, RuleError> {
    let tokens = tokenize(source)?;
    Ok(parse_tokens(&tokens)?)
}
