use thiserror::Error;

use crate::parse::{LexError, ParseError};
use crate::{EvalError, StoreError, ValidationError};

/// Unified error type covering lexing, parsing, evaluation and storage.
///
/// Returned by the convenience entry points such as [`parse()`](crate::parse::parse),
/// [`combine()`](crate::combine::combine) and
/// [`RuleStore::create()`](crate::RuleStore::create).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
