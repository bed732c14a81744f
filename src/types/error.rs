use thiserror::Error;

use super::{CompareOp, RuleId, Value};

/// Errors produced while evaluating a rule against an attribute record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("attribute '{attribute}' not found in record")]
    MissingAttribute { attribute: String },

    #[error("cannot compare attribute '{attribute}' ({found}) with {literal} using '{op}'")]
    TypeMismatch {
        attribute: String,
        op: CompareOp,
        found: &'static str,
        literal: Value,
    },
}

impl EvalError {
    /// The attribute the failing comparison referenced.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            EvalError::MissingAttribute { attribute }
            | EvalError::TypeMismatch { attribute, .. } => attribute,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("rule {id} not found")]
    NotFound { id: RuleId },
}

/// A request had the wrong shape, e.g. combining anything but two rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
