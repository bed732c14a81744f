use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::EvalError;
use super::node::Node;
use super::record::AttributeRecord;

/// Identifier assigned by the [`RuleStore`](crate::RuleStore), starting at 1.
pub type RuleId = u64;

/// A named, persisted rule: the text it was created from and the parsed tree.
///
/// Rules are produced by [`RuleStore::create()`](crate::RuleStore::create) or
/// [`RuleStore::put()`](crate::RuleStore::put) and never change once stored.
/// Each rule owns its tree outright; nothing is shared between rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule_string: String,
    #[serde(rename = "ast")]
    pub root: Node,
    pub created_at: DateTime<Utc>,
}

impl Rule {
    /// Evaluate this rule's tree against a record.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if a referenced attribute is missing or has a type
    /// the comparison cannot use.
    pub fn evaluate(&self, record: &AttributeRecord) -> Result<bool, EvalError> {
        crate::evaluate::evaluate(&self.root, record)
    }
}

/// One recorded evaluation of a rule: the input record and the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    pub id: u64,
    pub rule_id: RuleId,
    pub input: serde_json::Value,
    pub result: bool,
    pub evaluated_at: DateTime<Utc>,
}
