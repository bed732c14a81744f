//! Request/response bodies for the rule API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combine::OperatorCounts;
use crate::{LogicalOp, Node, Rule, RuleId};

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rule_string: String,
}

#[derive(Debug, Deserialize)]
pub struct CombineRequest {
    pub rule_ids: Vec<RuleId>,
    #[serde(default)]
    pub save_rule: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters for paged listings.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

// ── Responses ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub id: RuleId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule_string: String,
    pub ast: Node,
    pub created_at: DateTime<Utc>,
}

impl From<Rule> for RuleResponse {
    fn from(rule: Rule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            rule_string: rule.rule_string,
            ast: rule.root,
            created_at: rule.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub rule_id: RuleId,
    pub result: bool,
    pub evaluation_id: u64,
}

#[derive(Debug, Serialize)]
pub struct CombineResponse {
    /// Present only when the combined rule was saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RuleId>,
    pub name: String,
    pub rule_string: String,
    pub operator: LogicalOp,
    pub counts: OperatorCounts,
    pub ast: Node,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rules: usize,
}
