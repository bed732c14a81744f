pub mod api;
pub mod combine;
pub mod config;
mod error;
mod evaluate;
pub mod parse;
mod store;
mod types;

pub use error::RuleError;
pub use evaluate::evaluate;
pub use store::{DEFAULT_HISTORY_LIMIT, RuleStore};
pub use types::{
    AttributeExpr, AttributeRecord, CompareOp, EvalError, EvaluationRecord, LogicalOp, Node,
    Rule, RuleId, StoreError, ValidationError, Value, attr,
};
