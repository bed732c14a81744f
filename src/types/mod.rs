mod error;
mod node;
mod record;
mod rule;
mod value;

pub use error::{EvalError, StoreError, ValidationError};
pub use node::{AttributeExpr, CompareOp, LogicalOp, Node, attr};
pub(crate) use record::Lookup;
pub use record::AttributeRecord;
pub use rule::{EvaluationRecord, Rule, RuleId};
pub use value::Value;
