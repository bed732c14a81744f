use std::borrow::Cow;

use crate::types::Lookup;
use crate::{AttributeRecord, CompareOp, EvalError, LogicalOp, Node, Value};

/// Evaluate a tree against a record.
///
/// AND and OR short-circuit on the left operand, so an attribute referenced
/// only by a skipped right-hand side need not be present.
///
/// # Errors
///
/// Returns [`EvalError::MissingAttribute`] when a visited comparison names an
/// attribute the record lacks, and [`EvalError::TypeMismatch`] when the
/// record value cannot be compared with the literal.
pub fn evaluate(node: &Node, record: &AttributeRecord) -> Result<bool, EvalError> {
    match node {
        Node::Logical {
            op: LogicalOp::And,
            left,
            right,
        } => Ok(evaluate(left, record)? && evaluate(right, record)?),
        Node::Logical {
            op: LogicalOp::Or,
            left,
            right,
        } => Ok(evaluate(left, record)? || evaluate(right, record)?),
        Node::Comparison {
            attribute,
            op,
            literal,
        } => compare(attribute, *op, literal, record),
    }
}

fn compare(
    attribute: &str,
    op: CompareOp,
    literal: &Value,
    record: &AttributeRecord,
) -> Result<bool, EvalError> {
    let found = match record.lookup(attribute) {
        Lookup::Found(value) => value,
        Lookup::Unsupported(kind) => return Err(mismatch(attribute, op, kind, literal)),
        Lookup::Missing => {
            return Err(EvalError::MissingAttribute {
                attribute: attribute.to_owned(),
            });
        }
    };

    coerce(found, literal)
        .compare(op, literal)
        .ok_or_else(|| mismatch(attribute, op, found.type_name(), literal))
}

/// Numeric literals read numeric-looking strings from the record as numbers.
fn coerce<'a>(found: &'a Value, literal: &Value) -> Cow<'a, Value> {
    match found {
        Value::String(text) if literal.is_numeric() => match Value::parse_numeric(text) {
            Some(number) => Cow::Owned(number),
            None => Cow::Borrowed(found),
        },
        _ => Cow::Borrowed(found),
    }
}

fn mismatch(attribute: &str, op: CompareOp, found: &'static str, literal: &Value) -> EvalError {
    EvalError::TypeMismatch {
        attribute: attribute.to_owned(),
        op,
        found,
        literal: literal.clone(),
    }
}
