use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Value;
use crate::RuleError;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    /// Whether `lhs <op> rhs` holds given `lhs.cmp(rhs)`.
    pub(crate) fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
        }
    }

    #[must_use]
    pub fn is_ordering(self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Neq)
    }
}

/// Logical connectives joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    And,
    Or,
}

/// Rule AST. Strictly binary; comparisons are always leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Comparison {
        attribute: String,
        op: CompareOp,
        literal: Value,
    },
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// Renders rule source that parses back to the same tree. Logical children
/// are always parenthesised since AND and OR share one precedence level.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comparison {
                attribute,
                op,
                literal,
            } => write!(f, "{attribute} {op} {literal}"),
            Node::Logical { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {op} ")?;
                write_operand(f, right)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match node {
        Node::Logical { .. } => write!(f, "({node})"),
        Node::Comparison { .. } => write!(f, "{node}"),
    }
}

impl FromStr for Node {
    type Err = RuleError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        crate::parse::parse(source)
    }
}

impl Node {
    #[must_use]
    pub fn logical(op: LogicalOp, left: Node, right: Node) -> Node {
        Node::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, other: Node) -> Node {
        Node::logical(LogicalOp::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Node) -> Node {
        Node::logical(LogicalOp::Or, self, other)
    }

    /// Logical operators on the longest root-to-leaf path; 0 for a lone comparison.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Comparison { .. } => 0,
            Node::Logical { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of comparison leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Comparison { .. } => 1,
            Node::Logical { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Attribute names referenced by the tree, in left-to-right order, with repeats.
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Comparison { attribute, .. } => out.push(attribute),
            Node::Logical { left, right, .. } => {
                left.collect_attributes(out);
                right.collect_attributes(out);
            }
        }
    }
}

/// Intermediate builder for comparison leaves.
/// Created by [`attr()`]; requires a comparison method to produce a [`Node`].
#[derive(Debug, Clone)]
pub struct AttributeExpr {
    name: String,
}

impl AttributeExpr {
    fn compare(self, op: CompareOp, literal: impl Into<Value>) -> Node {
        Node::Comparison {
            attribute: self.name,
            op,
            literal: literal.into(),
        }
    }

    #[must_use]
    pub fn eq(self, literal: impl Into<Value>) -> Node {
        self.compare(CompareOp::Eq, literal)
    }

    #[must_use]
    pub fn neq(self, literal: impl Into<Value>) -> Node {
        self.compare(CompareOp::Neq, literal)
    }

    #[must_use]
    pub fn gt(self, literal: impl Into<Value>) -> Node {
        self.compare(CompareOp::Gt, literal)
    }

    #[must_use]
    pub fn gte(self, literal: impl Into<Value>) -> Node {
        self.compare(CompareOp::Gte, literal)
    }

    #[must_use]
    pub fn lt(self, literal: impl Into<Value>) -> Node {
        self.compare(CompareOp::Lt, literal)
    }

    #[must_use]
    pub fn lte(self, literal: impl Into<Value>) -> Node {
        self.compare(CompareOp::Lte, literal)
    }
}

#[must_use]
pub fn attr(name: &str) -> AttributeExpr {
    AttributeExpr {
        name: name.to_owned(),
    }
}
