use std::ops::Add;

use serde::Serialize;

use crate::parse::{MAX_DEPTH, Token, TokenKind, tokenize};
use crate::{LogicalOp, Node, Rule, RuleError, ValidationError};

/// How many AND and OR tokens sit outside any parentheses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperatorCounts {
    pub and: usize,
    pub or: usize,
}

impl OperatorCounts {
    /// Count top-level operators in a token stream. Unbalanced closing
    /// parentheses never drive the depth below zero.
    #[must_use]
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut counts = Self::default();
        let mut depth = 0_usize;
        for token in tokens {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::And if depth == 0 => counts.and += 1,
                TokenKind::Or if depth == 0 => counts.or += 1,
                _ => {}
            }
        }
        counts
    }

    /// Count top-level operators in rule text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Lex`] if the text does not tokenize.
    pub fn from_source(source: &str) -> Result<Self, RuleError> {
        Ok(Self::from_tokens(&tokenize(source)?))
    }

    /// The operator with the higher count; AND on a tie.
    #[must_use]
    pub fn dominant(self) -> LogicalOp {
        if self.or > self.and {
            LogicalOp::Or
        } else {
            LogicalOp::And
        }
    }
}

impl Add for OperatorCounts {
    type Output = OperatorCounts;

    fn add(self, other: OperatorCounts) -> OperatorCounts {
        OperatorCounts {
            and: self.and + other.and,
            or: self.or + other.or,
        }
    }
}

/// The result of merging two rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Combined {
    /// Freshly built tree; never aliases either input.
    pub root: Node,
    pub operator: LogicalOp,
    pub counts: OperatorCounts,
    /// `(<first source>) OP (<second source>)`, which parses back to `root`.
    pub rule_string: String,
}

/// Merge exactly two rules under whichever of AND/OR dominates their top
/// level, with AND breaking ties.
///
/// # Errors
///
/// Returns [`RuleError::Validation`] unless exactly two rules are given or if
/// the merged tree would be deeper than [`MAX_DEPTH`], and [`RuleError::Lex`]
/// if a rule's stored source no longer tokenizes.
pub fn combine(rules: &[Rule]) -> Result<Combined, RuleError> {
    let [first, second] = rules else {
        return Err(ValidationError::new(format!(
            "combine requires exactly two rules, got {}",
            rules.len()
        ))
        .into());
    };

    let counts = OperatorCounts::from_source(&first.rule_string)?
        + OperatorCounts::from_source(&second.rule_string)?;
    let operator = counts.dominant();

    let depth = 1 + first.root.depth().max(second.root.depth());
    if depth > MAX_DEPTH {
        return Err(ValidationError::new(format!(
            "combining rules {} and {} would nest {depth} logical operators, more than the limit of {MAX_DEPTH}",
            first.id, second.id
        ))
        .into());
    }

    let root = Node::logical(operator, first.root.clone(), second.root.clone());
    let rule_string = format!(
        "({}) {operator} ({})",
        first.rule_string.trim(),
        second.rule_string.trim()
    );

    Ok(Combined {
        root,
        operator,
        counts,
        rule_string,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::parse::parse;

    fn rule(id: u64, source: &str) -> Rule {
        Rule {
            id,
            name: format!("rule {id}"),
            description: None,
            rule_string: source.to_owned(),
            root: parse(source).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_ignore_nested_operators() {
        let counts = OperatorCounts::from_source("a = 1 AND (b = 2 OR c = 3 OR d = 4)").unwrap();
        assert_eq!(counts, OperatorCounts { and: 1, or: 0 });
    }

    #[test]
    fn counts_mixed_top_level() {
        let counts = OperatorCounts::from_source("a = 1 or b = 2 OR c = 3 and d = 4").unwrap();
        assert_eq!(counts, OperatorCounts { and: 1, or: 2 });
    }

    #[test]
    fn dominant_ties_to_and() {
        assert_eq!(OperatorCounts { and: 0, or: 0 }.dominant(), LogicalOp::And);
        assert_eq!(OperatorCounts { and: 2, or: 2 }.dominant(), LogicalOp::And);
        assert_eq!(OperatorCounts { and: 1, or: 2 }.dominant(), LogicalOp::Or);
        assert_eq!(OperatorCounts { and: 3, or: 2 }.dominant(), LogicalOp::And);
    }

    #[test]
    fn combine_and_dominant() {
        let a = rule(1, "age > 30 AND department = 'Sales'");
        let b = rule(2, "salary > 50000 AND experience > 5");
        let combined = combine(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(combined.operator, LogicalOp::And);
        assert_eq!(combined.counts, OperatorCounts { and: 2, or: 0 });
        assert_eq!(combined.root, Node::logical(LogicalOp::And, a.root, b.root));
    }

    #[test]
    fn combine_or_dominant() {
        let a = rule(1, "age < 18 OR age > 65");
        let b = rule(2, "dept = 'HR' OR dept = 'Ops'");
        let combined = combine(&[a, b]).unwrap();
        assert_eq!(combined.operator, LogicalOp::Or);
    }

    #[test]
    fn combine_tie_defaults_to_and() {
        let a = rule(1, "age < 18 OR age > 65");
        let b = rule(2, "x = 1 AND y = 2");
        assert_eq!(combine(&[a, b]).unwrap().operator, LogicalOp::And);

        let a = rule(1, "age < 18");
        let b = rule(2, "x = 1");
        assert_eq!(combine(&[a, b]).unwrap().operator, LogicalOp::And);
    }

    #[test]
    fn combine_counts_across_both_rules() {
        // One rule leans AND, the other OR more heavily.
        let a = rule(1, "a = 1 AND b = 2");
        let b = rule(2, "c = 1 OR d = 2 OR e = 3");
        let combined = combine(&[a, b]).unwrap();
        assert_eq!(combined.counts, OperatorCounts { and: 1, or: 2 });
        assert_eq!(combined.operator, LogicalOp::Or);
    }

    #[test]
    fn combined_source_reparses_to_root() {
        let a = rule(1, "  a = 1 OR b = 2 AND c = 3 ");
        let b = rule(2, "(d = 'x' OR e != 4.5)");
        let combined = combine(&[a, b]).unwrap();
        assert_eq!(
            combined.rule_string,
            "(a = 1 OR b = 2 AND c = 3) AND ((d = 'x' OR e != 4.5))"
        );
        assert_eq!(parse(&combined.rule_string).unwrap(), combined.root);
    }

    #[test]
    fn combine_leaves_inputs_untouched() {
        let a = rule(1, "a = 1");
        let b = rule(2, "b = 2");
        let inputs = vec![a.clone(), b.clone()];
        let _ = combine(&inputs).unwrap();
        assert_eq!(inputs, vec![a, b]);
    }

    #[test]
    fn combine_wrong_arity() {
        let a = rule(1, "a = 1");
        for rules in [vec![], vec![a.clone()], vec![a.clone(), a.clone(), a.clone()]] {
            let err = combine(&rules).unwrap_err();
            assert!(matches!(err, RuleError::Validation(_)), "{err}");
        }
    }

    #[test]
    fn combine_rejects_tree_past_depth_limit() {
        let at_limit = vec!["a = 1"; MAX_DEPTH + 1].join(" OR ");
        let deep = rule(1, &at_limit);
        let err = combine(&[deep, rule(2, "b = 2")]).unwrap_err();
        match err {
            RuleError::Validation(e) => assert!(e.message().contains("more than the limit"), "{e}"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let shallow = rule(1, &vec!["a = 1"; MAX_DEPTH].join(" OR "));
        let combined = combine(&[shallow, rule(2, "b = 2")]).unwrap();
        assert_eq!(combined.root.depth(), MAX_DEPTH);
    }
}
