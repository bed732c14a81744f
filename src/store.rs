use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::parse::{MAX_DEPTH, parse};
use crate::{EvaluationRecord, Node, Rule, RuleError, RuleId, StoreError, ValidationError};

/// Evaluations kept per rule when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// In-memory rule store. Cloning yields another handle to the same rules.
///
/// Writers serialize on an internal lock, so ids are unique and increase in
/// creation order; readers share the lock and never observe a half-inserted
/// rule. Each rule keeps only its most recent evaluations, up to the history
/// limit.
#[derive(Debug, Clone)]
pub struct RuleStore {
    inner: Arc<RwLock<Inner>>,
    history_limit: usize,
}

#[derive(Debug, Default)]
struct Inner {
    rules: BTreeMap<RuleId, Rule>,
    last_id: RuleId,
    evaluations: BTreeMap<RuleId, VecDeque<EvaluationRecord>>,
    last_evaluation_id: u64,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl RuleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store keeping at most `history_limit` evaluations per rule; older
    /// ones are dropped first.
    #[must_use]
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            inner: Arc::default(),
            history_limit,
        }
    }

    /// Parse `rule_string` and store it as a new rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Lex`] or [`RuleError::Parse`] if the text is not a
    /// valid rule. Nothing is stored in that case.
    pub fn create(
        &self,
        name: &str,
        description: Option<String>,
        rule_string: &str,
    ) -> Result<Rule, RuleError> {
        let root = parse(rule_string)?;
        Ok(self.put(name, description, rule_string, root)?)
    }

    /// Store an already-built tree, e.g. the output of
    /// [`combine()`](crate::combine::combine), under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the tree is deeper than
    /// [`MAX_DEPTH`] logical operators. Nothing is stored in that case.
    pub fn put(
        &self,
        name: &str,
        description: Option<String>,
        rule_string: &str,
        root: Node,
    ) -> Result<Rule, ValidationError> {
        let depth = root.depth();
        if depth > MAX_DEPTH {
            return Err(ValidationError::new(format!(
                "rule '{name}' nests {depth} logical operators, more than the limit of {MAX_DEPTH}"
            )));
        }

        let mut inner = self.inner.write();
        inner.last_id += 1;
        let id = inner.last_id;
        let rule = Rule {
            id,
            name: name.to_owned(),
            description,
            rule_string: rule_string.to_owned(),
            root,
            created_at: Utc::now(),
        };
        let previous = inner.rules.insert(id, rule.clone());
        assert!(previous.is_none(), "rule store corrupted: id {id} assigned twice");
        drop(inner);

        info!(id, name = %rule.name, "rule stored");
        Ok(rule)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn get(&self, id: RuleId) -> Result<Rule, StoreError> {
        let inner = self.inner.read();
        let rule = inner.rules.get(&id).ok_or(StoreError::NotFound { id })?;
        assert_eq!(rule.id, id, "rule store corrupted: key {id} holds rule {}", rule.id);
        Ok(rule.clone())
    }

    /// All rules in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<Rule> {
        self.inner.read().rules.values().cloned().collect()
    }

    /// A window of [`list()`](Self::list).
    #[must_use]
    pub fn list_page(&self, skip: usize, limit: usize) -> Vec<Rule> {
        self.inner
            .read()
            .rules
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().rules.is_empty()
    }

    /// Remove a rule and its evaluation history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn delete(&self, id: RuleId) -> Result<Rule, StoreError> {
        let mut inner = self.inner.write();
        let rule = inner.rules.remove(&id).ok_or(StoreError::NotFound { id })?;
        inner.evaluations.remove(&id);
        drop(inner);

        info!(id, name = %rule.name, "rule deleted");
        Ok(rule)
    }

    /// Append an evaluation outcome to a rule's history, dropping the oldest
    /// entries beyond the history limit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the rule was deleted in the meantime.
    pub fn record_evaluation(
        &self,
        rule_id: RuleId,
        input: serde_json::Value,
        result: bool,
    ) -> Result<EvaluationRecord, StoreError> {
        let mut inner = self.inner.write();
        if !inner.rules.contains_key(&rule_id) {
            return Err(StoreError::NotFound { id: rule_id });
        }
        inner.last_evaluation_id += 1;
        let record = EvaluationRecord {
            id: inner.last_evaluation_id,
            rule_id,
            input,
            result,
            evaluated_at: Utc::now(),
        };
        let history = inner.evaluations.entry(rule_id).or_default();
        history.push_back(record.clone());
        while history.len() > self.history_limit {
            history.pop_front();
        }
        drop(inner);

        debug!(rule_id, evaluation_id = record.id, result, "evaluation recorded");
        Ok(record)
    }

    /// A window of a rule's retained evaluation history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown rule id.
    pub fn evaluations(
        &self,
        rule_id: RuleId,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        let inner = self.inner.read();
        if !inner.rules.contains_key(&rule_id) {
            return Err(StoreError::NotFound { id: rule_id });
        }
        Ok(inner
            .evaluations
            .get(&rule_id)
            .map(|records| records.iter().skip(skip).take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
