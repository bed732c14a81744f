use std::collections::HashMap;

use super::Value;
use crate::types::error::ValidationError;

/// Attribute record a rule is evaluated against, mapping names to [`Value`]s.
///
/// Supports nested paths like `"user.profile.age"`, so both
/// `{"user.age": 3}` and `{"user": {"age": 3}}` answer a lookup of `user.age`.
#[derive(Debug, Clone, Default)]
pub struct AttributeRecord {
    data: HashMap<String, Entry>,
}

#[derive(Debug, Clone)]
enum Entry {
    Leaf(Value),
    Nested(HashMap<String, Entry>),
    /// A JSON array. Kept so lookups can report it instead of calling it missing.
    List,
}

/// Outcome of resolving an attribute path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Lookup<'a> {
    Found(&'a Value),
    Unsupported(&'static str),
    Missing,
}

impl AttributeRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dot-separated path. Creates intermediate nested maps as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        Self::insert_recursive(&mut self.data, &segments, Entry::Leaf(value));
    }

    /// Build a record from a JSON object. `null` members are treated as absent.
    #[must_use]
    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut record = Self::new();
        for (key, value) in map {
            let segments: Vec<&str> = key.split('.').collect();
            if let Some(entry) = Self::entry_from_json(value) {
                Self::insert_recursive(&mut record.data, &segments, entry);
            }
        }
        record
    }

    /// Look up a scalar by dot-separated path.
    /// Returns `None` if the path does not exist or points to a nested map or list.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        match self.lookup(path) {
            Lookup::Found(v) => Some(v),
            Lookup::Unsupported(_) | Lookup::Missing => None,
        }
    }

    /// Whether the path resolves to anything at all, scalar or not.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        !matches!(self.lookup(path), Lookup::Missing)
    }

    pub(crate) fn lookup(&self, path: &str) -> Lookup<'_> {
        let segments: Vec<&str> = path.split('.').collect();
        Self::get_recursive(&self.data, &segments)
    }

    fn entry_from_json(json: &serde_json::Value) -> Option<Entry> {
        match json {
            serde_json::Value::Null => None,
            serde_json::Value::Array(_) => Some(Entry::List),
            serde_json::Value::Object(map) => {
                let mut nested = HashMap::new();
                for (key, value) in map {
                    let segments: Vec<&str> = key.split('.').collect();
                    if let Some(entry) = Self::entry_from_json(value) {
                        Self::insert_recursive(&mut nested, &segments, entry);
                    }
                }
                Some(Entry::Nested(nested))
            }
            scalar => Value::from_json(scalar).map(Entry::Leaf),
        }
    }

    fn insert_recursive(map: &mut HashMap<String, Entry>, segments: &[&str], value: Entry) {
        match segments {
            [] => {}
            [last] => match value {
                // Merge rather than clobber when two keys describe the same object.
                Entry::Nested(incoming) => {
                    let slot = map
                        .entry((*last).to_owned())
                        .or_insert_with(|| Entry::Nested(HashMap::new()));
                    if !matches!(slot, Entry::Nested(_)) {
                        *slot = Entry::Nested(HashMap::new());
                    }
                    if let Entry::Nested(target) = slot {
                        for (key, entry) in incoming {
                            Self::insert_recursive(target, &[key.as_str()], entry);
                        }
                    }
                }
                leaf => {
                    map.insert((*last).to_owned(), leaf);
                }
            },
            [first, rest @ ..] => {
                let entry = map
                    .entry((*first).to_owned())
                    .or_insert_with(|| Entry::Nested(HashMap::new()));
                match entry {
                    Entry::Nested(nested) => {
                        Self::insert_recursive(nested, rest, value);
                    }
                    Entry::Leaf(_) | Entry::List => {
                        let mut nested = HashMap::new();
                        Self::insert_recursive(&mut nested, rest, value);
                        *entry = Entry::Nested(nested);
                    }
                }
            }
        }
    }

    fn get_recursive<'a>(map: &'a HashMap<String, Entry>, segments: &[&str]) -> Lookup<'a> {
        match segments {
            [] => Lookup::Missing,
            [last] => match map.get(*last) {
                Some(Entry::Leaf(v)) => Lookup::Found(v),
                Some(Entry::Nested(_)) => Lookup::Unsupported("object"),
                Some(Entry::List) => Lookup::Unsupported("array"),
                None => Lookup::Missing,
            },
            [first, rest @ ..] => match map.get(*first) {
                Some(Entry::Nested(nested)) => Self::get_recursive(nested, rest),
                Some(Entry::Leaf(_) | Entry::List) | None => Lookup::Missing,
            },
        }
    }
}

impl TryFrom<&serde_json::Value> for AttributeRecord {
    type Error = ValidationError;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(ValidationError::new(format!(
                "attribute record must be a JSON object, got {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a bool",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_and_get_simple() {
        let record = AttributeRecord::new().set("department", "Sales");
        assert_eq!(
            record.get("department"),
            Some(&Value::String("Sales".to_owned()))
        );
    }

    #[test]
    fn set_and_get_nested() {
        let record = AttributeRecord::new().set("user.profile.age", 25_i64);
        assert_eq!(record.get("user.profile.age"), Some(&Value::Int(25)));
        assert_eq!(record.get("user.profile"), None);
        assert!(record.contains("user.profile"));
    }

    #[test]
    fn get_missing_returns_none() {
        let record = AttributeRecord::new().set("age", 25_i64);
        assert_eq!(record.get("salary"), None);
        assert!(!record.contains("salary"));
    }

    #[test]
    fn overwrite_value() {
        let record = AttributeRecord::new().set("score", 10_i64).set("score", 20_i64);
        assert_eq!(record.get("score"), Some(&Value::Int(20)));
    }

    #[test]
    fn from_json_flat_object() {
        let json = json!({"age": 35, "department": "Sales", "active": true, "ratio": 0.5});
        let record = AttributeRecord::try_from(&json).unwrap();
        assert_eq!(record.get("age"), Some(&Value::Int(35)));
        assert_eq!(record.get("department"), Some(&Value::from("Sales")));
        assert_eq!(record.get("active"), Some(&Value::Bool(true)));
        assert_eq!(record.get("ratio"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn from_json_nested_and_dotted_keys_merge() {
        let json = json!({"user": {"age": 40}, "user.region": "eu"});
        let record = AttributeRecord::try_from(&json).unwrap();
        assert_eq!(record.get("user.age"), Some(&Value::Int(40)));
        assert_eq!(record.get("user.region"), Some(&Value::from("eu")));
    }

    #[test]
    fn from_json_null_is_absent() {
        let record = AttributeRecord::try_from(&json!({"age": null})).unwrap();
        assert_eq!(record.lookup("age"), Lookup::Missing);
    }

    #[test]
    fn from_json_array_is_unsupported() {
        let record = AttributeRecord::try_from(&json!({"tags": ["a", "b"]})).unwrap();
        assert_eq!(record.lookup("tags"), Lookup::Unsupported("array"));
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = AttributeRecord::try_from(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "attribute record must be a JSON object, got an array"
        );
    }
}
