//! Object filters: nested criteria the server uses to select rows.
//!
//! The criteria themselves are opaque JSON; this type only knows how to
//! place them at a dotted key path.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A tree of filter criteria keyed by property path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObjectFilter {
    criteria: Map<String, Value>,
}

impl ObjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaf criteria in the form the remote API expects.
    pub fn operation(value: impl Into<Value>) -> Value {
        let mut leaf = Map::new();
        leaf.insert("operation".to_string(), value.into());
        Value::Object(leaf)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Set criteria at `key_path` (e.g. `virtualGuests.hostname`),
    /// creating intermediate objects and replacing non-object values on
    /// the way.
    pub fn set_criteria_at_path(&mut self, key_path: &str, criteria: impl Into<Value>) -> Result<()> {
        let keys = split_key_path(key_path)?;
        let (last, parents) = keys.split_last().ok_or_else(|| empty_path(key_path))?;

        let mut node = &mut self.criteria;
        for key in parents {
            let entry = node
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            node = entry.as_object_mut().ok_or_else(|| empty_path(key_path))?;
        }
        node.insert(last.to_string(), criteria.into());
        Ok(())
    }

    /// Builder form of [`ObjectFilter::set_criteria_at_path`].
    pub fn with_criteria(mut self, key_path: &str, criteria: impl Into<Value>) -> Result<Self> {
        self.set_criteria_at_path(key_path, criteria)?;
        Ok(self)
    }

    /// Criteria stored at `key_path`, if any.
    pub fn criteria_at_path(&self, key_path: &str) -> Option<&Value> {
        let mut keys = key_path.split('.');
        let mut value = self.criteria.get(keys.next()?)?;
        for key in keys {
            value = value.as_object()?.get(key)?;
        }
        Some(value)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.criteria.clone())
    }
}

fn split_key_path(key_path: &str) -> Result<Vec<&str>> {
    let keys: Vec<&str> = key_path.split('.').collect();
    if keys.iter().any(|key| key.trim().is_empty()) {
        return Err(empty_path(key_path));
    }
    Ok(keys)
}

fn empty_path(key_path: &str) -> Error {
    Error::InvalidArgument(format!("invalid object filter key path '{}'", key_path))
}

impl TryFrom<Value> for ObjectFilter {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(criteria) => Ok(Self { criteria }),
            other => Err(Error::InvalidArgument(format!(
                "object filter must be a JSON object, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_nested_criteria() {
        let mut filter = ObjectFilter::new();
        filter
            .set_criteria_at_path("virtualGuests.hostname", ObjectFilter::operation("*= web"))
            .unwrap();
        filter
            .set_criteria_at_path("virtualGuests.datacenter.name", ObjectFilter::operation("dal05"))
            .unwrap();

        assert_eq!(
            filter.to_value(),
            json!({
                "virtualGuests": {
                    "hostname": {"operation": "*= web"},
                    "datacenter": {"name": {"operation": "dal05"}}
                }
            })
        );
    }

    #[test]
    fn test_criteria_at_path() {
        let filter = ObjectFilter::new()
            .with_criteria("id", ObjectFilter::operation(1234))
            .unwrap();
        assert_eq!(filter.criteria_at_path("id"), Some(&json!({"operation": 1234})));
        assert_eq!(filter.criteria_at_path("id.operation"), Some(&json!(1234)));
        assert_eq!(filter.criteria_at_path("missing"), None);
        assert_eq!(filter.criteria_at_path("id.operation.deeper"), None);
    }

    #[test]
    fn test_replaces_scalar_on_path() {
        let mut filter = ObjectFilter::try_from(json!({"a": 5})).unwrap();
        filter.set_criteria_at_path("a.b", json!(true)).unwrap();
        assert_eq!(filter.to_value(), json!({"a": {"b": true}}));
    }

    #[test]
    fn test_rejects_bad_paths() {
        let mut filter = ObjectFilter::new();
        assert!(filter.set_criteria_at_path("", json!(1)).is_err());
        assert!(filter.set_criteria_at_path("a..b", json!(1)).is_err());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_try_from_requires_object() {
        assert!(ObjectFilter::try_from(json!([1, 2])).is_err());
        assert!(ObjectFilter::try_from(json!(null)).is_err());
        assert!(ObjectFilter::try_from(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_serializes_transparently() {
        let filter = ObjectFilter::new().with_criteria("id", json!({"operation": 1})).unwrap();
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"id": {"operation": 1}}));
    }
}
