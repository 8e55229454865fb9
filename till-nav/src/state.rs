//! String-keyed value maps exchanged between the router and controllers.
//!
//! A [`StateMap`] carries navigation parameters into `initialize`, saved
//! controller state into history entries, and registration metadata. Values
//! are `serde_json::Value` so hosts can store anything JSON-shaped without
//! the core caring about the schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mapping of string keys to JSON values.
///
/// # Example
/// ```
/// use till_nav::StateMap;
///
/// let state = StateMap::new()
///     .with("selected", 3)
///     .with("filter", "beverages");
/// assert_eq!(state.get_i64("selected"), Some(3));
/// assert_eq!(state.get_str("filter"), Some("beverages"));
/// assert_eq!(state.get_str("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateMap(HashMap<String, Value>);

impl StateMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a value, replacing any previous value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StateMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters() {
        let mut state = StateMap::new();
        state.insert("count", 7);
        state.insert("label", "drafts");
        state.insert("ratio", 0.5);
        state.insert("open", true);

        assert_eq!(state.get_i64("count"), Some(7));
        assert_eq!(state.get_str("label"), Some("drafts"));
        assert_eq!(state.get_f64("ratio"), Some(0.5));
        assert_eq!(state.get_bool("open"), Some(true));
        // Wrong type reads as absent.
        assert_eq!(state.get_str("count"), None);
    }

    #[test]
    fn insert_replaces() {
        let state = StateMap::new().with("k", 1).with("k", 2);
        assert_eq!(state.len(), 1);
        assert_eq!(state.get_i64("k"), Some(2));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = StateMap::new().with("x", 1).with("y", 2);
        let b = StateMap::new().with("y", 2).with("x", 1);
        assert_eq!(a, b);
    }
}
