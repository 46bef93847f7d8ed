//! Value store - named intermediate results threaded through a run

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Mutable mapping of named values for a single pipeline invocation.
///
/// Seeded from the caller's initial bindings; successful stages bind their
/// declared outputs here. Keys are never removed during a run, though a
/// later stage may overwrite an earlier binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueStore {
    values: HashMap<String, Value>,
}

impl ValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, builder-style
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Bind a value to a key, replacing any previous binding
    pub fn insert(&mut self, key: String, value: Value) {
        self.values.insert(key, value);
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check whether a key is bound
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over bound key names
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl From<HashMap<String, Value>> for ValueStore {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}
