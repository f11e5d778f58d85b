//! Request parameter map (query string + body + decoded payload).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mutable key/value view of one inbound request.
///
/// Created per request cycle and discarded at its end. Keys keep their
/// insertion order so snapshots read like the original request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams {
    data: Map<String, Value>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string pairs; later pairs override earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key, Value::String(value.into()));
        }
        params
    }

    /// Whether `key` is present at all (an empty value still counts).
    pub fn exists(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn input(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// String input; numbers and booleans are rendered as text.
    pub fn input_str(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    pub fn all(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Snapshot of the whole parameter set as a JSON object.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.data.clone())
    }

    /// Merge `other` into the request. Keys from `other` win.
    pub fn merge(&mut self, other: Map<String, Value>) {
        for (key, value) in other {
            self.data.insert(key, value);
        }
    }

    /// Replace the whole parameter set.
    pub fn set_data(&mut self, data: Map<String, Value>) {
        self.data = data;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}
