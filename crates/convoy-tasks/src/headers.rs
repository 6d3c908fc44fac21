//! Task headers: the flat, string-keyed metadata map every signature carries
//! through the broker.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map;

/// Flat mapping from header name to an arbitrary JSON value.
///
/// The broker transports headers verbatim and attaches no meaning to them.
/// Application code may store any JSON value; cross-cutting layers (such as
/// trace propagation) add string-valued keys of their own. A layer that does
/// not own a key must not remove or reinterpret it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(HashMap<String, Value>);

impl Headers {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, overwriting any previous value at that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up the value stored at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up `key` and return it only if the stored value is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_overwrites_existing_value() {
        let mut headers = Headers::new();
        headers.insert("traceparent", "first");
        headers.insert("traceparent", "second");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get_str("traceparent"), Some("second"));
    }

    #[test]
    fn test_get_str_ignores_non_string_values() {
        let mut headers = Headers::new();
        headers.insert("retries", json!(3));
        headers.insert("origin", "api");

        assert_eq!(headers.get_str("retries"), None);
        assert_eq!(headers.get_str("origin"), Some("api"));
        assert_eq!(headers.get("retries"), Some(&json!(3)));
    }

    #[test]
    fn test_serde_round_trip_is_transparent() {
        let headers: Headers = [
            ("a".to_string(), json!("x")),
            ("b".to_string(), json!({"nested": true})),
        ]
        .into_iter()
        .collect();

        let encoded = serde_json::to_string(&headers).expect("encode headers");
        let decoded: Headers = serde_json::from_str(&encoded).expect("decode headers");
        assert_eq!(decoded, headers);
    }
}
