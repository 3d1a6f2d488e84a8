//! Parameter bag supplied per invocation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A scalar parameter value.
///
/// Path segments, query pairs, and JSON body fields all stringify or
/// serialize from the same scalar representation, so a caller can pass
/// `25` or `true` wherever a string would do.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&ParamValue> for Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Str(s) => Value::from(s.clone()),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(v) => Value::from(*v),
            ParamValue::Bool(b) => Value::from(*b),
        }
    }
}

/// The per-call parameter bag.
///
/// Keys bound into the URL path are consumed; whatever remains is sent as
/// query pairs or a JSON body depending on the HTTP method. Insertion order
/// is irrelevant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Whether the bag holds a value for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a value by key.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// The bag minus every key in `consumed`.
    ///
    /// This is the partition step after path binding: the returned bag is
    /// exactly what still has to travel as query or body data.
    pub fn without(&self, consumed: &BTreeSet<String>) -> Params {
        Params(
            self.0
                .iter()
                .filter(|(key, _)| !consumed.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Render the bag as query pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }

    /// Render the bag as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), Value::from(value)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_display_forms() {
        assert_eq!(ParamValue::from("qwerty").to_string(), "qwerty");
        assert_eq!(ParamValue::from(25).to_string(), "25");
        assert_eq!(ParamValue::from(-1).to_string(), "-1");
        assert_eq!(ParamValue::from(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::from(true).to_string(), "true");
    }

    #[test]
    fn without_removes_exactly_the_consumed_keys() {
        let bag = Params::new()
            .with("uuid", "qwerty")
            .with("order", "descending")
            .with("count", 25);

        let consumed: BTreeSet<String> = ["uuid".to_string()].into_iter().collect();
        let remaining = bag.without(&consumed);

        assert_eq!(remaining.len(), 2);
        assert!(!remaining.contains("uuid"));
        assert_eq!(remaining.get("order"), Some(&ParamValue::from("descending")));
        assert_eq!(remaining.get("count"), Some(&ParamValue::from(25)));
        // the source bag is untouched
        assert_eq!(bag.len(), 3);
    }

    #[test]
    fn to_json_builds_an_object() {
        let bag = Params::new().with("name", "David Bowie").with("value", 69);
        let json = bag.to_json();
        assert_eq!(json["name"], "David Bowie");
        assert_eq!(json["value"], 69);
    }

    #[test]
    fn to_query_pairs_stringifies_values() {
        let bag = Params::new().with("count", 25).with("limit", -1);
        let pairs = bag.to_query_pairs();
        assert!(pairs.contains(&("count".to_string(), "25".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "-1".to_string())));
    }
}
