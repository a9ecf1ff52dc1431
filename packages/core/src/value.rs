//! The Value type - the data held in a shared namespace.
//!
//! Values are opaque to the synchronization core: it stores them, hands them
//! to listeners and compares them for equality, nothing else.

use std::collections::BTreeMap;

/// A tree-shaped value stored under a key.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering, so structural equality is
///   cheap to reason about
/// - Equality is structural; the change handler relies on it to suppress
///   redundant cache updates
/// - `Float(NAN)` never equals itself, so publishing NaN always counts as a change
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Explicit null. Distinct from "key not set".
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create a null value.
    pub fn null() -> Self {
        Value::Null
    }

    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in argument errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality() {
        let mut a = BTreeMap::new();
        a.insert("count".to_string(), Value::from(1));
        let mut b = BTreeMap::new();
        b.insert("count".to_string(), Value::from(1));

        assert_eq!(Value::Map(a), Value::Map(b));
        assert_ne!(Value::from(1), Value::from(1.0));
    }

    #[test]
    fn nan_is_never_equal() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7).as_i64(), Some(7));
        assert_eq!(Value::from(7).as_f64(), Some(7.0));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from("hi").as_i64(), None);
        assert!(Value::default().is_null());
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from(42).kind(), "integer");
        assert_eq!(Value::from("yes").kind(), "string");
        assert_eq!(Value::array().kind(), "array");
        assert_eq!(Value::map().kind(), "map");
    }

    #[test]
    fn vec_conversion() {
        let value = Value::from(vec![1i64, 2, 3]);
        assert_eq!(
            value,
            Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)])
        );
    }
}
