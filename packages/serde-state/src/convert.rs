//! Conversions between Value and serde types.

use base64::Engine;
use framestate_core::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Convert a Value to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value_to_json(value))
}

/// Convert a Rust type to a Value via serde.
pub fn to_value<T: Serialize>(data: &T) -> Result<Value, serde_json::Error> {
    Ok(json_to_value(serde_json::to_value(data)?))
}

/// Convert our Value to serde_json::Value.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        // JSON has no byte strings
        Value::Bytes(b) => {
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(&b))
        }
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert serde_json::Value to our Value.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                // Arbitrary-precision numbers
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Filter {
        query: String,
        page: u32,
        archived: bool,
    }

    #[test]
    fn struct_becomes_map() {
        let filter = Filter {
            query: "rust".to_string(),
            page: 2,
            archived: false,
        };

        match to_value(&filter).unwrap() {
            Value::Map(map) => {
                assert_eq!(map.get("query"), Some(&Value::from("rust")));
                assert_eq!(map.get("page"), Some(&Value::Integer(2)));
                assert_eq!(map.get("archived"), Some(&Value::Bool(false)));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn map_becomes_struct() {
        let value = json_to_value(serde_json::json!({
            "query": "sync",
            "page": 1,
            "archived": true
        }));

        let filter: Filter = from_value(value).unwrap();
        assert_eq!(
            filter,
            Filter {
                query: "sync".to_string(),
                page: 1,
                archived: true,
            }
        );
    }

    #[test]
    fn wrong_shape_fails() {
        let result: Result<Filter, _> = from_value(Value::from(42));
        assert!(result.is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(json_to_value(serde_json::json!(-100)), Value::Integer(-100));
        assert!(matches!(
            json_to_value(serde_json::json!(u64::MAX)),
            Value::Float(_)
        ));
        match json_to_value(serde_json::json!(2.75)) {
            Value::Float(f) => assert!((f - 2.75).abs() < 0.001),
            other => panic!("expected float, got {:?}", other),
        }
        assert_eq!(value_to_json(Value::Float(f64::NAN)), serde_json::Value::Null);
    }

    #[test]
    fn bytes_are_base64() {
        assert_eq!(
            value_to_json(Value::Bytes(b"hi".to_vec())),
            serde_json::Value::String("aGk=".to_string())
        );
    }
}
