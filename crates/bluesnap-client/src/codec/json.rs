//! # JSON Codec
//!
//! Payment API payloads derive `Serialize` and only emit fields that carry a
//! value: `None`, blank strings, empty lists and nested objects that are
//! absent or would encode to `{}` are all skipped.

use super::{DecodeError, WireFormat};
use bluesnap_core::{BlueSnapError, BlueSnapResult};
use serde::Serialize;
use serde_json::Value;

/// `skip_serializing_if` predicate for optional text fields
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// `skip_serializing_if` predicate for nested optional payloads: absent, or
/// present but encoding to `{}`
pub fn is_empty_object<T: Serialize>(value: &Option<T>) -> bool {
    match value {
        None => true,
        Some(inner) => matches!(
            serde_json::to_value(inner),
            Ok(Value::Object(ref fields)) if fields.is_empty()
        ),
    }
}

/// Ensure a required text field carries a value
pub(crate) fn require(field: &str, value: &str) -> BlueSnapResult<()> {
    if value.trim().is_empty() {
        return Err(BlueSnapError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Encode a payload as a JSON value
pub fn to_value<T: Serialize>(payload: &T) -> BlueSnapResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| BlueSnapError::Serialization(format!("Failed to encode JSON: {}", e)))
}

/// Encode a payload as a JSON request body
pub fn encode<T: Serialize>(payload: &T) -> BlueSnapResult<String> {
    serde_json::to_string(payload)
        .map_err(|e| BlueSnapError::Serialization(format!("Failed to encode JSON: {}", e)))
}

pub fn decode(body: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(body).map_err(|e| DecodeError::new(WireFormat::Json, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        first_name: String,
        #[serde(skip_serializing_if = "is_blank")]
        address2: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        items: Vec<u8>,
    }

    #[test]
    fn test_blank_optionals_are_skipped() {
        for address2 in [None, Some(String::new()), Some("   ".to_string())] {
            let value = to_value(&Sample {
                first_name: "John".into(),
                address2,
                items: Vec::new(),
            })
            .unwrap();
            assert_eq!(value, json!({"firstName": "John"}));
        }

        let value = to_value(&Sample {
            first_name: "John".into(),
            address2: Some("Flat 2".into()),
            items: vec![1, 2],
        })
        .unwrap();
        assert_eq!(value, json!({"firstName": "John", "address2": "Flat 2", "items": [1, 2]}));
    }

    #[derive(Default, Serialize)]
    struct Nested {
        #[serde(skip_serializing_if = "is_blank")]
        note: Option<String>,
    }

    #[test]
    fn test_empty_nested_object() {
        assert!(is_empty_object::<Nested>(&None));
        assert!(is_empty_object(&Some(Nested::default())));
        assert!(is_empty_object(&Some(&Nested {
            note: Some(" ".into())
        })));
        assert!(!is_empty_object(&Some(Nested {
            note: Some("gift".into())
        })));
        assert!(!is_empty_object(&Some("text")));
    }

    #[test]
    fn test_require() {
        assert!(require("firstName", "John").is_ok());
        let err = require("firstName", " ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: firstName is required");
    }

    #[test]
    fn test_decode_error_keeps_format() {
        let err = decode("not json").unwrap_err();
        assert_eq!(err.format, WireFormat::Json);
    }
}
