//! # Response Classifier
//!
//! Turns `(status, format, raw body)` into exactly one [`Outcome`]. The
//! classifier is a pure function: it never panics and never returns an
//! error of its own, whatever the gateway sends.
//!
//! Failure bodies are resolved through an ordered decision table over
//! [`ErrorShape`]:
//!
//! | shape            | result                                        |
//! |------------------|-----------------------------------------------|
//! | `Empty`          | API failure, `<no response body>`             |
//! | `BareText`       | API failure, the wrapped text                 |
//! | `MultiMessage`   | API failure carrying the message list         |
//! | `SingleMessage`  | card failure for decline codes, else API      |
//! | `Unrecognized`   | unclassifiable                                |

use crate::codec::{decode_body, WireFormat};
use bluesnap_core::{ApiError, BlueSnapError, CardError, NO_RESPONSE_BODY};
use serde_json::{Map, Value};

/// Gateway codes reported for card declines
pub const CARD_DECLINE_CODES: &[&str] = &["14002"];

pub fn is_card_decline_code(code: &str) -> bool {
    CARD_DECLINE_CODES.contains(&code)
}

/// Result of classifying one response
#[derive(Debug)]
pub enum Outcome {
    /// 2xx; the decoded body, or the raw text when it would not decode
    Success(Option<Value>),
    /// Non-2xx resolved to a typed gateway failure
    Failure(BlueSnapError),
    /// Non-2xx whose body decoded but matched no known error shape
    Unclassifiable { status: u16, body: Value },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Collapse into the caller-facing result
    pub fn into_result(self) -> Result<Option<Value>, BlueSnapError> {
        match self {
            Outcome::Success(body) => Ok(body),
            Outcome::Failure(err) => Err(err),
            Outcome::Unclassifiable { status, body } => Err(ApiError::with_description(
                format!("Invalid messages object in response from API: {}", body),
                Some(status),
            )
            .into()),
        }
    }
}

/// Shape of a decoded failure body, after JSON normalization
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorShape<'a> {
    Empty,
    BareText(&'a str),
    SingleMessage(&'a Value),
    MultiMessage(&'a [Value]),
    Unrecognized,
}

impl<'a> ErrorShape<'a> {
    pub fn of(body: Option<&'a Value>) -> Self {
        let Some(body) = body else {
            return ErrorShape::Empty;
        };

        // <xml>text</xml>
        if let Some(Value::String(text)) = body.get("xml") {
            return ErrorShape::BareText(text);
        }

        match body.get("messages").and_then(|m| m.get("message")) {
            Some(Value::Array(messages)) if !messages.is_empty() => {
                ErrorShape::MultiMessage(messages)
            }
            Some(message @ Value::Object(_)) => ErrorShape::SingleMessage(message),
            _ => ErrorShape::Unrecognized,
        }
    }
}

/// Bring a JSON error body into the `messages.message` shape XML uses.
///
/// The payment API answers with either a bare list of message objects or
/// `{"message": [...]}`.
pub fn normalize(format: WireFormat, body: Value) -> Value {
    if format == WireFormat::Xml {
        return body;
    }

    match body {
        Value::Array(messages) => {
            let mut inner = Map::new();
            inner.insert("message".to_string(), Value::Array(messages));
            wrap_messages(Value::Object(inner))
        }
        Value::Object(object) if object.contains_key("message") => {
            wrap_messages(Value::Object(object))
        }
        other => other,
    }
}

fn wrap_messages(inner: Value) -> Value {
    let mut outer = Map::new();
    outer.insert("messages".to_string(), inner);
    Value::Object(outer)
}

/// Classify one gateway response
pub fn classify(status: u16, format: WireFormat, raw_body: &str) -> Outcome {
    let success = (200..300).contains(&status);

    let decoded = match decode_body(format, raw_body) {
        Ok(decoded) => decoded,
        Err(_) if success => return Outcome::Success(Some(Value::String(raw_body.to_string()))),
        Err(_) => {
            return Outcome::Failure(ApiError::with_description(raw_body, Some(status)).into())
        }
    };

    if success {
        return Outcome::Success(decoded);
    }

    let normalized = decoded
        .filter(|body| !is_empty_body(body))
        .map(|body| normalize(format, body));

    match ErrorShape::of(normalized.as_ref()) {
        ErrorShape::Empty => {
            Outcome::Failure(ApiError::with_description(NO_RESPONSE_BODY, Some(status)).into())
        }
        ErrorShape::BareText(text) => {
            Outcome::Failure(ApiError::with_description(text, Some(status)).into())
        }
        ErrorShape::MultiMessage(messages) => {
            Outcome::Failure(ApiError::with_messages(messages.to_vec(), Some(status)).into())
        }
        ErrorShape::SingleMessage(message) => match single_message(message, status) {
            Some(err) => Outcome::Failure(err),
            None => unclassifiable(status, normalized.as_ref()),
        },
        ErrorShape::Unrecognized => unclassifiable(status, normalized.as_ref()),
    }
}

/// `[]` and `{}` carry no more than a missing body
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

fn unclassifiable(status: u16, body: Option<&Value>) -> Outcome {
    Outcome::Unclassifiable {
        status,
        body: body.cloned().unwrap_or(Value::Null),
    }
}

fn single_message(message: &Value, status: u16) -> Option<BlueSnapError> {
    let description = message.get("description")?.as_str()?;
    let code = match message.get("code") {
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Number(code)) => Some(code.to_string()),
        _ => None,
    };

    let err = match code {
        Some(code) if is_card_decline_code(&code) => {
            CardError::new(description, Some(code), Some(status)).into()
        }
        code => ApiError::with_description(description, Some(status))
            .with_code(code)
            .into(),
    };
    Some(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DECLINE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<messages xmlns="http://ws.plimus.com">
  <message>
    <error-name>CALL_PROCESSOR_FAILED</error-name>
    <code>14002</code>
    <description>Order creation could not be completed because of payment processing failure: 430306 - The transaction has been declined. Please use a different card.</description>
  </message>
</messages>"#;

    fn failure(outcome: Outcome) -> BlueSnapError {
        match outcome {
            Outcome::Failure(err) => err,
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_decline_codes() {
        assert!(is_card_decline_code("14002"));
        assert!(!is_card_decline_code("10000"));
        assert!(!is_card_decline_code(""));
    }

    #[test]
    fn test_success_returns_body() {
        let outcome = classify(200, WireFormat::Json, r#"{"transactionId": "1012"}"#);
        assert_eq!(
            outcome.into_result().unwrap(),
            Some(json!({"transactionId": "1012"}))
        );

        assert_eq!(classify(204, WireFormat::Xml, "").into_result().unwrap(), None);
    }

    #[test]
    fn test_success_with_undecodable_body_does_not_fail() {
        let outcome = classify(200, WireFormat::Xml, "OK, not xml");
        assert!(outcome.is_success());
        assert_eq!(
            outcome.into_result().unwrap(),
            Some(Value::String("OK, not xml".to_string()))
        );
    }

    #[test]
    fn test_failure_with_undecodable_body_uses_raw_text() {
        let err = failure(classify(403, WireFormat::Xml, "Access denied"));
        match err {
            BlueSnapError::Api(api) => {
                assert_eq!(api.description.as_deref(), Some("Access denied"));
                assert_eq!(api.status_code, Some(403));
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_failure_body_uses_placeholder() {
        let err = failure(classify(500, WireFormat::Xml, ""));
        assert_eq!(
            err.to_string(),
            "<no response body> (HTTP status code was 500)"
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_bare_text_wrapper() {
        let err = failure(classify(
            403,
            WireFormat::Xml,
            "<xml>User: API_1 is not authorized to view shopper: 42.</xml>",
        ));
        assert_eq!(
            err.to_string(),
            "User: API_1 is not authorized to view shopper: 42. (HTTP status code was 403)"
        );
    }

    #[test]
    fn test_card_decline_is_refined() {
        let err = failure(classify(400, WireFormat::Xml, DECLINE_XML));
        match &err {
            BlueSnapError::Card(card) => {
                assert_eq!(card.code.as_deref(), Some("430306-14002"));
                assert_eq!(
                    card.description,
                    "The transaction has been declined. Please use a different card."
                );
                assert!(card.verbose_description.starts_with("Order creation"));
            }
            other => panic!("expected card error, got {:?}", other),
        }
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn test_single_message_with_other_code_is_api_error() {
        let body = "<messages><message><code>10000</code>\
                    <description>Shopper not found</description></message></messages>";
        let err = failure(classify(404, WireFormat::Xml, body));

        assert!(!err.is_card_error());
        assert_eq!(err.gateway_code(), Some("10000"));
        assert_eq!(
            err.to_string(),
            "Shopper not found (BlueSnap error code was 10000) (HTTP status code was 404)"
        );
    }

    #[test]
    fn test_multiple_messages() {
        let body = "<messages>\
            <message><code>10001</code><description>Invalid zip</description></message>\
            <message><code>10001</code><description>Invalid city</description></message>\
            </messages>";
        let err = failure(classify(400, WireFormat::Xml, body));

        match &err {
            BlueSnapError::Api(api) => {
                assert!(api.description.is_none());
                assert_eq!(api.messages.len(), 2);
                assert_eq!(api.messages[1]["description"], json!("Invalid city"));
            }
            other => panic!("expected api error, got {:?}", other),
        }
        assert!(err.to_string().contains("Invalid zip"));
        assert!(err.to_string().contains("Invalid city"));
    }

    #[test]
    fn test_json_message_list() {
        let body = r#"[{"errorName": "INVALID_INPUT", "code": "10001", "description": "Invalid amount"},
                      {"errorName": "INVALID_INPUT", "code": "10001", "description": "Invalid currency"}]"#;
        let err = failure(classify(400, WireFormat::Json, body));
        match err {
            BlueSnapError::Api(api) => assert_eq!(api.messages.len(), 2),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_single_entry_list_is_api_error() {
        let body = json!({
            "message": [{
                "errorName": "CALL_PROCESSOR_FAILED",
                "code": 14002,
                "description": "Order creation could not be completed because of payment processing failure: 430285 - Insufficient funds"
            }]
        })
        .to_string();

        let err = failure(classify(402, WireFormat::Json, &body));
        assert!(!err.is_card_error());
        match &err {
            BlueSnapError::Api(api) => {
                assert_eq!(api.messages.len(), 1);
                assert_eq!(api.messages[0]["code"], json!(14002));
                assert_eq!(api.status_code, Some(402));
            }
            other => panic!("expected api error, got {:?}", other),
        }
        assert!(err.to_string().contains("Insufficient funds"));
    }

    #[test]
    fn test_empty_json_failure_body_uses_placeholder() {
        for body in ["[]", "{}", " [ ] "] {
            let err = failure(classify(400, WireFormat::Json, body));
            assert_eq!(
                err.to_string(),
                "<no response body> (HTTP status code was 400)"
            );
        }
    }

    #[test]
    fn test_unrecognized_shape_is_unclassifiable() {
        let outcome = classify(500, WireFormat::Json, r#"{"status": "broken"}"#);
        assert!(matches!(outcome, Outcome::Unclassifiable { status: 500, .. }));

        let err = outcome.into_result().unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Invalid messages object in response from API: "));
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn test_message_without_description_is_unclassifiable() {
        let body = "<messages><message><code>14002</code></message></messages>";
        assert!(matches!(
            classify(400, WireFormat::Xml, body),
            Outcome::Unclassifiable { .. }
        ));
    }

    #[test]
    fn test_normalize_only_touches_json() {
        let list = json!([{"code": "1"}]);
        assert_eq!(normalize(WireFormat::Xml, list.clone()), list);
        assert_eq!(
            normalize(WireFormat::Json, list),
            json!({"messages": {"message": [{"code": "1"}]}})
        );
        assert_eq!(
            normalize(WireFormat::Json, json!({"message": []})),
            json!({"messages": {"message": []}})
        );
        assert_eq!(normalize(WireFormat::Json, json!("text")), json!("text"));
    }

    #[test]
    fn test_error_shapes() {
        assert_eq!(ErrorShape::of(None), ErrorShape::Empty);
        assert_eq!(
            ErrorShape::of(Some(&json!({"xml": "denied"}))),
            ErrorShape::BareText("denied")
        );
        assert_eq!(
            ErrorShape::of(Some(&json!({"messages": {"message": []}}))),
            ErrorShape::Unrecognized
        );
        assert_eq!(ErrorShape::of(Some(&json!(null))), ErrorShape::Unrecognized);
    }
}
