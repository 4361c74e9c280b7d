//! Request value handed to the handler.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::envelope::InputEnvelope;
use crate::response::Body;

/// Immutable request for one invocation.
///
/// Built from the decoded input envelope with defaults already applied;
/// nothing about it changes once the handler sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    body: Body,
    headers: BTreeMap<String, String>,
    method: String,
    uri: String,
}

impl Request {
    /// The raw request body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// All request headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Look up a single header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Structured view of the body, derived on demand.
    ///
    /// A structured body is returned as-is; a text body is parsed as
    /// JSON. Any parse failure yields an empty JSON object - never an
    /// error. The view is recomputed on every call, not cached.
    pub fn structured_body(&self) -> Value {
        match &self.body {
            Body::Structured(value) => value.clone(),
            Body::Text(text) => {
                serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Map::new()))
            }
        }
    }
}

impl From<InputEnvelope> for Request {
    fn from(envelope: InputEnvelope) -> Self {
        Self {
            body: envelope.body,
            headers: envelope.headers,
            method: envelope.method,
            uri: envelope.uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::decode;
    use serde_json::json;

    #[test]
    fn test_envelope_fields_carry_over() {
        let request = Request::from(decode(
            br#"{"body": "b", "headers": {"X-Trace": "t"}, "method": "PUT", "uri": "/v"}"#,
        ));
        assert_eq!(request.body(), &Body::Text("b".to_string()));
        assert_eq!(request.header("X-Trace"), Some("t"));
        assert_eq!(request.header("X-Missing"), None);
        assert_eq!(request.method(), "PUT");
        assert_eq!(request.uri(), "/v");
    }

    #[test]
    fn test_defaults_applied() {
        let request = Request::from(decode(b"{}"));
        assert_eq!(request.method(), "POST");
        assert_eq!(request.uri(), "/");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_structured_body_returns_structured_value_as_is() {
        let request = Request::from(decode(br#"{"body": {"x": 1}}"#));
        assert_eq!(request.structured_body(), json!({"x": 1}));
    }

    #[test]
    fn test_structured_body_parses_text() {
        let request = Request::from(decode(br#"{"body": "{\"x\": 1}"}"#));
        assert_eq!(request.structured_body(), json!({"x": 1}));
    }

    #[test]
    fn test_structured_body_parse_failure_yields_empty_object() {
        let request = Request::from(decode(br#"{"body": "not json at all"}"#));
        assert_eq!(request.structured_body(), json!({}));
    }

    #[test]
    fn test_structured_body_empty_text_yields_empty_object() {
        let request = Request::from(decode(b"{}"));
        assert_eq!(request.structured_body(), json!({}));
    }

    #[test]
    fn test_structured_body_non_object_text_parses_through() {
        let request = Request::from(decode(br#"{"body": "[1, 2]"}"#));
        assert_eq!(request.structured_body(), json!([1, 2]));
    }
}
