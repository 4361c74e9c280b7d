//! Envelope codec - the wire shapes exchanged with the host.
//!
//! The codec is pure and stateless. [`decode`] turns the raw input payload
//! into an [`InputEnvelope`]; [`encode`] turns an [`OutputEnvelope`] into
//! the single JSON payload for the output channel.
//!
//! # Decode tolerance
//!
//! The host does not promise a JSON object on the input channel. Anything
//! that fails to parse as one - empty input, malformed JSON, valid JSON
//! that is not an object - is accepted and carried as the body of an
//! otherwise-default envelope. Decoding has no error path.
//!
//! # Example
//!
//! ```
//! use callwire_guest::envelope::decode;
//! use callwire_guest::Body;
//!
//! let envelope = decode(br#"{"method": "GET", "uri": "/health"}"#);
//! assert_eq!(envelope.method, "GET");
//! assert_eq!(envelope.body, Body::Text(String::new()));
//!
//! let fallback = decode(b"not-json");
//! assert_eq!(fallback.body, Body::Text("not-json".to_string()));
//! assert_eq!(fallback.method, "POST");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::response::Body;

/// Request envelope as read from the input channel.
///
/// Every field is optional on the wire; missing fields take the defaults
/// the host assumes: empty body, no headers, `POST`, `/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputEnvelope {
    /// Request body: raw text or an inline JSON value.
    #[serde(default)]
    pub body: Body,
    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request method.
    #[serde(default = "default_method")]
    pub method: String,
    /// Request URI.
    #[serde(default = "default_uri")]
    pub uri: String,
}

impl Default for InputEnvelope {
    fn default() -> Self {
        Self {
            body: Body::default(),
            headers: BTreeMap::new(),
            method: default_method(),
            uri: default_uri(),
        }
    }
}

fn default_method() -> String {
    "POST".to_string()
}

fn default_uri() -> String {
    "/".to_string()
}

/// Response envelope as written to the output channel.
///
/// The body is always a string by this stage; structured response bodies
/// are JSON-serialized during flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    /// Response status code.
    pub status: u16,
    /// Finalized response headers.
    pub headers: BTreeMap<String, String>,
    /// Flattened response body.
    pub body: String,
}

/// Decode a raw input payload into an [`InputEnvelope`].
///
/// A JSON object populates the envelope field-wise, with defaults for the
/// missing fields. Anything else - including an object whose fields have
/// the wrong types - falls back to a default envelope carrying the entire
/// raw input as its body. Invalid UTF-8 is decoded lossily.
pub fn decode(raw: &[u8]) -> InputEnvelope {
    match serde_json::from_slice(raw) {
        Ok(envelope) => envelope,
        Err(_) => InputEnvelope {
            body: Body::Text(String::from_utf8_lossy(raw).into_owned()),
            ..InputEnvelope::default()
        },
    }
}

/// Encode an [`OutputEnvelope`] as the single JSON payload for the output
/// channel.
///
/// A status code, a string-to-string map, and a string cannot fail to
/// serialize, so the payload is returned directly.
pub fn encode(envelope: &OutputEnvelope) -> String {
    json!({
        "status": envelope.status,
        "headers": envelope.headers,
        "body": envelope.body,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_decode_full_object() {
        let envelope = decode(
            br#"{"body": "payload", "headers": {"X-Trace": "abc"}, "method": "GET", "uri": "/x"}"#,
        );
        assert_eq!(envelope.body, Body::Text("payload".to_string()));
        assert_eq!(envelope.headers["X-Trace"], "abc");
        assert_eq!(envelope.method, "GET");
        assert_eq!(envelope.uri, "/x");
    }

    #[test]
    fn test_decode_missing_fields_take_defaults() {
        let envelope = decode(b"{}");
        assert_eq!(envelope, InputEnvelope::default());
        assert_eq!(envelope.method, "POST");
        assert_eq!(envelope.uri, "/");
        assert!(envelope.headers.is_empty());
        assert_eq!(envelope.body, Body::Text(String::new()));
    }

    #[test]
    fn test_decode_structured_body_kept() {
        let envelope = decode(br#"{"body": {"x": 1}}"#);
        assert_eq!(
            envelope.body,
            Body::Structured(serde_json::json!({"x": 1}))
        );
    }

    #[test]
    fn test_decode_empty_input_falls_back() {
        let envelope = decode(b"");
        assert_eq!(envelope, InputEnvelope::default());
    }

    #[test]
    fn test_decode_malformed_input_falls_back() {
        let envelope = decode(b"not-json");
        assert_eq!(envelope.body, Body::Text("not-json".to_string()));
        assert_eq!(envelope.method, "POST");
        assert_eq!(envelope.uri, "/");
    }

    #[test]
    fn test_decode_non_object_json_falls_back() {
        let envelope = decode(b"[1,2,3]");
        assert_eq!(envelope.body, Body::Text("[1,2,3]".to_string()));
    }

    #[test]
    fn test_decode_mistyped_field_falls_back() {
        let raw = br#"{"headers": 5}"#;
        let envelope = decode(raw);
        assert_eq!(
            envelope.body,
            Body::Text(String::from_utf8_lossy(raw).into_owned())
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let envelope = decode(&[0xff, 0xfe, b'x']);
        match envelope.body {
            Body::Text(text) => assert!(text.ends_with('x')),
            Body::Structured(_) => panic!("raw bytes must fall back to text"),
        }
    }

    #[test]
    fn test_encode_round_trips_through_json() {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let envelope = OutputEnvelope {
            status: 200,
            headers,
            body: "ok".to_string(),
        };

        let payload = encode(&envelope);
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["headers"]["Content-Type"], "application/json");
        assert_eq!(parsed["body"], "ok");

        let recovered: OutputEnvelope = serde_json::from_str(&payload).unwrap();
        assert_eq!(recovered, envelope);
    }

    #[test]
    fn test_encode_body_is_always_a_json_string() {
        let envelope = OutputEnvelope {
            status: 500,
            headers: BTreeMap::new(),
            body: r#"{"error":"boom"}"#.to_string(),
        };
        let parsed: Value = serde_json::from_str(&encode(&envelope)).unwrap();
        assert!(parsed["body"].is_string());
    }
}
