//! Response values and return-shape normalization.
//!
//! Handlers are allowed to return more than one shape: a fully-formed
//! [`Response`], a bare JSON mapping, sequence, or string, or anything
//! else at all. [`ReturnValue`] names those shapes explicitly, and
//! [`Response::from_value`] folds every one of them into a canonical
//! response. The fold is total - normalization can never fail an
//! invocation.
//!
//! # Example
//!
//! ```
//! use callwire_guest::{Response, ReturnValue};
//! use serde_json::json;
//!
//! let value: ReturnValue = json!({"answer": 42}).into();
//! let response = Response::from_value(value);
//! let envelope = response.to_output_envelope();
//!
//! assert_eq!(envelope.status, 200);
//! assert_eq!(envelope.headers["Content-Type"], "application/json");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::OutputEnvelope;

/// Header always present on a finalized response.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Media type used when the handler does not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Runtime-identity header; the adapter owns this key unconditionally.
pub const RUNTIME_HEADER: &str = "X-Runtime";

/// Runtime-identity marker written by this SDK.
pub const RUNTIME_MARKER: &str = "Callwire-Rust";

/// A body that is either raw text or an inline JSON value.
///
/// Text passes through flattening unchanged; structured values are
/// JSON-serialized when the wire envelope is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Raw text, written to the wire as-is.
    Text(String),
    /// Structured JSON value, serialized at flatten time.
    Structured(Value),
}

impl Body {
    /// Flatten to the wire representation.
    pub fn flatten(&self) -> String {
        match self {
            Body::Text(text) => text.clone(),
            Body::Structured(value) => value.to_string(),
        }
    }

    /// Whether this body holds raw text.
    pub fn is_text(&self) -> bool {
        matches!(self, Body::Text(_))
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Text(String::new())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Value> for Body {
    /// String values become text, so a string body never gains JSON
    /// quotes on the wire.
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Body::Text(text),
            other => Body::Structured(other),
        }
    }
}

impl From<Map<String, Value>> for Body {
    fn from(map: Map<String, Value>) -> Self {
        Body::Structured(Value::Object(map))
    }
}

/// Response value constructed from a handler's return.
///
/// Header invariant, established at construction and re-asserted when the
/// envelope is built: the headers always contain a `Content-Type` entry
/// (the handler's own value wins over the default) and always contain the
/// `X-Runtime` marker, which the adapter overwrites unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    body: Body,
    status: u16,
    headers: BTreeMap<String, String>,
}

impl Response {
    /// Create a 200 response with default headers.
    pub fn new(body: impl Into<Body>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            CONTENT_TYPE_HEADER.to_string(),
            DEFAULT_CONTENT_TYPE.to_string(),
        );
        headers.insert(RUNTIME_HEADER.to_string(), RUNTIME_MARKER.to_string());
        Self {
            body: body.into(),
            status: 200,
            headers,
        }
    }

    /// Set the status code.
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any previous value for the key.
    ///
    /// Setting `X-Runtime` here has no effect on the wire; the marker is
    /// re-asserted when the envelope is built.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The response body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The response status code.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// The response headers as constructed so far.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Normalize a handler return shape into a response.
    ///
    /// Total over every [`ReturnValue`]: an explicit response passes
    /// through unchanged, a structured body wraps as a 200 response, and
    /// the opaque fallback becomes an empty-string 200 response.
    pub fn from_value(value: ReturnValue) -> Self {
        match value {
            ReturnValue::RawResponse(response) => response,
            ReturnValue::StructuredBody(body) => Response::new(body),
            ReturnValue::OpaqueFallback => Response::new(""),
        }
    }

    /// Build the wire envelope: flatten the body and finalize headers.
    pub fn to_output_envelope(&self) -> OutputEnvelope {
        let mut headers = self.headers.clone();
        headers
            .entry(CONTENT_TYPE_HEADER.to_string())
            .or_insert_with(|| DEFAULT_CONTENT_TYPE.to_string());
        // The marker identifies the adapter, not the handler.
        headers.insert(RUNTIME_HEADER.to_string(), RUNTIME_MARKER.to_string());
        OutputEnvelope {
            status: self.status,
            headers,
            body: self.body.flatten(),
        }
    }
}

/// The shapes a handler may return, named explicitly.
///
/// Conversions exist from every supported shape, so `value.into()` plus
/// [`Response::from_value`] replaces runtime type inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    /// A fully-formed response, passed through unchanged.
    RawResponse(Response),
    /// A JSON mapping, sequence, or string to wrap as a 200 response body.
    StructuredBody(Value),
    /// Any other shape; coerced to an empty-string 200 response.
    OpaqueFallback,
}

impl From<Response> for ReturnValue {
    fn from(response: Response) -> Self {
        ReturnValue::RawResponse(response)
    }
}

impl From<Value> for ReturnValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) | Value::Array(_) | Value::String(_) => {
                ReturnValue::StructuredBody(value)
            }
            _ => ReturnValue::OpaqueFallback,
        }
    }
}

impl From<Map<String, Value>> for ReturnValue {
    fn from(map: Map<String, Value>) -> Self {
        ReturnValue::StructuredBody(Value::Object(map))
    }
}

impl From<Vec<Value>> for ReturnValue {
    fn from(items: Vec<Value>) -> Self {
        ReturnValue::StructuredBody(Value::Array(items))
    }
}

impl From<String> for ReturnValue {
    fn from(text: String) -> Self {
        ReturnValue::StructuredBody(Value::String(text))
    }
}

impl From<&str> for ReturnValue {
    fn from(text: &str) -> Self {
        ReturnValue::StructuredBody(Value::String(text.to_string()))
    }
}

impl From<()> for ReturnValue {
    fn from(_: ()) -> Self {
        ReturnValue::OpaqueFallback
    }
}
