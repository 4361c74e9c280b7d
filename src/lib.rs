//! # callwire-guest
//!
//! Rust guest SDK for the Callwire invocation protocol.
//!
//! A Callwire host spawns one process per incoming call and exchanges
//! exactly one JSON request/response pair with it over standard I/O. This
//! crate is the guest side of that contract: it reads the request
//! envelope, hands a [`Request`] to your handler, normalizes whatever the
//! handler returns into a [`Response`], and writes the response envelope -
//! guaranteeing a well-formed envelope on the output channel even when
//! the handler fails.
//!
//! ## Architecture
//!
//! - **Request channel** (stdin): one JSON envelope, read to exhaustion
//! - **Response channel** (stdout): one JSON envelope, written once
//! - **Diagnostic channel** (stderr): leveled free-form lines, captured
//!   but never machine-parsed by the host
//!
//! ## Example
//!
//! ```ignore
//! use callwire_guest::{serve, HandlerResult, Request, Response};
//! use serde_json::json;
//!
//! fn greet(request: &Request) -> HandlerResult<Response> {
//!     let name = request.structured_body()["name"]
//!         .as_str()
//!         .unwrap_or("world")
//!         .to_string();
//!     Ok(Response::new(json!({ "greeting": format!("hello, {name}") })))
//! }
//!
//! fn main() -> callwire_guest::Result<()> {
//!     serve(greet)
//! }
//! ```

pub mod diag;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;

pub use diag::{Diagnostics, Level, StderrDiagnostics};
pub use dispatch::{serve, Dispatcher};
pub use error::{CallwireError, Result};
pub use handler::{Handler, HandlerError, HandlerResult, TypedHandler};
pub use request::Request;
pub use response::{Body, Response, ReturnValue};
