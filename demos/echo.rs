//! Echo function - simple request/response example.
//!
//! This example demonstrates:
//! - Serving a single invocation with [`callwire_guest::serve`]
//! - Reading the method, URI, and structured body from the request
//! - Returning a structured payload the adapter flattens onto the wire
//!
//! # Invoking as the host does
//!
//! ```sh
//! echo '{"body": {"message": "hello"}, "uri": "/echo"}' \
//!     | ./target/debug/examples/echo
//! ```

use callwire_guest::{serve, HandlerResult, Request, Response};
use serde_json::json;

/// Echo the request back as a structured payload.
fn echo(request: &Request) -> HandlerResult<Response> {
    Ok(Response::new(json!({
        "method": request.method(),
        "uri": request.uri(),
        "echo": request.structured_body(),
    })))
}

fn main() -> callwire_guest::Result<()> {
    serve(echo)
}
