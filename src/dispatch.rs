//! Dispatcher - the one-invocation lifecycle.
//!
//! One process serves exactly one call:
//!
//! 1. Drain the request channel
//! 2. Decode the input envelope (total, never fails)
//! 3. Invoke the handler exactly once
//! 4. Normalize the returned shape into a response
//! 5. Write the response envelope as the sole output payload
//!
//! Every fault along the way - a read failure, a handler error, a handler
//! panic - is folded into a well-formed 500 envelope in one place,
//! reported on the diagnostic channel, and written like any other
//! response. The process exit status is not part of the contract: the
//! host reads failure from the envelope's status field, never from the
//! exit code.
//!
//! # Example
//!
//! ```ignore
//! use callwire_guest::{serve, HandlerResult, Request, Response};
//!
//! fn handler(request: &Request) -> HandlerResult<Response> {
//!     Ok(Response::new(request.structured_body()))
//! }
//!
//! fn main() -> callwire_guest::Result<()> {
//!     serve(handler)
//! }
//! ```

use std::fmt;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};

use serde_json::json;

use crate::diag::{Diagnostics, StderrDiagnostics};
use crate::envelope;
use crate::error::{CallwireError, Result};
use crate::handler::{Handler, TypedHandler};
use crate::request::Request;
use crate::response::{Response, ReturnValue};

/// Orchestrates one invocation from channel to channel.
///
/// Construct with [`Dispatcher::new`] for stderr diagnostics, or
/// [`Dispatcher::with_diagnostics`] to inject a capture double in tests.
pub struct Dispatcher<D = StderrDiagnostics> {
    diagnostics: D,
}

impl Dispatcher<StderrDiagnostics> {
    /// Create a dispatcher reporting diagnostics on stderr.
    pub fn new() -> Self {
        Self {
            diagnostics: StderrDiagnostics,
        }
    }
}

impl Default for Dispatcher<StderrDiagnostics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Diagnostics> Dispatcher<D> {
    /// Create a dispatcher with an explicit diagnostics sink.
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    /// Run one invocation: read the request channel to exhaustion, invoke
    /// the handler, and write exactly one response envelope.
    ///
    /// A trapped failure still produces a well-formed envelope (status
    /// 500, body `{"error": .., "type": "RuntimeError"}`) and returns
    /// `Ok`; the error return is reserved for faults on the output
    /// channel itself, after which no envelope can be delivered at all.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the response envelope cannot be written.
    pub fn run<R, W, H>(&mut self, reader: R, mut writer: W, handler: &H) -> Result<()>
    where
        R: Read,
        W: Write,
        H: Handler,
    {
        let response = match self.invoke(reader, handler) {
            Ok(response) => response,
            Err(fault) => self.trap(fault),
        };

        // 5. Write the envelope as the sole payload and flush; the host
        // reads the channel to EOF.
        let payload = envelope::encode(&response.to_output_envelope());
        writer.write_all(payload.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Steps 1-4: everything that can fault ahead of the write.
    fn invoke<R: Read, H: Handler>(&mut self, mut reader: R, handler: &H) -> Result<Response> {
        // 1. Drain the request channel before anything else runs.
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        // 2. Decode; malformed input becomes the body of a default
        // envelope rather than a fault.
        let request = Request::from(envelope::decode(&raw));
        tracing::debug!(
            method = request.method(),
            uri = request.uri(),
            raw_len = raw.len(),
            "request decoded"
        );

        // 3. Invoke the handler exactly once, trapping panics alongside
        // error returns.
        let value = panic::catch_unwind(AssertUnwindSafe(|| handler.call(&request)))
            .unwrap_or_else(|payload| {
                Err(CallwireError::HandlerFault(panic_description(
                    payload.as_ref(),
                )))
            })?;

        // 4. Normalize; total over every return shape.
        Ok(Response::from_value(value))
    }

    /// The centralized fault conversion: report on the diagnostic
    /// channel, then synthesize the error response.
    fn trap(&mut self, fault: CallwireError) -> Response {
        let description = fault.to_string();
        self.diagnostics
            .error(&format!("runtime fault: {description}"));
        tracing::error!(%description, "invocation trapped a fault");
        Response::new(json!({
            "error": description,
            "type": "RuntimeError",
        }))
        .status(500)
    }
}

/// Extract a printable description from a panic payload.
fn panic_description(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Serve one invocation over stdin/stdout with stderr diagnostics.
///
/// The usual entry point for a function binary: pass any
/// `Fn(&Request) -> Result<T, E>` where `T` converts into a
/// [`ReturnValue`] and `E` describes itself.
pub fn serve<F, T, E>(handler: F) -> Result<()>
where
    F: Fn(&Request) -> std::result::Result<T, E>,
    T: Into<ReturnValue>,
    E: fmt::Display,
{
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Dispatcher::new().run(stdin.lock(), stdout.lock(), &TypedHandler::new(handler))
}
