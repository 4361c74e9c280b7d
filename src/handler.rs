//! Handler seam - what user functions look like to the dispatcher.
//!
//! Provides:
//! - [`Handler`] - the trait the dispatcher invokes exactly once
//! - [`TypedHandler`] - adapts a plain function into a [`Handler`]
//!
//! # Example
//!
//! ```
//! use callwire_guest::envelope::InputEnvelope;
//! use callwire_guest::{Handler, HandlerResult, Request, Response, TypedHandler};
//!
//! fn greet(request: &Request) -> HandlerResult<Response> {
//!     Ok(Response::new(format!("hello from {}", request.uri())))
//! }
//!
//! let handler = TypedHandler::new(greet);
//! let value = handler.call(&Request::from(InputEnvelope::default())).unwrap();
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::error::{CallwireError, Result};
use crate::request::Request;
use crate::response::ReturnValue;

/// Boxed error type for handler authors.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for handler functions.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Trait for the user-supplied function servicing the invocation.
///
/// Usually implemented for you via [`TypedHandler`]; the dispatcher only
/// needs the one method.
pub trait Handler {
    /// Handle the request, producing a shape the dispatcher can normalize.
    fn call(&self, request: &Request) -> Result<ReturnValue>;
}

/// Wrapper that adapts a plain function into a [`Handler`].
///
/// Accepts any `Fn(&Request) -> Result<T, E>` where `T` converts into a
/// [`ReturnValue`] and `E` has a textual description. An `Err` return
/// becomes a handler fault carrying that description.
pub struct TypedHandler<F, T, E>
where
    F: Fn(&Request) -> std::result::Result<T, E>,
    T: Into<ReturnValue>,
    E: fmt::Display,
{
    handler: F,
    _phantom: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> TypedHandler<F, T, E>
where
    F: Fn(&Request) -> std::result::Result<T, E>,
    T: Into<ReturnValue>,
    E: fmt::Display,
{
    /// Create a new typed handler.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, E> Handler for TypedHandler<F, T, E>
where
    F: Fn(&Request) -> std::result::Result<T, E>,
    T: Into<ReturnValue>,
    E: fmt::Display,
{
    fn call(&self, request: &Request) -> Result<ReturnValue> {
        match (self.handler)(request) {
            Ok(value) => Ok(value.into()),
            Err(fault) => Err(CallwireError::HandlerFault(fault.to_string())),
        }
    }
}
