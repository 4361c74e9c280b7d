//! Error types for callwire-guest.

use thiserror::Error;

/// Main error type for all guest-side operations.
#[derive(Debug, Error)]
pub enum CallwireError {
    /// I/O error while draining the request channel or writing the
    /// response channel.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The handler returned an error or panicked during the call.
    ///
    /// Displays as the bare fault description; the dispatcher copies it
    /// verbatim into the `"error"` field of the synthesized 500 envelope.
    #[error("{0}")]
    HandlerFault(String),
}

/// Result type alias using CallwireError.
pub type Result<T> = std::result::Result<T, CallwireError>;
