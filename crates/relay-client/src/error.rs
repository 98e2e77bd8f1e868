//! Relay client error types.

use thiserror::Error;

/// Errors produced by the relay management API client.
#[derive(Debug, Error)]
pub enum RelayClientError {
    /// The HTTP client could not be constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request-level failure: connection refused, timeout, or a
    /// non-success response with no more specific mapping.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The relay rejected a create because the player key exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The relay does not know the referenced player key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The relay answered, but with an error envelope or a body that
    /// does not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
