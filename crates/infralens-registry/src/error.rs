//! Registry error types.

use thiserror::Error;

/// Errors raised inside the registry layer.
///
/// None of these escape the public lookup operations of
/// [`RegistryClient`](crate::RegistryClient); they are logged and turned into
/// "no result" there. They do surface from [`Transport`](crate::Transport)
/// implementations and from client construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Network failure, timeout, or TLS error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The registry answered with a non-success status.
    #[error("registry returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
    },

    /// The registry answered 404.
    #[error("not found: {path}")]
    NotFound {
        /// Request path.
        path: String,
    },

    /// The response body was not the JSON we expected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A single instance record could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client could not be built from the supplied configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// Whether this error is the upstream's "not found".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
