//! Authentication error types.

use hyauth_core::{ERROR_DECODE, ERROR_IO};

/// Failure to produce a snapshot from an account store.
///
/// These never reach a verdict caller: the cache logs them and keeps
/// serving the last good snapshot.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Reading the store failed (file I/O).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Store contents could not be decoded in full.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    /// Backend error (network, HTTP status, etc.).
    #[error("backend error: {0}")]
    Backend(String),
}

impl AuthError {
    /// Create a backend error from any error type.
    #[inline]
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::Io(_) | AuthError::Backend(_) => ERROR_IO,
            AuthError::Decode(_) => ERROR_DECODE,
        }
    }
}
