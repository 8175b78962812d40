//! Server error types.

use hyauth_auth::AuthError;
use hyauth_config::ConfigError;
use hyauth_metrics::{ERROR_CONFIG, ERROR_IO};

/// Server error type.
///
/// Only startup and listener failures surface here. Store failures during
/// refresh are logged and never stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store: {0}")]
    Store(#[from] AuthError),
    #[error("config: {0}")]
    Config(String),
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl ServerError {
    /// Get the error type string for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Io(_) => ERROR_IO,
            ServerError::Store(e) => e.error_type(),
            ServerError::Config(_) => ERROR_CONFIG,
        }
    }
}
