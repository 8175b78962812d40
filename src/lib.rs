//! # hyauth
//!
//! Authentication verdict service for Hysteria2 proxy deployments.
//!
//! The proxy posts each connection's credential string to a loopback HTTP
//! endpoint and receives an allow/deny verdict evaluated against a cached
//! snapshot of the accounts store.
//!
//! ## Crates
//!
//! - [`hyauth_core`] - Shared defaults and label constants
//! - [`hyauth_auth`] - Account stores, credential cache, and decision engine
//! - [`hyauth_config`] - Configuration loading and validation
//! - [`hyauth_metrics`] - Prometheus-compatible metrics
//! - [`hyauth_server`] - Loopback verdict endpoint

pub use hyauth_auth as auth;
pub use hyauth_config as config;
pub use hyauth_core as core;
pub use hyauth_metrics as metrics;
pub use hyauth_server as server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use hyauth_auth::{
        AccountRecord, AccountStore, AuthRequest, Authenticator, AuthenticatorConfig,
        CredentialCache, FileStore, Verdict, VerdictService,
    };
    pub use hyauth_config::{Config, load_config, validate_config};
    pub use hyauth_server::{CancellationToken, ServerError, run_with_shutdown};
}
