//! hyauth server library.
//!
//! Exposes the loopback verdict endpoint for the binary, the unified CLI,
//! and integration tests.

pub mod cli;
mod error;
mod server;
mod signal;

pub use cli::ServerArgs;
pub use error::ServerError;
pub use server::{
    VerdictRequest, VerdictResponse, authenticator_config, build_store, router,
    run_with_shutdown, serve,
};
pub use tokio_util::sync::CancellationToken;
