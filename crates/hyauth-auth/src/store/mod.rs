//! Account store adapters.
//!
//! This module provides:
//!
//! - [`AccountStore`] - data-access trait (implement this for new sources)
//! - [`FileStore`] - the JSON users file written by the panel tooling
//! - [`HttpStore`] - the same document fetched from a panel API (requires `http` feature)
//! - [`MemoryStore`] - an in-process snapshot for tests and embedding
//!
//! # Adding a new store
//!
//! ```ignore
//! use hyauth_auth::{AccountStore, AuthError, Snapshot};
//!
//! struct MyStore { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl AccountStore for MyStore {
//!     async fn load_all(&self) -> Result<Snapshot, AuthError> { todo!() }
//! }
//! ```

mod file;
mod memory;
mod traits;

#[cfg(feature = "http")]
mod http;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::AccountStore;

#[cfg(feature = "http")]
pub use http::HttpStore;
