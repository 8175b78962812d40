//! Credential cache and authentication decision engine for hyauth.
//!
//! Accounts are loaded as whole snapshots from an [`AccountStore`], held in a
//! [`CredentialCache`] that a background task refreshes on a fixed period, and
//! evaluated by the [`Authenticator`] rule pipeline.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hyauth_auth::{
//!     AccountRecord, AuthRequest, Authenticator, AuthenticatorConfig, CredentialCache,
//!     MemoryStore, VerdictService,
//! };
//!
//! # async fn example() {
//! let store = MemoryStore::from_accounts([("alice", AccountRecord::new("pw1"))]);
//! let cache = Arc::new(CredentialCache::load_initial(&store).await);
//! let auth = Authenticator::new(cache, AuthenticatorConfig::default());
//!
//! let verdict = auth.authenticate(&AuthRequest::new("alice:pw1")).await;
//! assert!(verdict.allowed);
//! assert_eq!(verdict.identity.as_deref(), Some("alice"));
//! # }
//! ```

mod cache;
mod compare;
mod engine;
mod error;
mod record;
mod refresher;
mod snapshot;
mod store;
mod traits;
mod verdict;

#[cfg(feature = "cli")]
pub mod cli;

pub use cache::CredentialCache;
pub use compare::secrets_match;
pub use engine::{Authenticator, AuthenticatorConfig, evaluate, split_credential};
pub use error::AuthError;
pub use record::{AccountRecord, ExpiredDatePolicy};
pub use refresher::{RefreshHandle, RefreshTrigger, spawn_refresher};
pub use snapshot::Snapshot;
pub use store::{AccountStore, FileStore, MemoryStore};
pub use traits::VerdictService;
pub use verdict::{AuthRequest, Denial, Verdict};

#[cfg(feature = "http")]
pub use store::HttpStore;

#[cfg(feature = "cli")]
pub use cli::AccountsArgs;
