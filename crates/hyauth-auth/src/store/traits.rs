//! Data-access trait for account stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthError;
use crate::snapshot::Snapshot;

/// Source of truth for account records.
///
/// Implementations only produce a full snapshot; caching, scheduling, and
/// the rule pipeline live in [`CredentialCache`](crate::CredentialCache) and
/// [`Authenticator`](crate::Authenticator).
///
/// A load either yields every account or fails. Implementations must not
/// return a partially decoded snapshot.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load all account records.
    async fn load_all(&self) -> Result<Snapshot, AuthError>;

    /// Short description of where accounts come from, for logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Blanket implementation for `Arc<S>` where `S: AccountStore`.
#[async_trait]
impl<S: AccountStore + ?Sized> AccountStore for Arc<S> {
    #[inline]
    async fn load_all(&self) -> Result<Snapshot, AuthError> {
        (**self).load_all().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Blanket implementation for `Box<S>` where `S: AccountStore`.
#[async_trait]
impl<S: AccountStore + ?Sized> AccountStore for Box<S> {
    #[inline]
    async fn load_all(&self) -> Result<Snapshot, AuthError> {
        (**self).load_all().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
