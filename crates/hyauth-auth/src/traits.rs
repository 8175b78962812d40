//! Decision service trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::verdict::{AuthRequest, Denial, Verdict};

/// Trait for verdict engines behind the transport.
///
/// Implementations must be thread-safe (`Send + Sync`) as they may be
/// called concurrently from multiple requests.
#[async_trait]
pub trait VerdictService: Send + Sync {
    /// Decide one authentication attempt.
    ///
    /// # Returns
    /// * `Ok(identity)` - The connection may proceed as `identity`
    /// * `Err(Denial)` - The connection is refused; the reason is internal
    async fn decide(&self, request: &AuthRequest) -> Result<String, Denial>;

    /// Decide and strip the reason.
    #[inline]
    async fn authenticate(&self, request: &AuthRequest) -> Verdict {
        self.decide(request).await.into()
    }
}

/// Blanket implementation for `Arc<A>` where `A: VerdictService`.
///
/// This allows passing `Arc<VerdictService>` directly to functions expecting `impl VerdictService`.
#[async_trait]
impl<A: VerdictService + ?Sized> VerdictService for Arc<A> {
    #[inline]
    async fn decide(&self, request: &AuthRequest) -> Result<String, Denial> {
        (**self).decide(request).await
    }
}

/// Blanket implementation for `Box<A>` where `A: VerdictService`.
#[async_trait]
impl<A: VerdictService + ?Sized> VerdictService for Box<A> {
    #[inline]
    async fn decide(&self, request: &AuthRequest) -> Result<String, Denial> {
        (**self).decide(request).await
    }
}
