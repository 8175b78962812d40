//! Engine input and output types.

use hyauth_core::{
    DENY_BAD_SECRET, DENY_BLOCKED, DENY_EXPIRED, DENY_MALFORMED, DENY_NOT_FOUND, DENY_OVER_QUOTA,
};

/// One authentication attempt as handed over by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthRequest {
    /// Client address, informational only.
    pub addr: String,
    /// Credential string, `identity:secret`.
    pub auth: String,
    /// Transfer counter hint from the proxy. Not consumed by any rule.
    pub tx: u64,
}

impl AuthRequest {
    /// Create a request carrying only a credential string.
    pub fn new(auth: impl Into<String>) -> Self {
        Self {
            auth: auth.into(),
            ..Self::default()
        }
    }
}

/// The allow/deny decision returned to the transport.
///
/// Carries no reason: every denial looks the same to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the connection may proceed.
    pub allowed: bool,
    /// Identity key of the allowed account.
    pub identity: Option<String>,
}

impl Verdict {
    /// Allow the connection as `identity`.
    #[inline]
    pub fn allow(identity: impl Into<String>) -> Self {
        Self {
            allowed: true,
            identity: Some(identity.into()),
        }
    }

    /// Deny the connection.
    #[inline]
    pub fn deny() -> Self {
        Self::default()
    }
}

impl From<Result<String, Denial>> for Verdict {
    fn from(decision: Result<String, Denial>) -> Self {
        match decision {
            Ok(identity) => Self::allow(identity),
            Err(_) => Self::deny(),
        }
    }
}

/// Why a request was denied.
///
/// For logs and metrics only; it is dropped before the verdict leaves the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// Credential string had no separator.
    #[error("malformed credential")]
    Malformed,

    /// No account under the identity key.
    #[error("account not found")]
    NotFound,

    /// Account is blocked.
    #[error("account blocked")]
    Blocked,

    /// Secret did not match.
    #[error("secret mismatch")]
    BadSecret,

    /// Account is past its expiration date.
    #[error("account expired")]
    Expired,

    /// Account used up its quota.
    #[error("quota exceeded")]
    OverQuota,
}

impl Denial {
    /// Get the reason label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Denial::Malformed => DENY_MALFORMED,
            Denial::NotFound => DENY_NOT_FOUND,
            Denial::Blocked => DENY_BLOCKED,
            Denial::BadSecret => DENY_BAD_SECRET,
            Denial::Expired => DENY_EXPIRED,
            Denial::OverQuota => DENY_OVER_QUOTA,
        }
    }
}
