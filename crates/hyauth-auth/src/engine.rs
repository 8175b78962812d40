//! Authentication decision engine.
//!
//! Rules run in a fixed order and the first failing rule wins:
//! parse → existence → blocked → secret → unlimited override → expiration → quota.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hyauth_core::{CREDENTIAL_SEPARATOR, DEFAULT_MISMATCH_DELAY_MS};
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::cache::CredentialCache;
use crate::compare::secrets_match;
use crate::record::{AccountRecord, ExpiredDatePolicy};
use crate::traits::VerdictService;
use crate::verdict::{AuthRequest, Denial};

/// Tunables for [`Authenticator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatorConfig {
    /// Delay before answering a secret mismatch.
    pub mismatch_delay: Duration,
    /// Treatment of unparseable creation dates on expiring accounts.
    pub expired_date_policy: ExpiredDatePolicy,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            mismatch_delay: Duration::from_millis(DEFAULT_MISMATCH_DELAY_MS),
            expired_date_policy: ExpiredDatePolicy::default(),
        }
    }
}

/// Split a credential into identity key and secret at the first separator.
///
/// The secret may itself contain separators.
#[inline]
pub fn split_credential(auth: &str) -> Option<(&str, &str)> {
    auth.split_once(CREDENTIAL_SEPARATOR)
}

/// Apply the per-account rules to a record that exists.
///
/// Checks: blocked → secret → unlimited override → expired → quota.
pub fn evaluate(
    record: &AccountRecord,
    secret: &str,
    today: Date,
    policy: ExpiredDatePolicy,
) -> Result<(), Denial> {
    if record.blocked {
        return Err(Denial::Blocked);
    }

    if !secrets_match(&record.password, secret) {
        return Err(Denial::BadSecret);
    }

    if record.unlimited {
        return Ok(());
    }

    if record.is_expired(today, policy) {
        return Err(Denial::Expired);
    }

    if record.is_over_quota() {
        return Err(Denial::OverQuota);
    }

    Ok(())
}

/// Decision engine reading from a shared [`CredentialCache`].
///
/// Never mutates account records; usage counters are only read.
#[derive(Debug, Clone)]
pub struct Authenticator {
    cache: Arc<CredentialCache>,
    config: AuthenticatorConfig,
}

impl Authenticator {
    /// Create an engine over `cache`.
    pub fn new(cache: Arc<CredentialCache>, config: AuthenticatorConfig) -> Self {
        Self { cache, config }
    }

    /// Get the underlying cache.
    pub fn cache(&self) -> &Arc<CredentialCache> {
        &self.cache
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    /// Run the rule pipeline for `auth` as of `today`, without any delay.
    ///
    /// All rules read one snapshot, so a concurrent refresh cannot split a
    /// decision across two account versions.
    pub fn decide_at(&self, auth: &str, today: Date) -> Result<String, Denial> {
        let (key, secret) = split_credential(auth).ok_or(Denial::Malformed)?;

        let snapshot = self.cache.snapshot();
        let record = snapshot.get(key).ok_or(Denial::NotFound)?;
        evaluate(record, secret, today, self.config.expired_date_policy)?;

        Ok(key.to_string())
    }
}

#[async_trait]
impl VerdictService for Authenticator {
    async fn decide(&self, request: &AuthRequest) -> Result<String, Denial> {
        let today = OffsetDateTime::now_utc().date();
        let decision = self.decide_at(&request.auth, today);

        match decision {
            Ok(ref identity) => debug!(identity = %identity, addr = %request.addr, "authentication allowed"),
            Err(denial) => {
                debug!(reason = %denial, addr = %request.addr, "authentication denied");
                // Throttle guessing. Only this request waits; no lock or
                // snapshot reference is held across the sleep.
                if denial == Denial::BadSecret && !self.config.mismatch_delay.is_zero() {
                    tokio::time::sleep(self.config.mismatch_delay).await;
                }
            }
        }

        decision
    }
}
