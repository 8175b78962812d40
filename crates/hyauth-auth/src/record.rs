//! Account records as stored in the users document.

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

/// Format of `account_creation_date`.
const CREATION_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// How an expiring account with an unparseable creation date is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiredDatePolicy {
    /// Expiration does not apply; the account stays usable.
    #[default]
    FailOpen,
    /// The account is treated as expired.
    FailClosed,
}

/// One account, keyed by identity in a [`Snapshot`](crate::Snapshot).
///
/// Field names on the wire follow the users document written by the panel
/// tooling. Only `password` is required; absent or `null` fields take their
/// zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Shared secret, compared byte-for-byte.
    pub password: String,

    /// Combined upload+download ceiling in bytes (0 or negative = unlimited).
    #[serde(
        rename = "max_download_bytes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub quota_bytes: i64,

    /// Days after creation when the account stops working (0 = never).
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiration_days: i64,

    /// Creation date as `YYYY-MM-DD`, kept raw so a bad value does not
    /// reject the whole snapshot.
    #[serde(
        rename = "account_creation_date",
        default,
        deserialize_with = "null_as_default"
    )]
    pub created_on: String,

    /// Explicit deny flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocked: bool,

    /// Cumulative uploaded bytes.
    #[serde(
        rename = "upload_bytes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub uploaded_bytes: i64,

    /// Cumulative downloaded bytes.
    #[serde(
        rename = "download_bytes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub downloaded_bytes: i64,

    /// Skips the expiration and quota rules.
    #[serde(
        rename = "unlimited_user",
        default,
        deserialize_with = "null_as_default"
    )]
    pub unlimited: bool,
}

impl AccountRecord {
    /// Create an active record with the given secret and no limits.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            quota_bytes: 0,
            expiration_days: 0,
            created_on: String::new(),
            blocked: false,
            uploaded_bytes: 0,
            downloaded_bytes: 0,
            unlimited: false,
        }
    }

    /// Parsed creation date, if `created_on` is a valid `YYYY-MM-DD`.
    pub fn creation_date(&self) -> Option<Date> {
        Date::parse(&self.created_on, CREATION_DATE).ok()
    }

    /// First day on which the account is no longer valid.
    ///
    /// `None` when the account never expires, the creation date is
    /// unparseable, or the boundary is out of calendar range.
    pub fn expires_on(&self) -> Option<Date> {
        if self.expiration_days <= 0 {
            return None;
        }
        let offset = self.expiration_days.checked_mul(86_400).map(Duration::seconds)?;
        self.creation_date()?.checked_add(offset)
    }

    /// Check if the account is past its expiration boundary on `today`.
    pub fn is_expired(&self, today: Date, policy: ExpiredDatePolicy) -> bool {
        if self.expiration_days <= 0 {
            return false;
        }
        if self.creation_date().is_none() {
            return policy == ExpiredDatePolicy::FailClosed;
        }
        self.expires_on().is_some_and(|boundary| today >= boundary)
    }

    /// Bytes used so far in both directions. Negative counters count as 0.
    #[inline]
    pub fn used_bytes(&self) -> u64 {
        let up = self.uploaded_bytes.max(0).unsigned_abs();
        let down = self.downloaded_bytes.max(0).unsigned_abs();
        up.saturating_add(down)
    }

    /// Quota ceiling in bytes, `None` when unlimited.
    #[inline]
    pub fn quota(&self) -> Option<u64> {
        (self.quota_bytes > 0).then(|| self.quota_bytes.unsigned_abs())
    }

    /// Check if the account has used up its quota.
    #[inline]
    pub fn is_over_quota(&self) -> bool {
        self.quota().is_some_and(|quota| self.used_bytes() >= quota)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
