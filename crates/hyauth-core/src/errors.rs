//! Label constants for metrics and logging.
//!
//! These constants provide consistent classification across all crates.

/// Store load failed with an I/O or transport error.
pub const ERROR_IO: &str = "io";
/// Store returned data that could not be decoded.
pub const ERROR_DECODE: &str = "decode";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";

/// Credential string had no `:` separator.
pub const DENY_MALFORMED: &str = "malformed";
/// No account under the presented identity.
pub const DENY_NOT_FOUND: &str = "not_found";
/// Account carries the blocked flag.
pub const DENY_BLOCKED: &str = "blocked";
/// Presented secret did not match.
pub const DENY_BAD_SECRET: &str = "bad_secret";
/// Account is past its expiration boundary.
pub const DENY_EXPIRED: &str = "expired";
/// Account used up its byte quota.
pub const DENY_OVER_QUOTA: &str = "over_quota";
