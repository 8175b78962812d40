//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Listener Defaults
// ============================================================================

/// Default verdict endpoint listen address (loopback only).
pub const DEFAULT_LISTEN: &str = "127.0.0.1:28262";
/// Path of the single verdict route.
pub const AUTH_PATH: &str = "/auth";
/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hyauth/config.toml";
/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Store Defaults
// ============================================================================

/// Default account store kind.
pub const DEFAULT_STORE_KIND: &str = "file";
/// Default users file consumed by the file store.
pub const DEFAULT_USERS_FILE: &str = "/etc/hysteria/users.json";
/// Default snapshot refresh period in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;
/// Default HTTP store request timeout in seconds.
pub const DEFAULT_HTTP_STORE_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Decision Engine Defaults
// ============================================================================

/// Default delay imposed before answering a secret mismatch, in milliseconds.
pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 5000;
/// Default handling of unparseable creation dates on expiring accounts.
pub const DEFAULT_EXPIRED_DATE_POLICY: &str = "fail-open";

/// Separator between identity key and secret in the credential string.
pub const CREDENTIAL_SEPARATOR: char = ':';
