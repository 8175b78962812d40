//! Configuration type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Top-level hyauth configuration.
///
/// Every section is optional; an empty document yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Verdict endpoint listen address. Must be loopback.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Account store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store kind: "file" or "http".
    #[serde(default = "default_store_kind")]
    pub kind: String,
    /// Users file path (file store).
    #[serde(default = "default_users_file")]
    pub path: String,
    /// Users document URL (http store).
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer token sent to the http store.
    #[serde(default)]
    pub token: Option<String>,
    /// Http store request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    /// Snapshot refresh period in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: default_store_kind(),
            path: default_users_file(),
            url: None,
            token: None,
            timeout_secs: default_http_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

/// Decision engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Delay before answering a secret mismatch, in milliseconds.
    #[serde(default = "default_mismatch_delay_ms")]
    pub mismatch_delay_ms: u64,
    /// "fail-open" or "fail-closed" for unparseable creation dates.
    #[serde(default = "default_expired_date_policy")]
    pub expired_date_policy: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mismatch_delay_ms: default_mismatch_delay_ms(),
            expired_date_policy: default_expired_date_policy(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    /// Prometheus exporter listen address. Disabled when unset.
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"hyauth_auth": "debug"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
