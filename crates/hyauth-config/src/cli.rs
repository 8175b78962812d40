//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override verdict endpoint listen address, e.g. 127.0.0.1:28262
    #[arg(long)]
    pub listen: Option<String>,
    /// Override users file path (switches the store to "file")
    #[arg(long)]
    pub users_file: Option<String>,
    /// Override store refresh interval (seconds)
    #[arg(long)]
    pub refresh_interval_secs: Option<u64>,
    /// Override secret mismatch delay (milliseconds)
    #[arg(long)]
    pub mismatch_delay_ms: Option<u64>,
    /// Override metrics listen address
    #[arg(long)]
    pub metrics_listen: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.listen {
        config.server.listen = v.clone();
    }
    if let Some(v) = &overrides.users_file {
        config.store.kind = "file".to_string();
        config.store.path = v.clone();
    }
    if let Some(v) = overrides.refresh_interval_secs {
        config.store.refresh_interval_secs = v;
    }
    if let Some(v) = overrides.mismatch_delay_ms {
        config.auth.mismatch_delay_ms = v;
    }
    if let Some(v) = &overrides.metrics_listen {
        config.metrics.listen = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
}
