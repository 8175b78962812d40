//! Configuration validation logic.

use std::net::SocketAddr;

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let listen: SocketAddr = config.server.listen.trim().parse().map_err(|_| {
        ConfigError::Validation(format!(
            "server.listen '{}' is not a socket address",
            config.server.listen
        ))
    })?;
    // The verdict endpoint has no authentication of its own.
    if !listen.ip().is_loopback() {
        return Err(ConfigError::Validation(format!(
            "server.listen must be a loopback address, got {}",
            listen.ip()
        )));
    }

    if config.store.refresh_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "store.refresh_interval_secs must be > 0".into(),
        ));
    }
    match config.store.kind.as_str() {
        "file" => {
            if config.store.path.trim().is_empty() {
                return Err(ConfigError::Validation("store.path is empty".into()));
            }
        }
        "http" => {
            let url = config.store.url.as_deref().unwrap_or("").trim();
            if url.is_empty() {
                return Err(ConfigError::Validation(
                    "store.url is required for the http store".into(),
                ));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(
                    "store.url must use http:// or https://".into(),
                ));
            }
            if config.store.timeout_secs == 0 {
                return Err(ConfigError::Validation(
                    "store.timeout_secs must be > 0".into(),
                ));
            }
        }
        other => {
            return Err(ConfigError::Validation(format!(
                "store.kind must be 'file' or 'http', got '{other}'"
            )));
        }
    }

    let policy = config.auth.expired_date_policy.as_str();
    if policy != "fail-open" && policy != "fail-closed" {
        return Err(ConfigError::Validation(
            "auth.expired_date_policy must be 'fail-open' or 'fail-closed'".into(),
        ));
    }

    if let Some(listen) = &config.metrics.listen
        && listen.trim().parse::<SocketAddr>().is_err()
    {
        return Err(ConfigError::Validation(format!(
            "metrics.listen '{listen}' is not a socket address"
        )));
    }

    if let Some(format) = &config.logging.format
        && !["json", "pretty", "compact"].contains(&format.as_str())
    {
        return Err(ConfigError::Validation(
            "logging.format must be one of: json, pretty, compact".into(),
        ));
    }
    if let Some(output) = &config.logging.output
        && output != "stdout"
        && output != "stderr"
    {
        return Err(ConfigError::Validation(
            "logging.output must be 'stdout' or 'stderr'".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: &Config, needle: &str) {
        match validate_config(config) {
            Err(ConfigError::Validation(msg)) => {
                assert!(msg.contains(needle), "'{msg}' does not mention '{needle}'")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        validate_config(&Config::default()).unwrap();
    }

    #[test]
    fn listen_must_be_loopback() {
        let mut cfg = Config::default();
        cfg.server.listen = "[::1]:28262".into();
        validate_config(&cfg).unwrap();

        cfg.server.listen = "0.0.0.0:28262".into();
        assert_invalid(&cfg, "loopback");

        cfg.server.listen = "localhost:28262".into();
        assert_invalid(&cfg, "socket address");
    }

    #[test]
    fn refresh_interval_must_be_positive() {
        let mut cfg = Config::default();
        cfg.store.refresh_interval_secs = 0;
        assert_invalid(&cfg, "refresh_interval_secs");
    }

    #[test]
    fn store_kind_checks() {
        let mut cfg = Config::default();
        cfg.store.path = " ".into();
        assert_invalid(&cfg, "store.path");

        cfg.store.kind = "http".into();
        assert_invalid(&cfg, "store.url");

        cfg.store.url = Some("ftp://panel/users".into());
        assert_invalid(&cfg, "http://");

        cfg.store.url = Some("https://panel/users".into());
        validate_config(&cfg).unwrap();

        cfg.store.kind = "sql".into();
        assert_invalid(&cfg, "store.kind");
    }

    #[test]
    fn expired_date_policy_names() {
        let mut cfg = Config::default();
        cfg.auth.expired_date_policy = "fail-closed".into();
        validate_config(&cfg).unwrap();

        cfg.auth.expired_date_policy = "strict".into();
        assert_invalid(&cfg, "expired_date_policy");
    }

    #[test]
    fn logging_and_metrics_checks() {
        let mut cfg = Config::default();
        cfg.logging.format = Some("xml".into());
        assert_invalid(&cfg, "logging.format");

        let mut cfg = Config::default();
        cfg.logging.output = Some("file".into());
        assert_invalid(&cfg, "logging.output");

        let mut cfg = Config::default();
        cfg.metrics.listen = Some("nope".into());
        assert_invalid(&cfg, "metrics.listen");
    }
}
