//! Metrics collection and Prometheus exporter for hyauth.
//!
//! This module provides metrics instrumentation for the verdict service,
//! including verdict outcomes, denial reasons, and snapshot refreshes.

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Starts an HTTP server on the given address to expose metrics.
/// Returns an error message if binding fails.
pub fn init_prometheus(listen: &str) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid metrics listen address: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install prometheus exporter: {}", e))?;

    Ok(())
}

// ============================================================================
// Metric Names
// ============================================================================

/// Total number of verdicts returned, by result ("allow" or "deny").
pub const VERDICTS_TOTAL: &str = "hyauth_verdicts_total";
/// Total number of denials, by internal reason.
pub const DENIALS_TOTAL: &str = "hyauth_denials_total";
/// Total number of snapshot refresh attempts, by result ("ok" or "error").
pub const REFRESH_TOTAL: &str = "hyauth_refresh_total";
/// Number of accounts in the current snapshot.
pub const ACCOUNTS: &str = "hyauth_accounts";
/// Verdict request duration histogram (seconds), including mismatch delay.
pub const VERDICT_DURATION_SECONDS: &str = "hyauth_verdict_duration_seconds";
/// Total number of rejected requests (bad body, wrong method).
pub const BAD_REQUESTS_TOTAL: &str = "hyauth_bad_requests_total";
/// Total number of errors by type.
pub const ERRORS_TOTAL: &str = "hyauth_errors_total";

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a verdict sent to the proxy.
#[inline]
pub fn record_verdict(allowed: bool) {
    let result = if allowed { "allow" } else { "deny" };
    counter!(VERDICTS_TOTAL, "result" => result).increment(1);
}

/// Record a denial by reason label.
#[inline]
pub fn record_denial(reason: &'static str) {
    counter!(DENIALS_TOTAL, "reason" => reason).increment(1);
}

/// Record a snapshot refresh attempt.
#[inline]
pub fn record_refresh(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!(REFRESH_TOTAL, "result" => result).increment(1);
}

/// Set the number of accounts in the current snapshot.
#[inline]
pub fn set_accounts(count: usize) {
    gauge!(ACCOUNTS).set(count as f64);
}

/// Record how long a verdict took.
#[inline]
pub fn record_verdict_duration(duration_secs: f64) {
    histogram!(VERDICT_DURATION_SECONDS).record(duration_secs);
}

/// Record a request rejected before reaching the engine.
#[inline]
pub fn record_bad_request() {
    counter!(BAD_REQUESTS_TOTAL).increment(1);
}

/// Record an error by type.
#[inline]
pub fn record_error(error_type: &'static str) {
    counter!(ERRORS_TOTAL, "type" => error_type).increment(1);
}

// ============================================================================
// Label Constants (re-exported from hyauth-core)
// ============================================================================

pub use hyauth_core::{
    DENY_BAD_SECRET, DENY_BLOCKED, DENY_EXPIRED, DENY_MALFORMED, DENY_NOT_FOUND,
    DENY_OVER_QUOTA, ERROR_CONFIG, ERROR_DECODE, ERROR_IO,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_bad_address() {
        let err = init_prometheus("not-an-address").unwrap_err();
        assert!(err.contains("invalid metrics listen address"));
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_verdict(true);
        record_verdict(false);
        record_denial(DENY_BAD_SECRET);
        record_refresh(false);
        set_accounts(3);
        record_verdict_duration(0.01);
        record_bad_request();
        record_error(ERROR_IO);
    }
}
