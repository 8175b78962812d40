//! CLI module for hyauth-server.
//!
//! This module provides the command-line interface that can be used either
//! as a standalone binary or as a subcommand of the main hyauth CLI.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use hyauth_config::{
    CliOverrides, Config, ConfigError, LoggingConfig, apply_overrides, load_config,
    load_config_or_default, validate_config,
};
use hyauth_core::DEFAULT_CONFIG_PATH;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::signal::shutdown_signal_handler;
use crate::{CancellationToken, run_with_shutdown};

/// hyauth server CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hyauth-server",
    version,
    about = "Authentication verdict service for Hysteria2"
)]
pub struct ServerArgs {
    /// Config file path (json/jsonc/yaml/toml). Defaults apply when the
    /// default path does not exist.
    #[arg(short, long, env = "HYAUTH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Resolve the effective configuration for `args`.
///
/// An explicit `--config` must exist; the implicit default path may be absent.
pub fn load(args: &ServerArgs) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_config_or_default(DEFAULT_CONFIG_PATH)?,
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Run the hyauth server with the given arguments.
///
/// This is the main entry point for the server CLI, used by both the
/// standalone binary and the unified hyauth CLI.
pub async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(&args)?;

    init_tracing(&config.logging);
    info!(version = hyauth_core::VERSION, "starting hyauth");

    if let Some(listen) = &config.metrics.listen {
        match hyauth_metrics::init_prometheus(listen) {
            Ok(()) => info!("metrics exporter listening on {}", listen),
            Err(e) => warn!("failed to start metrics exporter: {}", e),
        }
    }

    // Set up graceful shutdown on SIGTERM/SIGINT
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal_handler().await;
        info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    if let Err(e) = run_with_shutdown(config, shutdown).await {
        hyauth_metrics::record_error(e.error_type());
        return Err(e.into());
    }
    Ok(())
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// Supports:
/// - `level`: Base log level (trace, debug, info, warn, error)
/// - `format`: Output format (json, pretty, compact). Default: pretty
/// - `output`: Output target (stdout, stderr). Default: stderr
/// - `filters`: Per-module log level overrides
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = config.format.as_deref().unwrap_or("pretty");
    let output = config.output.as_deref().unwrap_or("stderr");

    match (format, output) {
        ("json", "stdout") => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stdout))
                .init();
        }
        ("json", _) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        ("compact", "stdout") => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stdout))
                .init();
        }
        ("compact", _) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
        (_, "stdout") => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stdout))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

/// Build an `EnvFilter` directive string from base level and per-module filters.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.as_deref().unwrap_or("info").to_string();

    let mut modules: Vec<_> = config.filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        filter_str.push(',');
        filter_str.push_str(module);
        filter_str.push('=');
        filter_str.push_str(level);
    }
    filter_str
}
