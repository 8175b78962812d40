//! Unified hyauth CLI.
//!
//! This binary provides a unified interface to all hyauth components:
//! - `hyauth server` - Run the verdict service
//! - `hyauth accounts` - Inspect accounts in a users file (read-only)
//!
//! Each subcommand can also be run as a standalone binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// hyauth unified CLI.
#[derive(Parser)]
#[command(
    name = "hyauth",
    version,
    about = "Authentication verdict service for Hysteria2",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the verdict service.
    #[command(name = "server", alias = "serve")]
    Server(Box<hyauth_server::ServerArgs>),

    /// Inspect accounts (read-only).
    #[command(name = "accounts")]
    Accounts(hyauth_auth::AccountsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Server(args) => hyauth_server::cli::run(*args).await,
        Commands::Accounts(args) => hyauth_auth::cli::run(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
