//! hyauth accounts standalone binary.

use std::process::ExitCode;

use clap::Parser;
use hyauth_auth::{AccountsArgs, cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = AccountsArgs::parse();

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
