//! Rollcall - student profile registration and lookup
//!
//! Main entry point for the command-line shell. Command output goes to
//! stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

use clap::Parser;
use rollcall_app::utils::logging;
use rollcall_app::{commands, AppContext, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before parsing so clap's env fallbacks can see it
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    logging::init(cli.json_logs);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let ctx = AppContext::from_cli(&cli)?;
    let output = commands::run(&ctx, cli.command).await?;
    println!("{output}");

    Ok(())
}
