//! Billfold CLI - Receipt-to-ledger budget tracker
//!
//! Usage:
//!   billfold init                 Initialize database
//!   billfold serve --port 3000    Start web server
//!   billfold status               Show database status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            uploads_dir,
            static_dir,
        } => {
            commands::cmd_serve(&cli.db, &host, port, &uploads_dir, static_dir.as_deref()).await
        }
        Commands::Status => commands::cmd_status(&cli.db),
    }
}
