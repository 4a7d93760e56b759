//! Lexis - controlled vocabulary resolution from the command line
//!
//! Prints the JSON answer of one command and exits with 0 when the answer was
//! found, 2 when the key does not exist and 3 when no source could answer.

mod commands;
mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use commands::Command;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "lexis", version, about = "Resolve controlled vocabulary concepts")]
struct Cli {
    /// Configuration file (defaults to ./lexis.toml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        static_index = config.index.is_configured(),
        catalog = config.catalog.enabled,
        priority = ?config.broker.priority,
        "Starting lexis"
    );

    let warm = cli.command != Command::Reindex;
    let broker = commands::build_broker(&config, warm)
        .await
        .context("Failed to initialize terminology sources")?;

    let report = commands::run(&cli.command, &broker).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report.body).context("Failed to render output")?
    );
    Ok(report.exit_code())
}
