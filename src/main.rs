//! Intraday signal bot CLI.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use trading_config::{load_config, AppConfig};
use trading_monitor::setup_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Strategies => AppConfig::default(),
        _ => load_config(&cli.config)
            .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?,
    };

    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let _guard = setup_logging(
        &level,
        cli.json_logs || config.logging.is_json(),
        config.logging.file.as_deref().map(Path::new),
    )
    .context("Failed to open log file")?;

    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, config),
        Commands::Strategies => cli::commands::strategies::run(),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config),
    }
}
