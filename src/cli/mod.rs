//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intrabot")]
#[command(author, version, about = "Incremental indicator engine and strategy signals over bar feeds")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "INTRABOT_CONFIG", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a bar feed through the configured indicators and strategy
    Run(RunArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Bar CSV file (overrides feed.path)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Distinct timestamps in the first batch (overrides feed.warmup_bars)
    #[arg(short, long)]
    pub warmup: Option<usize>,

    /// Fill every signal at portfolio.lot_size
    #[arg(long)]
    pub simulate_fills: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
