//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, FeedConfig, HoldingEntry, IndicatorEntry, LoggingConfig,
    PortfolioSettings, StrategySettings,
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;

/// Load configuration from file and environment.
///
/// `TRADING__SECTION__KEY` variables override file values, e.g.
/// `TRADING__FEED__WARMUP_BARS=50`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TRADING")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Load configuration from an inline TOML document. No environment overrides.
pub fn load_config_str(toml: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
