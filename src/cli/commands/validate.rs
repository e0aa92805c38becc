//! Validate configuration command.

use anyhow::{Context, Result};
use std::path::Path;
use trading_config::AppConfig;
use trading_strategies::StrategyRegistry;

pub fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    config.validate().context("Configuration error")?;
    let strategy = StrategyRegistry::new()
        .create(&config.strategy.name, config.strategy.params_value())
        .with_context(|| format!("Strategy '{}' rejected its parameters", config.strategy.name))?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Strategy: {} {}", strategy.name(), strategy.parameters());
    println!("Indicators:");
    for (name, spec) in config.indicator_registrations() {
        println!("  {:<20} {}", name, spec);
    }
    for (name, spec) in strategy.required_indicators() {
        println!("  {:<20} {} (strategy)", name, spec);
    }
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml()?);

    Ok(())
}
