//! Moving Average Crossover Strategy.
//!
//! Buys a flat symbol whose short-term MA is above its long-term MA and
//! sells a held symbol whose short-term MA is below it.

use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    IndicatorSpec, Row,
};

use crate::column_value;

/// Configuration for the MA Crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MACrossoverConfig {
    /// Short-term moving average period
    pub short_period: usize,
    /// Long-term moving average period
    pub long_period: usize,
    /// Use EMA instead of SMA
    pub use_ema: bool,
}

impl Default for MACrossoverConfig {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 50,
            use_ema: false,
        }
    }
}

impl StrategyConfig for MACrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_period == 0 {
            return Err(StrategyError::InvalidParameter(
                "Short period must be greater than 0".into(),
            ));
        }
        if self.short_period >= self.long_period {
            return Err(StrategyError::InvalidParameter(
                "Short period must be less than long period".into(),
            ));
        }
        Ok(())
    }
}

/// Moving Average Crossover Strategy.
#[derive(Debug, Clone)]
pub struct MACrossoverStrategy {
    config: MACrossoverConfig,
    short: (String, IndicatorSpec),
    long: (String, IndicatorSpec),
}

impl MACrossoverStrategy {
    /// Create a new MA Crossover strategy.
    pub fn new(config: MACrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        let short = Self::average(config.short_period, config.use_ema);
        let long = Self::average(config.long_period, config.use_ema);
        Ok(Self {
            config,
            short,
            long,
        })
    }

    fn average(period: usize, use_ema: bool) -> (String, IndicatorSpec) {
        let spec = if use_ema {
            IndicatorSpec::Ema {
                period,
                adjust: true,
            }
        } else {
            IndicatorSpec::Sma { period }
        };
        (spec.default_name(), spec)
    }
}

impl Strategy for MACrossoverStrategy {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn description(&self) -> &str {
        "Buys when the short-term MA is above the long-term MA, sells when below"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn required_indicators(&self) -> Vec<(String, IndicatorSpec)> {
        vec![self.short.clone(), self.long.clone()]
    }

    fn should_buy(&self, row: &Row) -> bool {
        column_value(row, &self.short.0) > column_value(row, &self.long.0)
    }

    fn should_sell(&self, row: &Row) -> bool {
        column_value(row, &self.short.0) < column_value(row, &self.long.0)
    }
}
