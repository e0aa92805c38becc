//! MACD Crossover Strategy.
//!
//! Buys a flat symbol whose MACD line is above its signal line and sells a
//! held symbol whose MACD line is below it.

use serde::{Deserialize, Serialize};
use trading_core::{
    columns,
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    IndicatorSpec, Row,
};

use crate::column_value;

/// Configuration for the MACD crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdCrossoverConfig {
    /// Fast EMA period
    pub fast: usize,
    /// Slow EMA period
    pub slow: usize,
    /// Signal line period
    pub signal: usize,
    /// Bias-corrected EMA weights
    pub adjust: bool,
}

impl Default for MacdCrossoverConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            adjust: false,
        }
    }
}

impl StrategyConfig for MacdCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        for (name, value) in [("fast", self.fast), ("slow", self.slow), ("signal", self.signal)] {
            if value == 0 {
                return Err(StrategyError::InvalidParameter(format!(
                    "MACD {} period must be greater than 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MacdCrossoverStrategy {
    config: MacdCrossoverConfig,
}

impl MacdCrossoverStrategy {
    pub fn new(config: MacdCrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Strategy for MacdCrossoverStrategy {
    fn name(&self) -> &str {
        "macd_crossover"
    }

    fn description(&self) -> &str {
        "Buys when the MACD line is above its signal line, sells when below"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn required_indicators(&self) -> Vec<(String, IndicatorSpec)> {
        let spec = IndicatorSpec::Macd {
            fast: self.config.fast,
            slow: self.config.slow,
            signal: self.config.signal,
            adjust: self.config.adjust,
        };
        vec![(spec.default_name(), spec)]
    }

    fn should_buy(&self, row: &Row) -> bool {
        column_value(row, columns::MACD) > column_value(row, columns::MACD_SIGNAL)
    }

    fn should_sell(&self, row: &Row) -> bool {
        column_value(row, columns::MACD) < column_value(row, columns::MACD_SIGNAL)
    }
}
