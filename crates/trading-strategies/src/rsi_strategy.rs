//! RSI-based Trading Strategy.
//!
//! Buys a flat symbol whose RSI is below the oversold level and sells a held
//! symbol whose RSI is above the overbought level.

use serde::{Deserialize, Serialize};
use trading_core::{
    columns,
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    IndicatorSpec, Row,
};

use crate::column_value;

/// Configuration for the RSI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    /// RSI calculation period
    pub period: usize,
    /// Oversold threshold (buy below this)
    pub oversold: f64,
    /// Overbought threshold (sell above this)
    pub overbought: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl StrategyConfig for RsiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::InvalidParameter(
                "RSI period must be greater than 0".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err(StrategyError::InvalidParameter(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(StrategyError::InvalidParameter(
                "Oversold must be less than overbought".into(),
            ));
        }
        Ok(())
    }
}

/// RSI threshold strategy.
#[derive(Debug, Clone)]
pub struct RsiStrategy {
    config: RsiConfig,
    column: String,
}

impl RsiStrategy {
    pub fn new(config: RsiConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            column: columns::rsi(config.period),
            config,
        })
    }

    pub fn config(&self) -> &RsiConfig {
        &self.config
    }
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &str {
        "rsi"
    }

    fn description(&self) -> &str {
        "Buys when RSI falls below the oversold level, sells above the overbought level"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn required_indicators(&self) -> Vec<(String, IndicatorSpec)> {
        let spec = IndicatorSpec::Rsi {
            period: self.config.period,
            use_ema: true,
        };
        vec![(spec.default_name(), spec)]
    }

    fn should_buy(&self, row: &Row) -> bool {
        column_value(row, &self.column) < self.config.oversold
    }

    fn should_sell(&self, row: &Row) -> bool {
        column_value(row, &self.column) > self.config.overbought
    }
}
