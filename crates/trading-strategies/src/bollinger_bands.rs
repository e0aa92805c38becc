//! Bollinger Bands Strategy.
//!
//! Buys a flat symbol that closes below the lower band and sells a held
//! symbol that closes above the upper band.

use serde::{Deserialize, Serialize};
use trading_core::{
    columns,
    error::StrategyError,
    traits::{Strategy, StrategyConfig},
    IndicatorSpec, Row,
};

use crate::column_value;

/// Configuration for the Bollinger Bands strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerBandsConfig {
    /// Lookback period for the bands
    pub period: usize,
}

impl Default for BollingerBandsConfig {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl StrategyConfig for BollingerBandsConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::InvalidParameter(
                "Bollinger period must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BollingerBandsStrategy {
    config: BollingerBandsConfig,
}

impl BollingerBandsStrategy {
    pub fn new(config: BollingerBandsConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Strategy for BollingerBandsStrategy {
    fn name(&self) -> &str {
        "bollinger_bands"
    }

    fn description(&self) -> &str {
        "Buys closes below the lower Bollinger band, sells closes above the upper band"
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }

    fn required_indicators(&self) -> Vec<(String, IndicatorSpec)> {
        let spec = IndicatorSpec::BollingerBands {
            period: self.config.period,
        };
        vec![(spec.default_name(), spec)]
    }

    fn should_buy(&self, row: &Row) -> bool {
        row.close < column_value(row, columns::LOWER_BAND)
    }

    fn should_sell(&self, row: &Row) -> bool {
        row.close > column_value(row, columns::UPPER_BAND)
    }
}
