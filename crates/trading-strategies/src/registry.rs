//! Strategy registry for dynamic strategy loading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use trading_core::{error::StrategyError, traits::Strategy};

use crate::{
    BollingerBandsConfig, BollingerBandsStrategy, MACrossoverConfig, MACrossoverStrategy,
    MacdCrossoverConfig, MacdCrossoverStrategy, RsiConfig, RsiStrategy,
};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for available strategies, keyed by name.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();
        let mut add = |name: &str, description: &str, default_config: serde_json::Value| {
            strategies.insert(
                name.to_string(),
                StrategyInfo {
                    name: name.to_string(),
                    description: description.to_string(),
                    default_config,
                },
            );
        };

        add(
            "bollinger_bands",
            "Buys closes below the lower Bollinger band, sells closes above the upper band",
            serde_json::to_value(BollingerBandsConfig::default()).unwrap_or_default(),
        );
        add(
            "macd_crossover",
            "Buys when the MACD line is above its signal line, sells when below",
            serde_json::to_value(MacdCrossoverConfig::default()).unwrap_or_default(),
        );
        add(
            "ma_crossover",
            "Buys when the short-term MA is above the long-term MA, sells when below",
            serde_json::to_value(MACrossoverConfig::default()).unwrap_or_default(),
        );
        add(
            "rsi",
            "Buys when RSI falls below the oversold level, sells above the overbought level",
            serde_json::to_value(RsiConfig::default()).unwrap_or_default(),
        );

        Self { strategies }
    }

    /// List all available strategies, sorted by name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Get all strategy names.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Create a strategy instance from a JSON parameter object.
    ///
    /// Missing parameters take their defaults; `null` means all defaults.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let config = if config.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            config
        };

        let strategy: Box<dyn Strategy> = match name {
            "bollinger_bands" => Box::new(BollingerBandsStrategy::new(parse(config)?)?),
            "macd_crossover" => Box::new(MacdCrossoverStrategy::new(parse(config)?)?),
            "ma_crossover" => Box::new(MACrossoverStrategy::new(parse(config)?)?),
            "rsi" => Box::new(RsiStrategy::new(parse(config)?)?),
            _ => return Err(StrategyError::NotFound(name.to_string())),
        };
        debug!(strategy = name, params = %strategy.parameters(), "Created strategy");
        Ok(strategy)
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

fn parse<T: serde::de::DeserializeOwned>(config: serde_json::Value) -> Result<T, StrategyError> {
    serde_json::from_value(config).map_err(|e| StrategyError::InvalidParameter(e.to_string()))
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
