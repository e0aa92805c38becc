//! Configuration structures.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trading_core::{IndicatorSpec, PortfolioState, TradingError};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    /// Indicators registered before the first cycle, in replay order.
    #[serde(default)]
    pub indicators: Vec<IndicatorEntry>,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub portfolio: PortfolioSettings,
}

impl AppConfig {
    /// Check everything that can be checked without touching a store:
    /// indicator parameters, duplicate registration names, output columns
    /// claimed by two different indicators, lot size and log format. Strategy parameters are checked when the strategy is built.
    pub fn validate(&self) -> Result<(), TradingError> {
        let mut seen = HashSet::new();
        let mut writers: HashMap<String, &IndicatorEntry> = HashMap::new();
        for entry in &self.indicators {
            entry.spec.validate()?;
            let name = entry.name();
            if !seen.insert(name.clone()) {
                return Err(TradingError::Config(format!(
                    "indicator '{name}' is registered twice"
                )));
            }
            for column in entry.spec.output_columns() {
                match writers.get(&column) {
                    Some(other) if other.spec != entry.spec => {
                        return Err(TradingError::Config(format!(
                            "indicators '{}' and '{}' both write column '{}' with different parameters",
                            other.name(),
                            name,
                            column
                        )));
                    }
                    Some(_) => {}
                    None => {
                        writers.insert(column, entry);
                    }
                }
            }
        }

        if self.portfolio.lot_size <= Decimal::ZERO {
            return Err(TradingError::Config(format!(
                "portfolio.lot_size must be positive, got {}",
                self.portfolio.lot_size
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(TradingError::Config(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// `(name, spec)` pairs in declaration order.
    pub fn indicator_registrations(&self) -> Vec<(String, IndicatorSpec)> {
        self.indicators
            .iter()
            .map(|entry| (entry.name(), entry.spec.clone()))
            .collect()
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "intrabot".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Bar feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// CSV file to replay; the CLI `--data` flag takes precedence.
    pub path: Option<String>,
    /// Distinct timestamps delivered in the first batch.
    pub warmup_bars: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: None,
            warmup_bars: 30,
        }
    }
}

/// One configured indicator: an optional registration name plus the
/// `kind`-tagged spec fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub spec: IndicatorSpec,
}

impl IndicatorEntry {
    /// Registration name, falling back to the indicator's default name.
    pub fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.spec.default_name())
    }
}

/// Strategy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub name: String,
    /// Passed to the strategy registry; absent keys take strategy defaults.
    pub params: Map<String, Value>,
}

impl StrategySettings {
    pub fn params_value(&self) -> Value {
        Value::Object(self.params.clone())
    }
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: "rsi".to_string(),
            params: Map::new(),
        }
    }
}

/// A starting holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingEntry {
    pub symbol: String,
    pub quantity: Decimal,
}

/// Initial portfolio and simulated fill size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSettings {
    pub holdings: Vec<HoldingEntry>,
    pub pending_orders: Vec<String>,
    /// Quantity applied per simulated fill.
    pub lot_size: Decimal,
}

impl PortfolioSettings {
    pub fn to_state(&self) -> PortfolioState {
        let mut state = PortfolioState::new();
        for holding in &self.holdings {
            state.set_holding(holding.symbol.clone(), holding.quantity);
        }
        for symbol in &self.pending_orders {
            state.set_pending(symbol.clone(), true);
        }
        state
    }
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            holdings: Vec::new(),
            pending_orders: Vec::new(),
            lot_size: dec!(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(name: Option<&str>, spec: IndicatorSpec) -> IndicatorEntry {
        IndicatorEntry {
            name: name.map(str::to_string),
            spec,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_indicator_period() {
        let config = AppConfig {
            indicators: vec![entry(None, IndicatorSpec::Sma { period: 0 })],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TradingError::Indicator(_))));
    }

    #[test]
    fn test_duplicate_indicator_names() {
        let config = AppConfig {
            indicators: vec![
                entry(None, IndicatorSpec::Sma { period: 5 }),
                entry(Some("sma_5"), IndicatorSpec::Sma { period: 6 }),
            ],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TradingError::Config(_))));
    }

    #[test]
    fn test_shared_output_columns() {
        let bands = |period| IndicatorSpec::BollingerBands { period };
        let config = AppConfig {
            indicators: vec![entry(Some("bb_10"), bands(10)), entry(Some("bb_20"), bands(20))],
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("middle_band"), "{err}");

        let config = AppConfig {
            indicators: vec![entry(Some("a"), bands(20)), entry(Some("b"), bands(20))],
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_non_positive_lot_size() {
        let mut config = AppConfig::default();
        config.portfolio.lot_size = dec!(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_entry_name_falls_back_to_default() {
        assert_eq!(entry(None, IndicatorSpec::Rsi { period: 14, use_ema: true }).name(), "rsi_14");
        assert_eq!(entry(Some("slow"), IndicatorSpec::Sma { period: 50 }).name(), "slow");
    }
}
