//! Indicator specifications: the typed parameters of every supported
//! computation, plus the column names each one writes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IndicatorError;

/// Output column names shared by the engine and the strategies.
pub mod columns {
    pub const CHANGE_IN_PRICE: &str = "change_in_price";
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "signal";
    pub const MACD_HISTOGRAM: &str = "histogram";
    pub const MIDDLE_BAND: &str = "middle_band";
    pub const UPPER_BAND: &str = "upper_band";
    pub const LOWER_BAND: &str = "lower_band";
    pub const PERCENT_K: &str = "percent_k";
    pub const PERCENT_D: &str = "percent_d";

    pub fn sma(period: usize) -> String {
        format!("sma_{}", period)
    }

    pub fn ema(period: usize) -> String {
        format!("ema_{}", period)
    }

    pub fn rsi(period: usize) -> String {
        format!("rsi_{}", period)
    }

    pub fn std_dev(period: usize) -> String {
        format!("std_{}", period)
    }

    pub fn crossover(fast: &str, slow: &str) -> String {
        format!("{}_x_{}", fast, slow)
    }
}

fn default_true() -> bool {
    true
}

fn default_fast() -> usize {
    12
}

fn default_slow() -> usize {
    26
}

fn default_signal() -> usize {
    9
}

fn default_band_period() -> usize {
    20
}

fn default_k_period() -> usize {
    14
}

fn default_d_period() -> usize {
    3
}

/// A registered indicator computation with its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorSpec {
    /// First difference of close.
    ChangeInPrice,
    /// Simple moving average of close.
    Sma { period: usize },
    /// Exponential moving average of close, span = period.
    Ema {
        period: usize,
        #[serde(default = "default_true")]
        adjust: bool,
    },
    /// Relative strength index.
    Rsi {
        period: usize,
        #[serde(default = "default_true")]
        use_ema: bool,
    },
    Macd {
        #[serde(default = "default_fast")]
        fast: usize,
        #[serde(default = "default_slow")]
        slow: usize,
        #[serde(default = "default_signal")]
        signal: usize,
        #[serde(default)]
        adjust: bool,
    },
    BollingerBands {
        #[serde(default = "default_band_period")]
        period: usize,
    },
    Stochastic {
        #[serde(default = "default_k_period")]
        k_period: usize,
        #[serde(default = "default_d_period")]
        d_period: usize,
    },
    /// Rolling sample standard deviation of close.
    StandardDeviation { period: usize },
    /// Sign of `fast - slow` over two existing columns.
    Crossover { fast: String, slow: String },
}

impl IndicatorSpec {
    /// Default MACD (12, 26, 9) without adjustment.
    pub fn macd() -> Self {
        IndicatorSpec::Macd {
            fast: default_fast(),
            slow: default_slow(),
            signal: default_signal(),
            adjust: false,
        }
    }

    /// Short identifier of the computation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorSpec::ChangeInPrice => "change_in_price",
            IndicatorSpec::Sma { .. } => "sma",
            IndicatorSpec::Ema { .. } => "ema",
            IndicatorSpec::Rsi { .. } => "rsi",
            IndicatorSpec::Macd { .. } => "macd",
            IndicatorSpec::BollingerBands { .. } => "bollinger_bands",
            IndicatorSpec::Stochastic { .. } => "stochastic",
            IndicatorSpec::StandardDeviation { .. } => "standard_deviation",
            IndicatorSpec::Crossover { .. } => "crossover",
        }
    }

    /// Check parameters before anything is computed.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let positive = |name: &str, value: usize| {
            if value == 0 {
                Err(IndicatorError::invalid(
                    self.kind(),
                    format!("{} must be greater than 0, but got {}", name, value),
                ))
            } else {
                Ok(())
            }
        };

        match self {
            IndicatorSpec::ChangeInPrice => Ok(()),
            IndicatorSpec::Sma { period }
            | IndicatorSpec::Ema { period, .. }
            | IndicatorSpec::Rsi { period, .. }
            | IndicatorSpec::BollingerBands { period }
            | IndicatorSpec::StandardDeviation { period } => positive("period", *period),
            IndicatorSpec::Macd {
                fast, slow, signal, ..
            } => {
                positive("fast", *fast)?;
                positive("slow", *slow)?;
                positive("signal", *signal)
            }
            IndicatorSpec::Stochastic { k_period, d_period } => {
                positive("k_period", *k_period)?;
                positive("d_period", *d_period)
            }
            IndicatorSpec::Crossover { fast, slow } => {
                if fast.is_empty() || slow.is_empty() {
                    return Err(IndicatorError::invalid(
                        self.kind(),
                        "fast and slow column names must not be empty",
                    ));
                }
                if fast == slow {
                    return Err(IndicatorError::invalid(
                        self.kind(),
                        format!("fast and slow must differ, both are '{}'", fast),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Registration name used when the caller does not supply one.
    pub fn default_name(&self) -> String {
        match self {
            IndicatorSpec::Sma { period } => columns::sma(*period),
            IndicatorSpec::Ema { period, .. } => columns::ema(*period),
            IndicatorSpec::Rsi { period, .. } => columns::rsi(*period),
            IndicatorSpec::StandardDeviation { period } => columns::std_dev(*period),
            IndicatorSpec::Crossover { fast, slow } => columns::crossover(fast, slow),
            other => other.kind().to_string(),
        }
    }

    /// Columns written to the store, in write order.
    pub fn output_columns(&self) -> Vec<String> {
        match self {
            IndicatorSpec::ChangeInPrice => vec![columns::CHANGE_IN_PRICE.to_string()],
            IndicatorSpec::Sma { period } => vec![columns::sma(*period)],
            IndicatorSpec::Ema { period, .. } => vec![columns::ema(*period)],
            IndicatorSpec::Rsi { period, .. } => vec![columns::rsi(*period)],
            IndicatorSpec::Macd { .. } => vec![
                columns::MACD.to_string(),
                columns::MACD_SIGNAL.to_string(),
                columns::MACD_HISTOGRAM.to_string(),
            ],
            IndicatorSpec::BollingerBands { .. } => vec![
                columns::MIDDLE_BAND.to_string(),
                columns::UPPER_BAND.to_string(),
                columns::LOWER_BAND.to_string(),
            ],
            IndicatorSpec::Stochastic { .. } => vec![
                columns::PERCENT_K.to_string(),
                columns::PERCENT_D.to_string(),
            ],
            IndicatorSpec::StandardDeviation { period } => vec![columns::std_dev(*period)],
            IndicatorSpec::Crossover { fast, slow } => vec![columns::crossover(fast, slow)],
        }
    }

    /// Derived columns that must already exist before this one can run.
    pub fn input_columns(&self) -> Vec<String> {
        match self {
            IndicatorSpec::Crossover { fast, slow } => vec![fast.clone(), slow.clone()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSpec::ChangeInPrice => write!(f, "CHANGE_IN_PRICE"),
            IndicatorSpec::Sma { period } => write!(f, "SMA({})", period),
            IndicatorSpec::Ema { period, adjust } => write!(f, "EMA({}, adjust={})", period, adjust),
            IndicatorSpec::Rsi { period, use_ema } => {
                write!(f, "RSI({}, ema={})", period, use_ema)
            }
            IndicatorSpec::Macd {
                fast,
                slow,
                signal,
                adjust,
            } => write!(f, "MACD({},{},{}, adjust={})", fast, slow, signal, adjust),
            IndicatorSpec::BollingerBands { period } => write!(f, "BOLLINGER({})", period),
            IndicatorSpec::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorSpec::StandardDeviation { period } => write!(f, "STDDEV({})", period),
            IndicatorSpec::Crossover { fast, slow } => write!(f, "CROSSOVER({},{})", fast, slow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        assert_eq!(IndicatorSpec::Rsi { period: 14, use_ema: true }.default_name(), "rsi_14");
        assert_eq!(IndicatorSpec::Sma { period: 20 }.default_name(), "sma_20");
        assert_eq!(IndicatorSpec::macd().default_name(), "macd");
        assert_eq!(
            IndicatorSpec::BollingerBands { period: 20 }.default_name(),
            "bollinger_bands"
        );
    }

    #[test]
    fn test_output_columns() {
        assert_eq!(
            IndicatorSpec::macd().output_columns(),
            vec!["macd", "signal", "histogram"]
        );
        assert_eq!(
            IndicatorSpec::Crossover {
                fast: "sma_5".into(),
                slow: "sma_10".into()
            }
            .output_columns(),
            vec!["sma_5_x_sma_10"]
        );
    }

    #[test]
    fn test_validate_rejects_zero_periods() {
        assert!(IndicatorSpec::Sma { period: 0 }.validate().is_err());
        assert!(IndicatorSpec::Stochastic { k_period: 14, d_period: 0 }
            .validate()
            .is_err());
        let err = IndicatorSpec::Macd {
            fast: 12,
            slow: 0,
            signal: 9,
            adjust: false,
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("slow must be greater than 0"));

        assert!(IndicatorSpec::ChangeInPrice.validate().is_ok());
        assert!(IndicatorSpec::BollingerBands { period: 1 }.validate().is_ok());
    }

    #[test]
    fn test_validate_crossover() {
        let same = IndicatorSpec::Crossover {
            fast: "sma_5".into(),
            slow: "sma_5".into(),
        };
        assert!(same.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let spec: IndicatorSpec = serde_json::from_str(r#"{"kind": "macd"}"#).unwrap();
        assert_eq!(spec, IndicatorSpec::macd());

        let spec: IndicatorSpec =
            serde_json::from_str(r#"{"kind": "ema", "period": 20}"#).unwrap();
        assert_eq!(spec, IndicatorSpec::Ema { period: 20, adjust: true });

        let spec: IndicatorSpec = serde_json::from_str(r#"{"kind": "change_in_price"}"#).unwrap();
        assert_eq!(spec, IndicatorSpec::ChangeInPrice);
    }

    #[test]
    fn test_deserialize_wrong_type() {
        let result: Result<IndicatorSpec, _> =
            serde_json::from_str(r#"{"kind": "sma", "period": "twenty"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(IndicatorSpec::Sma { period: 20 }.to_string(), "SMA(20)");
        assert_eq!(
            IndicatorSpec::macd().to_string(),
            "MACD(12,26,9, adjust=false)"
        );
    }
}
