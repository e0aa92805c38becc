//! Signal evaluators.
//!
//! Each strategy names the indicator columns it reads and supplies a buy
//! rule for flat symbols and a sell rule for held ones:
//! - Bollinger Bands (close outside the bands)
//! - MACD Crossover (MACD line vs signal line)
//! - Moving Average Crossover (short MA vs long MA)
//! - RSI thresholds (oversold / overbought)

mod bollinger_bands;
mod ma_crossover;
mod macd_crossover;
mod registry;
mod rsi_strategy;

pub use bollinger_bands::{BollingerBandsConfig, BollingerBandsStrategy};
pub use ma_crossover::{MACrossoverConfig, MACrossoverStrategy};
pub use macd_crossover::{MacdCrossoverConfig, MacdCrossoverStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
pub use rsi_strategy::{RsiConfig, RsiStrategy};

use trading_core::Row;

/// A row value for comparison; absent columns read as NaN so every
/// comparison against them is false.
pub(crate) fn column_value(row: &Row, column: &str) -> f64 {
    row.get(column).unwrap_or(f64::NAN)
}

#[cfg(test)]
pub(crate) mod test_support {
    use trading_core::Row;

    pub fn row(close: f64, values: &[(&str, f64)]) -> Row {
        Row {
            symbol: "TEST".to_string(),
            timestamp: 0,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}
