//! Momentum indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::{Indicator, MultiOutputIndicator, OhlcvIndicator};

use crate::moving_average::check_period;
use crate::rolling::{diff, ewm_mean, rolling_max, rolling_mean, rolling_min};

/// Bar-to-bar change in the input; the first value is undefined.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeInPrice;

impl Indicator for ChangeInPrice {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        diff(data)
    }
}

/// Relative Strength Index (RSI).
///
/// Average gains over average losses, averaged either exponentially (span =
/// period, bias-corrected) or with a simple rolling mean. A window with no
/// losses reads 100; a window with neither gains nor losses is undefined.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    use_ema: bool,
}

impl Rsi {
    /// Create an RSI with exponential averaging.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::with_smoothing(period, true)
    }

    pub fn with_smoothing(period: usize, use_ema: bool) -> Result<Self, IndicatorError> {
        check_period("rsi", "period", period)?;
        Ok(Self { period, use_ema })
    }

    fn average(&self, values: &[f64]) -> Vec<f64> {
        if self.use_ema {
            ewm_mean(values, self.period, true, self.period)
        } else {
            rolling_mean(values, self.period)
        }
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let change = diff(data);

        // f64::max/min would swallow NaN; keep undefined changes undefined.
        let up: Vec<f64> = change
            .iter()
            .map(|&c| if c.is_nan() { c } else { c.max(0.0) })
            .collect();
        let down: Vec<f64> = change
            .iter()
            .map(|&c| if c.is_nan() { c } else { -c.min(0.0) })
            .collect();

        let avg_up = self.average(&up);
        let avg_down = self.average(&down);

        avg_up
            .iter()
            .zip(&avg_down)
            .map(|(&gain, &loss)| 100.0 - 100.0 / (1.0 + gain / loss))
            .collect()
    }
}

/// MACD output columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Vec<f64>,
    /// Signal line (EMA of MACD)
    pub signal: Vec<f64>,
    /// Histogram (MACD - Signal)
    pub histogram: Vec<f64>,
}

impl MacdOutput {
    /// Columns in `macd`, `signal`, `histogram` order.
    pub fn into_columns(self) -> Vec<Vec<f64>> {
        vec![self.macd, self.signal, self.histogram]
    }
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    adjust: bool,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9), unadjusted.
    pub fn new() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            adjust: false,
        }
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(
        fast: usize,
        slow: usize,
        signal: usize,
        adjust: bool,
    ) -> Result<Self, IndicatorError> {
        check_period("macd", "fast", fast)?;
        check_period("macd", "slow", slow)?;
        check_period("macd", "signal", signal)?;
        Ok(Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
            adjust,
        })
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> MacdOutput {
        let fast = ewm_mean(data, self.fast_period, self.adjust, self.fast_period);
        let slow = ewm_mean(data, self.slow_period, self.adjust, self.slow_period);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ewm_mean(&macd, self.signal_period, self.adjust, self.signal_period);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdOutput {
            macd,
            signal,
            histogram,
        }
    }
}

/// Stochastic oscillator output columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StochasticOutput {
    /// %K (fast stochastic)
    pub k: Vec<f64>,
    /// %D (rolling mean of %K)
    pub d: Vec<f64>,
}

/// Stochastic oscillator.
///
/// Compares closing price to the high/low range over a period.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3).
    pub fn new() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, d_period: usize) -> Result<Self, IndicatorError> {
        check_period("stochastic", "k_period", k_period)?;
        check_period("stochastic", "d_period", d_period)?;
        Ok(Self { k_period, d_period })
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for Stochastic {
    type Output = StochasticOutput;

    fn calculate(&self, high: &[f64], low: &[f64], close: &[f64]) -> StochasticOutput {
        let highest = rolling_max(high, self.k_period);
        let lowest = rolling_min(low, self.k_period);

        let k: Vec<f64> = close
            .iter()
            .zip(highest.iter().zip(&lowest))
            .map(|(c, (h, l))| 100.0 * (c - l) / (h - l))
            .collect();
        let d = rolling_mean(&k, self.d_period);

        StochasticOutput { k, d }
    }
}
