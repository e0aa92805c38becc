//! Volatility indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::check_period;
use crate::rolling::{rolling_mean, rolling_std};

/// Rolling sample standard deviation.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    ///
    /// A period of 1 is accepted but never defined (no sample deviation).
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("standard_deviation", "period", period)?;
        Ok(Self { period })
    }
}

impl Indicator for StdDev {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        rolling_std(data, self.period)
    }
}

/// Bollinger Bands output columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerOutput {
    /// Middle band (SMA)
    pub middle: Vec<f64>,
    /// Upper band
    pub upper: Vec<f64>,
    /// Lower band
    pub lower: Vec<f64>,
}

impl BollingerOutput {
    /// Columns in `middle_band`, `upper_band`, `lower_band` order.
    pub fn into_columns(self) -> Vec<Vec<f64>> {
        vec![self.middle, self.upper, self.lower]
    }
}

/// Bollinger Bands.
///
/// A middle band (SMA) with upper and lower bands two sample standard
/// deviations away.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
}

impl BollingerBands {
    const STD_DEV_MULTIPLIER: f64 = 2.0;

    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("bollinger_bands", "period", period)?;
        Ok(Self { period })
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> BollingerOutput {
        let middle = rolling_mean(data, self.period);
        let std = rolling_std(data, self.period);

        let upper = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m + Self::STD_DEV_MULTIPLIER * s)
            .collect();
        let lower = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| m - Self::STD_DEV_MULTIPLIER * s)
            .collect();

        BollingerOutput {
            middle,
            upper,
            lower,
        }
    }
}
