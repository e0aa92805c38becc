//! Moving average indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;

use crate::rolling::{ewm_mean, rolling_mean};

pub(crate) fn check_period(indicator: &str, name: &str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::invalid(
            indicator,
            format!("{} must be greater than 0, but got {}", name, period),
        ));
    }
    Ok(())
}

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last N values; the first N - 1 outputs are NaN.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("sma", "period", period)?;
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        rolling_mean(data, self.period)
    }
}

/// Exponential Moving Average (EMA).
///
/// Span-based smoothing (`alpha = 2 / (period + 1)`), defined once `period`
/// observations have been seen.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    adjust: bool,
}

impl Ema {
    /// Create a bias-corrected EMA.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::with_adjust(period, true)
    }

    /// Create an EMA, choosing between bias-corrected weights (`adjust`)
    /// and the plain recursive form.
    pub fn with_adjust(period: usize, adjust: bool) -> Result<Self, IndicatorError> {
        check_period("ema", "period", period)?;
        Ok(Self { period, adjust })
    }

    pub fn adjust(&self) -> bool {
        self.adjust
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        ewm_mean(data, self.period, self.adjust, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3).unwrap();
        let result = sma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan() && result[1].is_nan());
        assert_relative_eq!(result[2], 2.0); // (1+2+3)/3
        assert_relative_eq!(result[3], 3.0);
        assert_relative_eq!(result[4], 4.0);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5).unwrap();
        let result = sma.calculate(&[1.0, 2.0, 3.0]);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(Sma::new(0).is_err());
        let err = Ema::new(0).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::invalid("ema", "period must be greater than 0, but got 0")
        );
    }

    #[test]
    fn test_ema_unadjusted() {
        // alpha = 2/(3+1) = 0.5, seeded with the first value
        let ema = Ema::with_adjust(3, false).unwrap();
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert!(result[0].is_nan() && result[1].is_nan());
        assert_relative_eq!(result[2], 2.25);
        assert_relative_eq!(result[3], 3.125);
        assert_relative_eq!(result[4], 4.0625);
    }

    #[test]
    fn test_ema_adjusted_constant_series() {
        let ema = Ema::new(4).unwrap();
        let result = ema.calculate(&[7.0; 6]);
        assert!(result[2].is_nan());
        assert!(result[3..].iter().all(|v| (*v - 7.0).abs() < 1e-12));
    }
}
