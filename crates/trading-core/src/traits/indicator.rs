//! Indicator trait definitions.
//!
//! Every implementation returns output aligned with its input: one value per
//! bar, NaN where the value is undefined (warm-up rows, NaN inputs).

use crate::error::IndicatorError;
use crate::store::SeriesStore;
use crate::types::IndicatorSpec;

/// Single-column indicator over one input vector (usually close).
pub trait Indicator: Send + Sync {
    /// Compute the full-length output for `data`.
    fn calculate(&self, data: &[f64]) -> Vec<f64>;
}

/// Indicator that produces several related columns (e.g. MACD, Bollinger Bands).
pub trait MultiOutputIndicator: Send + Sync {
    /// Column-oriented output, one vector per output column.
    type Outputs;

    fn calculate(&self, data: &[f64]) -> Self::Outputs;
}

/// Indicator that needs more than the close (e.g. Stochastic).
pub trait OhlcvIndicator: Send + Sync {
    type Output;

    fn calculate(&self, high: &[f64], low: &[f64], close: &[f64]) -> Self::Output;
}

/// Something that can bring an indicator's columns up to date on demand.
///
/// Evaluators depend on this rather than on a concrete engine so that lazy
/// computation stays inside the core crate's vocabulary.
pub trait IndicatorProvider {
    /// Compute `spec` under `name` unless its columns are already current.
    /// Returns whether anything was computed.
    fn ensure(
        &mut self,
        store: &mut SeriesStore,
        name: &str,
        spec: &IndicatorSpec,
    ) -> Result<bool, IndicatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RollingSum {
        period: usize,
    }

    impl Indicator for RollingSum {
        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            (0..data.len())
                .map(|i| {
                    if i + 1 < self.period {
                        f64::NAN
                    } else {
                        data[i + 1 - self.period..=i].iter().sum()
                    }
                })
                .collect()
        }
    }

    #[test]
    fn test_output_is_aligned() {
        let indicator = RollingSum { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan() && result[1].is_nan());
        assert_eq!(&result[2..], &[6.0, 9.0, 12.0]);
    }
}
