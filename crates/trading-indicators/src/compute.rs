//! Dispatch from an [`IndicatorSpec`] to the matching implementation.

use trading_core::error::IndicatorError;
use trading_core::store::Series;
use trading_core::traits::{Indicator, MultiOutputIndicator, OhlcvIndicator};
use trading_core::IndicatorSpec;

use crate::momentum::{ChangeInPrice, Macd, Rsi, Stochastic};
use crate::moving_average::{Ema, Sma};
use crate::volatility::{BollingerBands, StdDev};

/// Compute every output column of `spec` over one symbol's full history.
///
/// Columns come back in [`IndicatorSpec::output_columns`] order, each the
/// same length as the series.
pub fn compute(spec: &IndicatorSpec, series: &Series) -> Result<Vec<Vec<f64>>, IndicatorError> {
    let close = series.close();

    let columns = match spec {
        IndicatorSpec::ChangeInPrice => vec![ChangeInPrice.calculate(close)],
        IndicatorSpec::Sma { period } => vec![Sma::new(*period)?.calculate(close)],
        IndicatorSpec::Ema { period, adjust } => {
            vec![Ema::with_adjust(*period, *adjust)?.calculate(close)]
        }
        IndicatorSpec::Rsi { period, use_ema } => {
            vec![Rsi::with_smoothing(*period, *use_ema)?.calculate(close)]
        }
        IndicatorSpec::Macd {
            fast,
            slow,
            signal,
            adjust,
        } => Macd::with_periods(*fast, *slow, *signal, *adjust)?
            .calculate(close)
            .into_columns(),
        IndicatorSpec::BollingerBands { period } => BollingerBands::new(*period)?
            .calculate(close)
            .into_columns(),
        IndicatorSpec::Stochastic { k_period, d_period } => {
            let out = Stochastic::with_periods(*k_period, *d_period)?.calculate(
                series.high(),
                series.low(),
                close,
            );
            vec![out.k, out.d]
        }
        IndicatorSpec::StandardDeviation { period } => vec![StdDev::new(*period)?.calculate(close)],
        IndicatorSpec::Crossover { fast, slow } => {
            let fast = series
                .column(fast)
                .ok_or_else(|| IndicatorError::MissingColumn(fast.clone()))?;
            let slow = series
                .column(slow)
                .ok_or_else(|| IndicatorError::MissingColumn(slow.clone()))?;
            vec![crossover(fast, slow)]
        }
    };
    Ok(columns)
}

/// +1 where `fast` is above `slow`, -1 below, 0 equal; NaN if either is undefined.
fn crossover(fast: &[f64], slow: &[f64]) -> Vec<f64> {
    fast.iter()
        .zip(slow)
        .map(|(&f, &s)| {
            if f.is_nan() || s.is_nan() {
                f64::NAN
            } else if f > s {
                1.0
            } else if f < s {
                -1.0
            } else {
                0.0
            }
        })
        .collect()
}
