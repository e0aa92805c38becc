//! Window and exponential-weighting primitives shared by the indicators.
//!
//! All functions return a vector the same length as their input. NaN means
//! "undefined": a rolling window containing a NaN is undefined, and an
//! exponentially-weighted mean treats a NaN as a missing observation that
//! still ages the weights.

/// First difference; the first element is undefined.
pub fn diff(data: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    if !data.is_empty() {
        out.push(f64::NAN);
    }
    out.extend(data.windows(2).map(|w| w[1] - w[0]));
    out
}

/// Apply `f` to every full window ending at each index. Windows that are
/// short or contain a NaN are undefined.
fn rolling<F>(data: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return vec![f64::NAN; data.len()];
    }
    (0..data.len())
        .map(|i| {
            if i + 1 < window {
                return f64::NAN;
            }
            let slice = &data[i + 1 - window..=i];
            if slice.iter().any(|v| v.is_nan()) {
                f64::NAN
            } else {
                f(slice)
            }
        })
        .collect()
}

fn mean(slice: &[f64]) -> f64 {
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Sample variance (n - 1 denominator); undefined for a single value.
fn sample_variance(slice: &[f64]) -> f64 {
    let n = slice.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(slice);
    slice.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

pub fn rolling_mean(data: &[f64], window: usize) -> Vec<f64> {
    rolling(data, window, mean)
}

/// Rolling sample standard deviation.
pub fn rolling_std(data: &[f64], window: usize) -> Vec<f64> {
    rolling(data, window, |slice| sample_variance(slice).sqrt())
}

pub fn rolling_min(data: &[f64], window: usize) -> Vec<f64> {
    rolling(data, window, |slice| {
        slice.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

pub fn rolling_max(data: &[f64], window: usize) -> Vec<f64> {
    rolling(data, window, |slice| {
        slice.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Exponentially-weighted mean with `alpha = 2 / (span + 1)`.
///
/// With `adjust` the weights are bias-corrected over the observations seen so
/// far; without it this is the plain recursion `y = (1 - a) * y + a * x`
/// seeded with the first observation. Output is undefined until
/// `min_periods` non-NaN observations have been seen.
pub fn ewm_mean(data: &[f64], span: usize, adjust: bool, min_periods: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    let Some(&first) = data.first() else {
        return out;
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let new_wt = if adjust { 1.0 } else { alpha };
    let min_periods = min_periods.max(1);

    let mut weighted = first;
    let mut old_wt = 1.0;
    let mut nobs = usize::from(!first.is_nan());
    out.push(if nobs >= min_periods { weighted } else { f64::NAN });

    for &cur in &data[1..] {
        let observed = !cur.is_nan();
        nobs += usize::from(observed);

        if !weighted.is_nan() {
            old_wt *= decay;
            if observed {
                if weighted != cur {
                    weighted = (old_wt * weighted + new_wt * cur) / (old_wt + new_wt);
                }
                if adjust {
                    old_wt += new_wt;
                } else {
                    old_wt = 1.0;
                }
            }
        } else if observed {
            weighted = cur;
        }

        out.push(if nobs >= min_periods { weighted } else { f64::NAN });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NAN: f64 = f64::NAN;

    fn assert_series(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "length mismatch");
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            if e.is_nan() {
                assert!(a.is_nan(), "index {}: expected NaN, got {}", i, a);
            } else {
                assert_relative_eq!(*a, *e, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_diff() {
        assert_series(&diff(&[10.0, 9.0, 8.0, 7.0, 20.0]), &[NAN, -1.0, -1.0, -1.0, 13.0]);
        assert!(diff(&[]).is_empty());
        assert_series(&diff(&[5.0]), &[NAN]);
    }

    #[test]
    fn test_rolling_mean_window_boundary() {
        assert_series(&rolling_mean(&[10.0, 20.0, 30.0, 40.0], 3), &[NAN, NAN, 20.0, 30.0]);
    }

    #[test]
    fn test_rolling_mean_nan_poisons_window() {
        let data = [1.0, NAN, 3.0, 4.0, 5.0];
        assert_series(&rolling_mean(&data, 2), &[NAN, NAN, NAN, 3.5, 4.5]);
    }

    #[test]
    fn test_rolling_std_sample() {
        // [10, 12]: mean 11, sample var 2
        let out = rolling_std(&[10.0, 12.0, 8.0], 2);
        assert_series(&out, &[NAN, 2f64.sqrt(), 8f64.sqrt()]);

        // one-element windows have no sample deviation
        assert!(rolling_std(&[1.0, 2.0], 1).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_min_max() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_series(&rolling_min(&data, 3), &[NAN, NAN, 1.0, 1.0, 1.0]);
        assert_series(&rolling_max(&data, 3), &[NAN, NAN, 4.0, 4.0, 5.0]);
    }

    #[test]
    fn test_ewm_unadjusted_is_plain_recursion() {
        // span 3 -> alpha 0.5
        let out = ewm_mean(&[1.0, 2.0, 3.0, 4.0], 3, false, 1);
        assert_series(&out, &[1.0, 1.5, 2.25, 3.125]);
    }

    #[test]
    fn test_ewm_adjusted() {
        // alpha 0.5: y1 = (0.5*1 + 2) / 1.5, y2 = (0.25*1 + 0.5*2 + 3) / 1.75
        let out = ewm_mean(&[1.0, 2.0, 3.0], 3, true, 1);
        assert_series(&out, &[1.0, 5.0 / 3.0, 4.25 / 1.75]);
    }

    #[test]
    fn test_ewm_min_periods() {
        let out = ewm_mean(&[1.0, 2.0, 3.0, 4.0], 3, false, 3);
        assert_series(&out, &[NAN, NAN, 2.25, 3.125]);
    }

    #[test]
    fn test_ewm_leading_nan() {
        // The first observation seeds the mean; NaNs before it are skipped.
        let out = ewm_mean(&[NAN, 2.0, 4.0], 3, false, 1);
        assert_series(&out, &[NAN, 2.0, 3.0]);
    }

    #[test]
    fn test_ewm_gap_ages_weights() {
        // alpha 0.5, adjust: after the gap old weight is 0.25
        let out = ewm_mean(&[1.0, NAN, 3.0], 3, true, 1);
        assert_series(&out, &[1.0, 1.0, (0.25 * 1.0 + 3.0) / 1.25]);
    }
}
