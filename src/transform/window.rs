//! Rolling window smoothing.

use crate::core::TimeSeriesMatrix;
use crate::error::{RegionError, Result};

/// Default smoothing window, one week of daily values.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 7;

/// Compute rolling mean (moving average).
///
/// Only full windows produce a value; positions without a full window are NaN,
/// and any NaN inside a window makes that position NaN.
///
/// # Arguments
/// * `series` - Input time series
/// * `window` - Window size
/// * `center` - If true, center the window (default: false, trailing window)
pub fn rolling_mean(series: &[f64], window: usize, center: bool) -> Vec<f64> {
    let n = series.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || window > n {
        return result;
    }

    // Trailing windows end at i; centred ones put i at window / 2.
    let lead = if center { window - 1 - window / 2 } else { 0 };

    for end in (window - 1)..n {
        let segment = &series[end + 1 - window..=end];
        result[end - lead] = segment.iter().sum::<f64>() / window as f64;
    }

    result
}

/// Trailing rolling mean applied to every region.
pub fn smooth(matrix: &TimeSeriesMatrix, window: usize) -> Result<TimeSeriesMatrix> {
    if window == 0 {
        return Err(RegionError::InvalidParameter(
            "smoothing window must be at least 1".to_string(),
        ));
    }
    Ok(matrix.map_columns(|_, column| rolling_mean(column, window, false)))
}
