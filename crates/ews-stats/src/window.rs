//! Rolling windows over a univariate series
//!
//! A series of length `n` cut with window length `mw` yields `n - mw + 1`
//! windows; window `i` is `series[i..i + mw]` and overlaps its neighbour by
//! `mw - 1` values.
//!
//! The window length is given as a percentage of the series length and is
//! rounded half-to-even, so `5 * 50%` gives a window of 2, not 3.

use ndarray::{Array2, ArrayBase, Data, Dimension, Ix1};

use crate::error::{StatsError, StatsResult};

/// Window length for a series of `len` values and a window size percentage
///
/// Fails with [`StatsError::InvalidParameter`] when the percentage lies
/// outside `(0, 100]` or the rounded length falls outside `1..=len`.
pub fn window_length(len: usize, window_size_percent: f64) -> StatsResult<usize> {
    if !(window_size_percent > 0.0 && window_size_percent <= 100.0) {
        return Err(StatsError::InvalidParameter(format!(
            "window size percentage must be in (0, 100], got {window_size_percent}"
        )));
    }

    let mw = (len as f64 * window_size_percent / 100.0).round_ties_even();
    if mw < 1.0 || mw > len as f64 {
        return Err(StatsError::InvalidParameter(format!(
            "{window_size_percent}% of {len} values gives a window of {mw}, \
             must be between 1 and {len}"
        )));
    }

    Ok(mw as usize)
}

/// Number of windows of length `window_length` in a series of `len` values
pub fn window_count(len: usize, window_length: usize) -> usize {
    if window_length == 0 || window_length > len {
        0
    } else {
        len - window_length + 1
    }
}

/// Re-arrange a series into its rolling windows, one window per row
///
/// Only one-dimensional input is accepted; a matrix (even a single column)
/// is rejected with [`StatsError::InvalidInput`] rather than windowed
/// element by element.
pub fn rolling_window<S, D>(
    series: &ArrayBase<S, D>,
    window_size_percent: f64,
) -> StatsResult<Array2<f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if series.ndim() != 1 {
        return Err(StatsError::InvalidInput(format!(
            "rolling window needs a one-dimensional series, got shape {:?}",
            series.shape()
        )));
    }
    let series = series
        .view()
        .into_dimensionality::<Ix1>()
        .map_err(|e| StatsError::InvalidInput(e.to_string()))?;

    let n = series.len();
    let mw = window_length(n, window_size_percent)?;
    let count = window_count(n, mw);

    Ok(Array2::from_shape_fn((count, mw), |(i, j)| series[i + j]))
}
