//! Memory indicators: lag-1 autocorrelation and AR(1) quantities
//!
//! Critical slowing down shows up as rising short-term memory. These
//! functions estimate that memory from a single window:
//!
//! - [`lag1_autocorrelation`]: Pearson correlation of `x[1..]` with `x[..n-1]`
//! - [`ar1_coefficient`]: least-squares slope of `x[t]` on `x[t-1]`
//! - [`return_rate`]: reciprocal of the AR(1) coefficient
//! - [`density_ratio`]: low/high frequency ratio of the fitted AR(1) spectrum

use std::f64::consts::PI;

use ndarray::{s, ArrayView1};

/// Whether a slice has no spread once rounding of its mean is allowed for
///
/// `sum_sq` is the sum of squared deviations from `mean`. A constant slice
/// whose mean is not exactly representable leaves tiny same-signed
/// residuals, so an exact zero test is not enough.
fn is_flat(data: ArrayView1<'_, f64>, mean: f64, sum_sq: f64) -> bool {
    let n = data.len() as f64;
    sum_sq / n <= (f64::EPSILON * mean).powi(2) || data.iter().all(|&v| v == data[0])
}

/// Pearson correlation coefficient of two equally long columns
///
/// Returns `NaN` when the lengths differ, fewer than two pairs are given,
/// or either column is constant.
pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    if n != y.len() || n < 2 {
        return f64::NAN;
    }

    let mean_x = x.sum() / n as f64;
    let mean_y = y.sum() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if is_flat(x, mean_x, sxx) || is_flat(y, mean_y, syy) {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Lag-1 autocorrelation of a column
pub fn lag1_autocorrelation(data: ArrayView1<'_, f64>) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    pearson(data.slice(s![1..]), data.slice(s![..-1]))
}

/// AR(1) coefficient by ordinary least squares (with intercept)
pub fn ar1_coefficient(data: ArrayView1<'_, f64>) -> f64 {
    if data.len() < 3 {
        return f64::NAN;
    }
    let current = data.slice(s![1..]);
    let previous = data.slice(s![..-1]);
    let n = previous.len() as f64;

    let mean_prev = previous.sum() / n;
    let mean_curr = current.sum() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (&x, &y) in previous.iter().zip(current.iter()) {
        let dx = x - mean_prev;
        sxy += dx * (y - mean_curr);
        sxx += dx * dx;
    }

    if is_flat(previous, mean_prev, sxx) {
        return f64::NAN;
    }
    sxy / sxx
}

/// AR(1) coefficient by Yule-Walker (biased lag-1 autocovariance over variance)
pub fn yule_walker_ar1(data: ArrayView1<'_, f64>) -> f64 {
    let n = data.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = data.sum() / n as f64;

    let denom: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    if is_flat(data, mean, denom) {
        return f64::NAN;
    }
    let numer: f64 = data
        .iter()
        .zip(data.iter().skip(1))
        .map(|(prev, curr)| (prev - mean) * (curr - mean))
        .sum();

    numer / denom
}

/// Return rate, the reciprocal of the AR(1) coefficient
pub fn return_rate(data: ArrayView1<'_, f64>) -> f64 {
    let phi = ar1_coefficient(data);
    if phi == 0.0 || !phi.is_finite() {
        return f64::NAN;
    }
    1.0 / phi
}

/// Spectral density ratio of the fitted AR(1) process
///
/// The spectrum is evaluated on `n` frequencies spanning `[0, 0.5]`; the
/// ratio compares the first non-zero frequency `0.5 / (n - 1)` with the
/// Nyquist frequency. Reddening of the spectrum drives the ratio up.
pub fn density_ratio(data: ArrayView1<'_, f64>) -> f64 {
    let n = data.len();
    if n < 3 {
        return f64::NAN;
    }
    let phi = yule_walker_ar1(data);
    if !phi.is_finite() {
        return f64::NAN;
    }

    let f_low = 0.5 / (n - 1) as f64;
    // S(f) is proportional to 1 / (1 - 2 phi cos(2 pi f) + phi^2)
    let low = 1.0 - 2.0 * phi * (2.0 * PI * f_low).cos() + phi * phi;
    let high = (1.0 + phi).powi(2);

    high / low
}
