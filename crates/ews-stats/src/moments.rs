//! Moment-based statistics for a window or column
//!
//! Provides the distribution-shape indicators used as early-warning signals:
//! - Population variance and standard deviation
//! - Adjusted Fisher-Pearson skewness
//! - Excess kurtosis
//! - Coefficient of variation
//!
//! All estimators use population moments (denominator `n`). A column whose
//! variance is indistinguishable from zero has no defined shape, so
//! skewness and kurtosis come back as `NaN` for it.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Mean and population central moments of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralMoments {
    /// Number of values
    pub count: usize,
    /// Mean (average)
    pub mean: f64,
    /// Second central moment (population variance)
    pub m2: f64,
    /// Third central moment
    pub m3: f64,
    /// Fourth central moment
    pub m4: f64,
}

impl CentralMoments {
    /// Compute moments from data
    ///
    /// NaN values are not filtered; they propagate into every moment.
    pub fn from_data(data: ArrayView1<'_, f64>) -> Self {
        let count = data.len();
        if count == 0 {
            return Self::empty();
        }

        let n = count as f64;
        let first = data[0];
        let mean = if data.iter().all(|&x| x == first) {
            first
        } else {
            data.sum() / n
        };

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &x in data.iter() {
            let d = x - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }

        Self {
            count,
            mean,
            m2: m2 / n,
            m3: m3 / n,
            m4: m4 / n,
        }
    }

    /// Moments of an empty dataset (all NaN)
    fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            m2: f64::NAN,
            m3: f64::NAN,
            m4: f64::NAN,
        }
    }

    /// Whether the variance is zero up to rounding of the mean
    pub fn is_constant(&self) -> bool {
        self.m2 <= (f64::EPSILON * self.mean).powi(2)
    }

    /// Population variance
    pub fn variance(&self) -> f64 {
        self.m2
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.m2.sqrt()
    }

    /// Biased sample skewness `g1 = m3 / m2^1.5`
    pub fn skewness_biased(&self) -> f64 {
        if self.count == 0 || self.is_constant() {
            return f64::NAN;
        }
        self.m3 / self.m2.powf(1.5)
    }

    /// Adjusted Fisher-Pearson skewness
    ///
    /// Uses the formula: `G1 = g1 * sqrt(n (n - 1)) / (n - 2)`. The
    /// correction is undefined below three values, so one- and two-value
    /// windows give `NaN` rather than falling back to the biased `g1`.
    pub fn skewness(&self) -> f64 {
        if self.count < 3 {
            return f64::NAN;
        }
        let n = self.count as f64;
        self.skewness_biased() * (n * (n - 1.0)).sqrt() / (n - 2.0)
    }

    /// Excess (Fisher) kurtosis `m4 / m2^2 - 3`
    pub fn kurtosis(&self) -> f64 {
        if self.count == 0 || self.is_constant() {
            return f64::NAN;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }

    /// Coefficient of variation (std_dev / mean)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            return f64::NAN;
        }
        self.std_dev() / self.mean
    }
}

/// Population variance of a column
pub fn variance(data: ArrayView1<'_, f64>) -> f64 {
    CentralMoments::from_data(data).variance()
}

/// Population standard deviation of a column
pub fn std_dev(data: ArrayView1<'_, f64>) -> f64 {
    CentralMoments::from_data(data).std_dev()
}

/// Adjusted Fisher-Pearson skewness of a column
pub fn skewness(data: ArrayView1<'_, f64>) -> f64 {
    CentralMoments::from_data(data).skewness()
}

/// Excess kurtosis of a column
pub fn kurtosis(data: ArrayView1<'_, f64>) -> f64 {
    CentralMoments::from_data(data).kurtosis()
}

/// Coefficient of variation of a column
pub fn coefficient_of_variation(data: ArrayView1<'_, f64>) -> f64 {
    CentralMoments::from_data(data).coefficient_of_variation()
}
