//! Kendall rank correlation and the Kendall trend test
//!
//! The trend test correlates an indicator sequence with its own time index
//! `0, 1, ..., n-1`. A tau near `+1` means the indicator rises steadily
//! through time, which is the signature of an approaching transition.
//!
//! # Statistic
//!
//! Tau-b with tie correction:
//!
//! ```text
//! tau = (C - D) / sqrt((T - Tx) (T - Ty))
//! ```
//!
//! where `C`/`D` are concordant/discordant pairs, `T = n (n-1) / 2` and
//! `Tx`/`Ty` count pairs tied in `x`/`y`.
//!
//! # P-value
//!
//! The method is pinned through [`PValueMethod`] and recorded in every
//! [`TrendResult`]:
//!
//! - **Exact**: the number of discordant pairs of a random permutation
//!   follows the Mahonian distribution; the two-sided p-value is
//!   `min(1, 2 P(D <= c))` with `c = min(D, T - D)`. Untied data only.
//! - **Asymptotic**: normal approximation with the tie-corrected variance.
//! - **Auto**: exact for untied data when `n <= 33` or `c <= 1`,
//!   asymptotic otherwise.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{StatsError, StatsResult};

/// Largest sample size for which [`PValueMethod::Auto`] uses the exact null
const EXACT_MAX_N: usize = 33;

/// How the significance of tau is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    /// Exact for small untied samples, asymptotic otherwise
    #[default]
    Auto,
    /// Exact permutation distribution (no ties allowed)
    Exact,
    /// Normal approximation with tie-corrected variance
    Asymptotic,
}

/// Kendall tau with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Rank correlation in `[-1, 1]`
    pub tau: f64,
    /// Two-sided p-value under the null of no association
    pub p_value: f64,
    /// Method used for `p_value`
    ///
    /// `Auto` is resolved to `Exact` or `Asymptotic` once a p-value is
    /// computed. A degenerate result keeps the requested method.
    pub method: PValueMethod,
}

impl TrendResult {
    fn degenerate(method: PValueMethod) -> Self {
        Self {
            tau: f64::NAN,
            p_value: f64::NAN,
            method,
        }
    }

    /// Whether tau or the p-value is undefined
    pub fn is_degenerate(&self) -> bool {
        self.tau.is_nan() || self.p_value.is_nan()
    }

    /// Whether the trend is significant at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Tie sums of one variable
#[derive(Debug, Default, Clone, Copy)]
struct TieSums {
    /// Sum of t(t-1)/2 over tie groups (tied pairs)
    pairs: f64,
    /// Sum of t(t-1)(t-2)
    v0: f64,
    /// Sum of t(t-1)(2t+5)
    v1: f64,
}

impl TieSums {
    fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        sorted
            .chunk_by(|a, b| a == b)
            .map(|group| group.len() as f64)
            .filter(|&t| t > 1.0)
            .fold(Self::default(), |acc, t| Self {
                pairs: acc.pairs + t * (t - 1.0) / 2.0,
                v0: acc.v0 + t * (t - 1.0) * (t - 2.0),
                v1: acc.v1 + t * (t - 1.0) * (2.0 * t + 5.0),
            })
    }

    fn is_untied(&self) -> bool {
        self.pairs == 0.0
    }
}

fn sign(d: f64) -> i64 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

/// Kendall tau-b between `x` and `y` with its two-sided p-value
///
/// Fails with [`StatsError::InvalidInput`] when the inputs differ in length,
/// hold fewer than two values, or an exact p-value is requested for tied
/// data. NaN input, or a variable whose values are all equal, yields a
/// degenerate (NaN) result.
pub fn kendall_tau(x: &[f64], y: &[f64], method: PValueMethod) -> StatsResult<TrendResult> {
    if x.len() != y.len() {
        return Err(StatsError::InvalidInput(format!(
            "x and y must have the same length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(StatsError::InvalidInput(format!(
            "Kendall tau needs at least 2 values, got {n}"
        )));
    }

    if x.iter().chain(y.iter()).any(|v| v.is_nan()) {
        return Ok(TrendResult::degenerate(method));
    }

    let total = (n * (n - 1) / 2) as f64;
    let x_ties = TieSums::from_values(x);
    let y_ties = TieSums::from_values(y);
    if x_ties.pairs == total || y_ties.pairs == total {
        return Ok(TrendResult::degenerate(method));
    }

    let mut con_minus_dis: i64 = 0;
    let mut discordant: u64 = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let s = sign(x[j] - x[i]) * sign(y[j] - y[i]);
            con_minus_dis += s;
            if s < 0 {
                discordant += 1;
            }
        }
    }
    let con_minus_dis = con_minus_dis as f64;

    let tau = (con_minus_dis / (total - x_ties.pairs).sqrt() / (total - y_ties.pairs).sqrt())
        .clamp(-1.0, 1.0);

    let untied = x_ties.is_untied() && y_ties.is_untied();
    let c = discordant.min(total as u64 - discordant) as usize;

    let method = match method {
        PValueMethod::Auto if untied && (n <= EXACT_MAX_N || c <= 1) => PValueMethod::Exact,
        PValueMethod::Auto => PValueMethod::Asymptotic,
        PValueMethod::Exact if !untied => {
            return Err(StatsError::InvalidInput(
                "exact Kendall p-value requires data without ties".to_string(),
            ));
        }
        other => other,
    };

    let p_value = match method {
        PValueMethod::Exact => exact_p_value(n, c),
        _ => {
            let m = (n * (n - 1)) as f64;
            let nf = n as f64;
            let mut var = (m * (2.0 * nf + 5.0) - x_ties.v1 - y_ties.v1) / 18.0
                + 2.0 * x_ties.pairs * y_ties.pairs / m;
            if n > 2 {
                var += x_ties.v0 * y_ties.v0 / (9.0 * m * (nf - 2.0));
            }
            let z = con_minus_dis / var.sqrt();

            let normal =
                Normal::new(0.0, 1.0).map_err(|e| StatsError::InvalidParameter(e.to_string()))?;
            (2.0 * normal.sf(z.abs())).min(1.0)
        }
    };

    Ok(TrendResult {
        tau,
        p_value,
        method,
    })
}

/// Kendall trend test of a sequence against its time index `0..n`
///
/// Order matters: permuting `values` changes the result.
pub fn kendall_trend(values: &[f64], method: PValueMethod) -> StatsResult<TrendResult> {
    let time: Vec<f64> = (0..values.len()).map(|t| t as f64).collect();
    kendall_tau(&time, values, method)
}

/// Two-sided exact p-value for `c` discordant pairs among `n` untied values
///
/// Builds the inversion-count distribution of a random permutation one
/// element at a time, normalised at each step so it stays a probability
/// distribution for any `n`.
fn exact_p_value(n: usize, c: usize) -> f64 {
    let mut probs = vec![0.0_f64; c + 1];
    probs[0] = 1.0;

    for j in 2..=n {
        let mut next = vec![0.0_f64; c + 1];
        let mut window = 0.0;
        for k in 0..=c {
            window += probs[k];
            if k >= j {
                window -= probs[k - j];
            }
            next[k] = window / j as f64;
        }
        probs = next;
    }

    (2.0 * probs.iter().sum::<f64>()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REFERENCE: [f64; 10] = [2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 5.0, 9.0, 10.0, 20.0];

    #[test]
    fn test_reference_trend() {
        let result = kendall_trend(&REFERENCE, PValueMethod::Auto).unwrap();

        // 42 concordant, 3 discordant pairs
        assert!((result.tau - 39.0 / 45.0).abs() < 1e-12);
        assert_eq!(result.method, PValueMethod::Exact);
        // 209 of 10! permutations have at most 3 inversions
        let expected = 2.0 * 209.0 / 3_628_800.0;
        assert!((result.p_value - expected).abs() < 1e-12);
        assert!(result.is_significant(0.01));
    }

    #[test]
    fn test_reference_trend_asymptotic() {
        let result = kendall_trend(&REFERENCE, PValueMethod::Asymptotic).unwrap();

        assert!((result.tau - 39.0 / 45.0).abs() < 1e-12);
        assert_eq!(result.method, PValueMethod::Asymptotic);
        // z = 39 / sqrt(125)
        assert!(result.p_value > 4.0e-4 && result.p_value < 6.0e-4);
    }

    #[test]
    fn test_too_few_values() {
        assert!(matches!(
            kendall_trend(&[1.0], PValueMethod::Auto),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            kendall_trend(&[], PValueMethod::Auto),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            kendall_tau(&[1.0, 2.0], &[1.0, 2.0, 3.0], PValueMethod::Auto),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_order_sensitivity() {
        let forward = kendall_trend(&REFERENCE, PValueMethod::Auto).unwrap();

        let mut reversed = REFERENCE;
        reversed.reverse();
        let backward = kendall_trend(&reversed, PValueMethod::Auto).unwrap();

        assert!((backward.tau + forward.tau).abs() < 1e-12);

        let shuffled = [9.0, 2.0, 20.0, 5.0, 3.0, 10.0, 7.0, 4.0, 8.0, 6.0];
        let scrambled = kendall_trend(&shuffled, PValueMethod::Auto).unwrap();
        assert!((scrambled.tau - forward.tau).abs() > 0.1);
        assert!(scrambled.p_value > forward.p_value);
    }

    #[test]
    fn test_ties_use_tau_b() {
        let result = kendall_trend(&[1.0, 1.0, 2.0, 2.0], PValueMethod::Auto).unwrap();

        assert!((result.tau - 4.0 / 24.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(result.method, PValueMethod::Asymptotic);
    }

    #[test]
    fn test_exact_rejects_ties() {
        assert!(matches!(
            kendall_trend(&[1.0, 1.0, 2.0], PValueMethod::Exact),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_degenerate_inputs() {
        let constant = kendall_trend(&[3.0, 3.0, 3.0], PValueMethod::Auto).unwrap();
        assert!(constant.is_degenerate());

        let with_nan = kendall_trend(&[1.0, f64::NAN, 3.0], PValueMethod::Auto).unwrap();
        assert!(with_nan.is_degenerate());
    }

    #[test]
    fn test_two_values() {
        let result = kendall_trend(&[1.0, 2.0], PValueMethod::Auto).unwrap();
        assert_eq!(result.tau, 1.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_exact_p_value_small() {
        // n = 3: inversion counts 0,1,1,2,2,3 with probabilities 1,2,2,1 / 6
        assert!((exact_p_value(3, 0) - 2.0 / 6.0).abs() < 1e-12);
        assert!((exact_p_value(3, 1) - 1.0).abs() < 1e-12);
        // n = 4, c = 1: (1 + 3) / 24
        assert!((exact_p_value(4, 1) - 8.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_sample_auto_is_asymptotic() {
        let values: Vec<f64> = (0..50).map(|i| ((i * 37) % 50) as f64).collect();
        let result = kendall_trend(&values, PValueMethod::Auto).unwrap();
        assert_eq!(result.method, PValueMethod::Asymptotic);
    }

    fn factorial(n: u32) -> f64 {
        (1..=n).map(f64::from).product()
    }

    #[test]
    fn test_large_sample_auto_is_exact_for_monotone() {
        let values: Vec<f64> = (0..40).map(f64::from).collect();
        let result = kendall_trend(&values, PValueMethod::Auto).unwrap();

        assert_eq!(result.method, PValueMethod::Exact);
        assert_eq!(result.tau, 1.0);
        let expected = 2.0 / factorial(40);
        assert!((result.p_value - expected).abs() <= expected * 1e-9);
    }

    #[test]
    fn test_large_sample_auto_is_exact_for_one_swap() {
        let mut values: Vec<f64> = (0..40).map(f64::from).collect();
        values.swap(10, 11);
        let result = kendall_trend(&values, PValueMethod::Auto).unwrap();

        assert_eq!(result.method, PValueMethod::Exact);
        assert!((result.tau - 778.0 / 780.0).abs() < 1e-12);
        // Identity plus the 39 single adjacent transpositions
        let expected = 2.0 * 40.0 / factorial(40);
        assert!((result.p_value - expected).abs() <= expected * 1e-9);
    }

    #[test]
    fn test_degenerate_keeps_requested_method() {
        let constant = kendall_trend(&[3.0, 3.0, 3.0], PValueMethod::Auto).unwrap();
        assert_eq!(constant.method, PValueMethod::Auto);

        let with_nan = kendall_trend(&[1.0, f64::NAN], PValueMethod::Asymptotic).unwrap();
        assert_eq!(with_nan.method, PValueMethod::Asymptotic);
    }

    proptest! {
        #[test]
        fn prop_tau_and_p_in_range(values in proptest::collection::vec(-100.0f64..100.0, 2..60)) {
            let result = kendall_trend(&values, PValueMethod::Auto).unwrap();
            if !result.is_degenerate() {
                prop_assert!((-1.0..=1.0).contains(&result.tau));
                prop_assert!((0.0..=1.0).contains(&result.p_value));
            }
        }
    }
}
