//! Deterministic synthetic series for integration tests

use ews_core::TimeSeries;

/// xorshift64 generator, enough for reproducible test noise
pub struct Noise {
    state: u64,
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next_uniform(&mut self) -> f64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately standard normal (Irwin-Hall with 12 terms)
    pub fn next_normal(&mut self) -> f64 {
        (0..12).map(|_| self.next_uniform()).sum::<f64>() - 6.0
    }
}

/// AR(1) process whose coefficient ramps from 0.1 to 0.95
///
/// Recovery from perturbations slows down over time, so variance and
/// lag-1 autocorrelation both rise.
pub fn slowing_down(n: usize, seed: u64) -> TimeSeries {
    let mut noise = Noise::new(seed);
    let mut x = 0.0;
    let values = (0..n)
        .map(|t| {
            let phi = 0.1 + 0.85 * t as f64 / (n - 1) as f64;
            x = phi * x + noise.next_normal();
            x
        })
        .collect();
    TimeSeries::univariate(values).unwrap()
}

/// Stationary white noise
#[allow(dead_code)]
pub fn white_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut noise = Noise::new(seed);
    (0..n).map(|_| noise.next_normal()).collect()
}
