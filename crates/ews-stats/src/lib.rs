//! ews-stats - Statistical primitives for early-warning signals
//!
//! This crate provides the numeric building blocks used to look for
//! critical slowing down ahead of a regime shift:
//!
//! - **Windows**: rolling-window views of a univariate series
//! - **Moments**: population variance, adjusted skewness, excess kurtosis,
//!   coefficient of variation
//! - **Autocorrelation**: lag-1 autocorrelation, AR(1) coefficient,
//!   return rate and AR(1) spectral density ratio
//! - **Kendall**: tau-b rank correlation with exact or asymptotic p-values
//!
//! # Design Philosophy
//!
//! Every function is pure. Undefined statistics (a constant window, too few
//! points) come back as `NaN` so one pathological window never aborts a
//! batch; malformed arguments come back as [`StatsError`].

pub mod autocorrelation;
pub mod error;
pub mod kendall;
pub mod moments;
pub mod window;

pub use autocorrelation::*;
pub use error::*;
pub use kendall::*;
pub use moments::*;
pub use window::*;
