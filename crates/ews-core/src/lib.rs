//! ews-core - Early-warning signals for critical transitions
//!
//! This crate turns a multi-variable time series into an early-warning
//! report: for every variable it tracks rolling-window indicators and asks
//! whether each one trends monotonically through time, as expected ahead
//! of a tipping point.
//!
//! # Key Components
//!
//! - **TimeSeries**: validated matrix with the time index in column 0
//! - **IndicatorRegistry**: id -> indicator table, extensible at runtime
//! - **IndicatorCalculator**: per-variable indicator values
//! - **EwsPipeline**: windows -> indicator sequences -> Kendall trends
//! - **EwsConfig**: TOML/JSON configuration for a pipeline run
//!
//! # Example
//!
//! ```ignore
//! let series = TimeSeries::univariate(values)?;
//! let report = run_ews(&series, 50.0, &IndicatorSelection::core())?;
//! let ac = report.trend(0, "autocorrelation").unwrap();
//! println!("tau = {:.4}, p = {:.4}", ac.tau, ac.p_value);
//! ```

pub mod calculator;
pub mod config;
pub mod error;
pub mod indicator;
pub mod pipeline;
pub mod series;

pub use calculator::*;
pub use config::*;
pub use error::*;
pub use indicator::{
    BuiltinIndicator, FnIndicator, Indicator, IndicatorCategory, IndicatorKind,
    IndicatorMetadata, IndicatorRegistry,
};
pub use pipeline::*;
pub use series::*;

pub use ews_stats::{PValueMethod, StatsError, TrendResult};
