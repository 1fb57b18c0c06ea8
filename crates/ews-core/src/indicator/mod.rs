//! Early-warning indicators.
//!
//! An indicator reduces one numeric column (a whole variable or one rolling
//! window of it) to a single value. Indicators are looked up by id in an
//! [`IndicatorRegistry`], so new statistics can be added without touching
//! the calculator or the pipeline.
//!
//! # Key Components
//!
//! - [`Indicator`]: The trait every indicator implements
//! - [`IndicatorMetadata`]: Static metadata describing an indicator
//! - [`IndicatorKind`]: The built-in indicators
//! - [`FnIndicator`]: Wraps a closure as an indicator
//! - [`IndicatorRegistry`]: Registry of all available indicators
//!
//! # Example
//!
//! ```ignore
//! let mut registry = IndicatorRegistry::new();
//! registry.register_fn("range", "Range", IndicatorCategory::Variability, |col| {
//!     col.fold(f64::NEG_INFINITY, |a, &b| a.max(b)) - col.fold(f64::INFINITY, |a, &b| a.min(b))
//! });
//! let range = registry.get("range").unwrap().compute(window.view());
//! ```

pub mod builtins;
pub mod registry;

pub use builtins::BuiltinIndicator;
pub use registry::IndicatorRegistry;

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::EwsError;

/// What aspect of the dynamics an indicator tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorCategory {
    /// Short-term memory (autocorrelation, AR(1), spectral reddening)
    Memory,

    /// Amplitude of fluctuations (variance, standard deviation, CV)
    Variability,

    /// Asymmetry and tails of the distribution (skewness, kurtosis)
    Shape,

    /// User-registered indicators
    Custom,
}

impl IndicatorCategory {
    /// Get a human-readable display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            IndicatorCategory::Memory => "Memory",
            IndicatorCategory::Variability => "Variability",
            IndicatorCategory::Shape => "Distribution Shape",
            IndicatorCategory::Custom => "Custom",
        }
    }
}

/// The built-in indicators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Autocorrelation,
    Variance,
    Skewness,
    StandardDeviation,
    Kurtosis,
    CoefficientOfVariation,
    Ar1,
    ReturnRate,
    DensityRatio,
}

impl IndicatorKind {
    /// Every built-in indicator, in registration order
    pub const ALL: [IndicatorKind; 9] = [
        IndicatorKind::Autocorrelation,
        IndicatorKind::Variance,
        IndicatorKind::Skewness,
        IndicatorKind::StandardDeviation,
        IndicatorKind::Kurtosis,
        IndicatorKind::CoefficientOfVariation,
        IndicatorKind::Ar1,
        IndicatorKind::ReturnRate,
        IndicatorKind::DensityRatio,
    ];

    /// The three indicators of the classic EWS report
    pub const CORE: [IndicatorKind; 3] = [
        IndicatorKind::Autocorrelation,
        IndicatorKind::Variance,
        IndicatorKind::Skewness,
    ];

    /// Registry id
    pub fn id(&self) -> &'static str {
        match self {
            IndicatorKind::Autocorrelation => "autocorrelation",
            IndicatorKind::Variance => "variance",
            IndicatorKind::Skewness => "skewness",
            IndicatorKind::StandardDeviation => "standard_deviation",
            IndicatorKind::Kurtosis => "kurtosis",
            IndicatorKind::CoefficientOfVariation => "coefficient_of_variation",
            IndicatorKind::Ar1 => "ar1",
            IndicatorKind::ReturnRate => "return_rate",
            IndicatorKind::DensityRatio => "density_ratio",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            IndicatorKind::Autocorrelation => "Lag-1 Autocorrelation",
            IndicatorKind::Variance => "Variance",
            IndicatorKind::Skewness => "Skewness",
            IndicatorKind::StandardDeviation => "Standard Deviation",
            IndicatorKind::Kurtosis => "Kurtosis",
            IndicatorKind::CoefficientOfVariation => "Coefficient of Variation",
            IndicatorKind::Ar1 => "AR(1) Coefficient",
            IndicatorKind::ReturnRate => "Return Rate",
            IndicatorKind::DensityRatio => "Spectral Density Ratio",
        }
    }

    pub fn category(&self) -> IndicatorCategory {
        match self {
            IndicatorKind::Autocorrelation
            | IndicatorKind::Ar1
            | IndicatorKind::ReturnRate
            | IndicatorKind::DensityRatio => IndicatorCategory::Memory,
            IndicatorKind::Variance
            | IndicatorKind::StandardDeviation
            | IndicatorKind::CoefficientOfVariation => IndicatorCategory::Variability,
            IndicatorKind::Skewness | IndicatorKind::Kurtosis => IndicatorCategory::Shape,
        }
    }

    /// Look up a built-in by its registry id
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for IndicatorKind {
    type Err = EwsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| EwsError::UnknownIndicator(s.to_string()))
    }
}

/// Metadata describing an indicator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorMetadata {
    /// Unique identifier (e.g., "autocorrelation")
    pub id: String,

    /// Human-readable name (e.g., "Lag-1 Autocorrelation")
    pub name: String,

    /// Category for organization
    pub category: IndicatorCategory,

    /// Description of the statistic
    pub description: String,
}

/// The core trait all indicators implement.
///
/// Indicators are pure: the same column always gives the same value, and
/// an undefined statistic is returned as `NaN` rather than an error.
pub trait Indicator: Send + Sync {
    /// Get static metadata describing this indicator
    fn metadata(&self) -> &IndicatorMetadata;

    /// Reduce a column to one value
    fn compute(&self, column: ArrayView1<'_, f64>) -> f64;
}

type IndicatorFn = dyn Fn(ArrayView1<'_, f64>) -> f64 + Send + Sync;

/// An indicator backed by a closure
pub struct FnIndicator {
    metadata: IndicatorMetadata,
    func: Box<IndicatorFn>,
}

impl FnIndicator {
    pub fn new<F>(metadata: IndicatorMetadata, func: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> f64 + Send + Sync + 'static,
    {
        Self {
            metadata,
            func: Box::new(func),
        }
    }
}

impl Indicator for FnIndicator {
    fn metadata(&self) -> &IndicatorMetadata {
        &self.metadata
    }

    fn compute(&self, column: ArrayView1<'_, f64>) -> f64 {
        (self.func)(column)
    }
}
