//! Built-in indicators backed by ews-stats.

use ews_stats::{
    ar1_coefficient, coefficient_of_variation, density_ratio, kurtosis, lag1_autocorrelation,
    return_rate, skewness, std_dev, variance,
};
use ndarray::ArrayView1;

use super::{Indicator, IndicatorKind, IndicatorMetadata};

/// One of the statistics listed in [`IndicatorKind`]
pub struct BuiltinIndicator {
    kind: IndicatorKind,
    metadata: IndicatorMetadata,
}

impl BuiltinIndicator {
    pub fn new(kind: IndicatorKind) -> Self {
        Self {
            kind,
            metadata: IndicatorMetadata {
                id: kind.id().to_string(),
                name: kind.display_name().to_string(),
                category: kind.category(),
                description: description(kind).to_string(),
            },
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }
}

fn description(kind: IndicatorKind) -> &'static str {
    match kind {
        IndicatorKind::Autocorrelation => {
            "Pearson correlation between the series and itself shifted by one step"
        }
        IndicatorKind::Variance => "Population variance (denominator n)",
        IndicatorKind::Skewness => "Adjusted Fisher-Pearson skewness",
        IndicatorKind::StandardDeviation => "Population standard deviation",
        IndicatorKind::Kurtosis => "Excess kurtosis (m4 / m2^2 - 3)",
        IndicatorKind::CoefficientOfVariation => "Standard deviation divided by the mean",
        IndicatorKind::Ar1 => "Least-squares AR(1) coefficient",
        IndicatorKind::ReturnRate => "Reciprocal of the AR(1) coefficient",
        IndicatorKind::DensityRatio => {
            "Low- to high-frequency spectral density of the fitted AR(1) process"
        }
    }
}

impl Indicator for BuiltinIndicator {
    fn metadata(&self) -> &IndicatorMetadata {
        &self.metadata
    }

    fn compute(&self, column: ArrayView1<'_, f64>) -> f64 {
        match self.kind {
            IndicatorKind::Autocorrelation => lag1_autocorrelation(column),
            IndicatorKind::Variance => variance(column),
            IndicatorKind::Skewness => skewness(column),
            IndicatorKind::StandardDeviation => std_dev(column),
            IndicatorKind::Kurtosis => kurtosis(column),
            IndicatorKind::CoefficientOfVariation => coefficient_of_variation(column),
            IndicatorKind::Ar1 => ar1_coefficient(column),
            IndicatorKind::ReturnRate => return_rate(column),
            IndicatorKind::DensityRatio => density_ratio(column),
        }
    }
}
