//! Early-warning-signal pipeline
//!
//! For every variable of a [`TimeSeries`]:
//!
//! 1. cut the column into rolling windows,
//! 2. evaluate each selected indicator on every window,
//! 3. collect one [`IndicatorSequence`] per indicator in window-start order,
//! 4. run the Kendall trend test on each sequence.
//!
//! Validation errors stop the run at the first failure and no partial
//! report is returned. Undefined statistics are kept as NaN and only logged.

use std::collections::BTreeMap;

use ews_stats::{
    kendall_trend, rolling_window, window_count, window_length, PValueMethod, StatsError,
    TrendResult,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use crate::calculator::{IndicatorCalculator, IndicatorSelection, IndicatorValue};
use crate::config::EwsConfig;
use crate::error::EwsResult;
use crate::indicator::IndicatorRegistry;
use crate::series::TimeSeries;

/// Identifies one (variable, indicator) pair of a report
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrendKey {
    /// Zero-based variable index
    pub variable: usize,
    /// Indicator id
    pub indicator: String,
}

impl TrendKey {
    pub fn new(variable: usize, indicator: impl Into<String>) -> Self {
        Self {
            variable,
            indicator: indicator.into(),
        }
    }
}

/// Values of one indicator across successive windows of one variable
///
/// `values[i]` belongs to the window starting at offset `i`; the trend test
/// depends on this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSequence {
    /// Indicator id
    pub indicator: String,
    /// Zero-based variable index
    pub variable: usize,
    /// One value per window, in window-start order
    pub values: Vec<f64>,
}

impl IndicatorSequence {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the values tagged with their window offsets
    pub fn entries(&self) -> impl Iterator<Item = IndicatorValue> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(window, &value)| IndicatorValue {
                indicator: self.indicator.clone(),
                variable: self.variable,
                window: Some(window),
                value,
            })
    }

    /// Kendall trend of the sequence against window order
    pub fn trend(&self, method: PValueMethod) -> EwsResult<TrendResult> {
        Ok(kendall_trend(&self.values, method)?)
    }
}

/// Sequence and trend for one (variable, indicator) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTrend {
    /// Name of the variable
    pub variable_name: String,
    /// Per-window indicator values
    pub sequence: IndicatorSequence,
    /// Kendall trend of the sequence
    pub trend: TrendResult,
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EwsReport {
    /// Length of each rolling window
    pub window_length: usize,
    /// Number of windows per variable
    pub window_count: usize,
    /// Significance level the report was produced with
    pub alpha: f64,
    /// Results keyed by (variable, indicator)
    #[serde(serialize_with = "serialize_results")]
    pub results: BTreeMap<TrendKey, IndicatorTrend>,
}

fn serialize_results<S: Serializer>(
    results: &BTreeMap<TrendKey, IndicatorTrend>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(results.values())
}

impl EwsReport {
    /// Full result for a pair
    pub fn get(&self, variable: usize, indicator: &str) -> Option<&IndicatorTrend> {
        self.results.get(&TrendKey::new(variable, indicator))
    }

    /// Trend result for a pair
    pub fn trend(&self, variable: usize, indicator: &str) -> Option<&TrendResult> {
        self.get(variable, indicator).map(|r| &r.trend)
    }

    /// All trend results keyed by (variable, indicator)
    pub fn trends(&self) -> BTreeMap<TrendKey, TrendResult> {
        self.results
            .iter()
            .map(|(key, result)| (key.clone(), result.trend))
            .collect()
    }

    /// Pairs whose tau or p-value is undefined
    pub fn degenerate_keys(&self) -> Vec<&TrendKey> {
        self.results
            .iter()
            .filter(|(_, r)| r.trend.is_degenerate())
            .map(|(key, _)| key)
            .collect()
    }

    /// Pairs with a significant trend at level `alpha`
    pub fn significant(&self, alpha: f64) -> Vec<&IndicatorTrend> {
        self.results
            .values()
            .filter(|r| r.trend.is_significant(alpha))
            .collect()
    }

    /// Pairs significant at the configured level: the early-warning signals
    pub fn signals(&self) -> Vec<&IndicatorTrend> {
        self.significant(self.alpha)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Serialize the report to JSON
    pub fn to_json(&self) -> EwsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the windowing, indicator and trend stages with a fixed configuration
pub struct EwsPipeline {
    config: EwsConfig,
    calculator: IndicatorCalculator,
}

impl EwsPipeline {
    /// Pipeline over the built-in indicators
    pub fn new(config: EwsConfig) -> EwsResult<Self> {
        Self::with_registry(config, IndicatorRegistry::new())
    }

    /// Pipeline over a custom registry
    ///
    /// Fails if the configuration is invalid or selects an indicator the
    /// registry does not know.
    pub fn with_registry(config: EwsConfig, registry: IndicatorRegistry) -> EwsResult<Self> {
        config.validate()?;
        let calculator = IndicatorCalculator::with_registry(registry);
        calculator.resolve(&config.indicators.selected)?;
        Ok(Self { config, calculator })
    }

    pub fn config(&self) -> &EwsConfig {
        &self.config
    }

    pub fn calculator(&self) -> &IndicatorCalculator {
        &self.calculator
    }

    /// Run the pipeline on a series
    pub fn run(&self, series: &TimeSeries) -> EwsResult<EwsReport> {
        let transformed;
        let series = if self.config.log_transform {
            transformed = series.log_transform()?;
            &transformed
        } else {
            series
        };

        let percent = self.config.window.size_percent;
        let method = self.config.trend.method;
        let indicators = self.calculator.resolve(&self.config.indicators.selected)?;

        let mw = window_length(series.len(), percent)?;
        let count = window_count(series.len(), mw);
        if !indicators.is_empty() && count < 2 {
            return Err(StatsError::InvalidInput(format!(
                "{percent}% of {} values leaves {count} window, a trend needs at least 2",
                series.len()
            ))
            .into());
        }

        tracing::debug!(
            observations = series.len(),
            variables = series.n_variables(),
            window_length = mw,
            windows = count,
            indicators = indicators.len(),
            "running early-warning-signal pipeline"
        );

        let mut results = BTreeMap::new();
        for (variable, name, column) in series.variables() {
            let windows = rolling_window(&column, percent)?;

            // rows[i][k]: indicator k on the window starting at i
            #[cfg(feature = "parallel")]
            let rows: Vec<Vec<f64>> = (0..windows.nrows())
                .into_par_iter()
                .map(|i| self.calculator.compute_column(windows.row(i), &indicators))
                .collect();

            #[cfg(not(feature = "parallel"))]
            let rows: Vec<Vec<f64>> = (0..windows.nrows())
                .map(|i| self.calculator.compute_column(windows.row(i), &indicators))
                .collect();

            for (k, indicator) in indicators.iter().enumerate() {
                let id = &indicator.metadata().id;
                let sequence = IndicatorSequence {
                    indicator: id.clone(),
                    variable,
                    values: rows.iter().map(|row| row[k]).collect(),
                };
                let trend = sequence.trend(method)?;

                if trend.is_degenerate() {
                    tracing::warn!(
                        variable = name,
                        indicator = id.as_str(),
                        "trend is undefined (constant or NaN indicator values)"
                    );
                }

                results.insert(
                    TrendKey::new(variable, id.clone()),
                    IndicatorTrend {
                        variable_name: name.to_string(),
                        sequence,
                        trend,
                    },
                );
            }

            tracing::debug!(variable = name, "indicator trends computed");
        }

        let report = EwsReport {
            window_length: mw,
            window_count: count,
            alpha: self.config.trend.alpha,
            results,
        };
        tracing::debug!(
            signals = report.signals().len(),
            alpha = report.alpha,
            "pipeline finished"
        );
        Ok(report)
    }
}

/// Run the pipeline with the built-in indicators and default trend settings
pub fn run_ews(
    series: &TimeSeries,
    window_size_percent: f64,
    selection: &IndicatorSelection,
) -> EwsResult<EwsReport> {
    let config = EwsConfig::new()
        .with_window_percent(window_size_percent)
        .with_indicators(selection.clone());
    EwsPipeline::new(config)?.run(series)
}
