//! Indicator calculator
//!
//! Computes a selection of indicators over every variable column of a
//! [`TimeSeries`]. The selection is a set of registry ids, so adding an
//! indicator to the registry makes it selectable without any change here.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{EwsError, EwsResult};
use crate::indicator::{Indicator, IndicatorKind, IndicatorRegistry};
use crate::series::TimeSeries;

/// Indicator id -> one value per variable column
pub type IndicatorTable = BTreeMap<String, Vec<f64>>;

/// The set of indicators requested from a calculation
///
/// Ids are kept sorted, so iteration order (and therefore output order)
/// does not depend on how the selection was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSelection {
    ids: BTreeSet<String>,
}

impl IndicatorSelection {
    /// An empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Autocorrelation, variance and skewness
    pub fn core() -> Self {
        Self::from_kinds(IndicatorKind::CORE)
    }

    /// Every built-in indicator
    pub fn all_builtin() -> Self {
        Self::from_kinds(IndicatorKind::ALL)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = IndicatorKind>) -> Self {
        kinds.into_iter().collect()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Add an indicator by id
    pub fn with(mut self, id: impl Into<String>) -> Self {
        self.insert(id);
        self
    }

    /// Add a built-in indicator
    pub fn with_kind(self, kind: IndicatorKind) -> Self {
        self.with(kind.id())
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<IndicatorKind> for IndicatorSelection {
    fn from_iter<T: IntoIterator<Item = IndicatorKind>>(iter: T) -> Self {
        Self::from_ids(iter.into_iter().map(|k| k.id()))
    }
}

/// A single indicator value with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    /// Indicator id
    pub indicator: String,
    /// Zero-based variable index
    pub variable: usize,
    /// Start offset of the window, `None` for a whole-column value
    pub window: Option<usize>,
    /// The statistic (NaN when undefined)
    pub value: f64,
}

/// Computes registered indicators over columns and series
pub struct IndicatorCalculator {
    registry: IndicatorRegistry,
}

impl IndicatorCalculator {
    /// Calculator over the built-in indicators
    pub fn new() -> Self {
        Self::with_registry(IndicatorRegistry::new())
    }

    pub fn with_registry(registry: IndicatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut IndicatorRegistry {
        &mut self.registry
    }

    /// Look up every selected indicator, failing on the first unknown id
    pub fn resolve(&self, selection: &IndicatorSelection) -> EwsResult<Vec<&dyn Indicator>> {
        selection
            .iter()
            .map(|id| {
                self.registry
                    .get(id)
                    .ok_or_else(|| EwsError::UnknownIndicator(id.to_string()))
            })
            .collect()
    }

    /// Evaluate resolved indicators on one column, in resolution order
    pub fn compute_column(
        &self,
        column: ArrayView1<'_, f64>,
        indicators: &[&dyn Indicator],
    ) -> Vec<f64> {
        indicators.iter().map(|i| i.compute(column)).collect()
    }

    /// Compute the selected indicators over every variable column
    ///
    /// The empty selection gives an empty table.
    pub fn compute(
        &self,
        series: &TimeSeries,
        selection: &IndicatorSelection,
    ) -> EwsResult<IndicatorTable> {
        let indicators = self.resolve(selection)?;

        Ok(indicators
            .iter()
            .map(|indicator| {
                let values = series
                    .variables()
                    .map(|(_, _, column)| indicator.compute(column))
                    .collect();
                (indicator.metadata().id.clone(), values)
            })
            .collect())
    }

    /// Same as [`compute`](Self::compute), flattened into tagged values
    pub fn compute_values(
        &self,
        series: &TimeSeries,
        selection: &IndicatorSelection,
    ) -> EwsResult<Vec<IndicatorValue>> {
        let table = self.compute(series, selection)?;

        Ok(table
            .into_iter()
            .flat_map(|(indicator, values)| {
                values
                    .into_iter()
                    .enumerate()
                    .map(move |(variable, value)| IndicatorValue {
                        indicator: indicator.clone(),
                        variable,
                        window: None,
                        value,
                    })
            })
            .collect())
    }
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self::new()
    }
}
