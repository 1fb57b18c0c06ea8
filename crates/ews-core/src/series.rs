//! Time series container
//!
//! A [`TimeSeries`] is a matrix whose first column is the time index and
//! whose remaining columns are the observed variables, the layout used by
//! the early-warning-signal toolbox for multi-variable records.

use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use serde::Serialize;

use crate::error::{EwsError, EwsResult};

/// An immutable, validated multi-variable time series
///
/// Invariants (checked at construction):
/// - at least one observation and at least one variable column
/// - the time index is finite and strictly increasing
/// - exactly one name per variable column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    data: Array2<f64>,
    names: Vec<String>,
}

impl TimeSeries {
    /// Build from a matrix with the time index in column 0
    pub fn from_array(data: Array2<f64>) -> EwsResult<Self> {
        let n_vars = data.ncols().saturating_sub(1);
        let names = default_names(n_vars);
        let series = Self { data, names };
        series.validate()?;
        Ok(series)
    }

    /// Build from a time index and one vector per variable
    pub fn from_columns(time: Vec<f64>, variables: Vec<Vec<f64>>) -> EwsResult<Self> {
        let rows = time.len();
        if let Some((i, col)) = variables.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(EwsError::InvalidSeries(format!(
                "variable {} has {} values but the time index has {}",
                i + 1,
                col.len(),
                rows
            )));
        }

        let mut data = Array2::zeros((rows, variables.len() + 1));
        data.column_mut(0).assign(&Array1::from(time));
        for (i, col) in variables.into_iter().enumerate() {
            data.column_mut(i + 1).assign(&Array1::from(col));
        }

        Self::from_array(data)
    }

    /// Build a single-variable series with the implicit time index `0..n`
    pub fn univariate(values: Vec<f64>) -> EwsResult<Self> {
        let time = (0..values.len()).map(|t| t as f64).collect();
        Self::from_columns(time, vec![values])
    }

    /// Replace the variable names
    pub fn with_names<S: Into<String>>(mut self, names: Vec<S>) -> EwsResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.n_variables() {
            return Err(EwsError::InvalidSeries(format!(
                "{} names given for {} variables",
                names.len(),
                self.n_variables()
            )));
        }
        self.names = names;
        Ok(self)
    }

    fn validate(&self) -> EwsResult<()> {
        if self.data.nrows() == 0 {
            return Err(EwsError::InvalidSeries(
                "time series has no observations".to_string(),
            ));
        }
        if self.data.ncols() < 2 {
            return Err(EwsError::InvalidSeries(
                "time series needs a time column and at least one variable".to_string(),
            ));
        }

        let time = self.time();
        if let Some(t) = time.iter().find(|t| !t.is_finite()) {
            return Err(EwsError::InvalidSeries(format!(
                "time index must be finite, found {t}"
            )));
        }
        if let Some(i) = (1..time.len()).find(|&i| time[i] <= time[i - 1]) {
            return Err(EwsError::InvalidSeries(format!(
                "time index must be strictly increasing ({} at row {} follows {})",
                time[i],
                i,
                time[i - 1]
            )));
        }

        Ok(())
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false for a validated series
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Number of variable columns
    pub fn n_variables(&self) -> usize {
        self.data.ncols() - 1
    }

    /// The time index
    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    /// Variable column by zero-based variable index
    pub fn variable(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.n_variables()).then(|| self.data.column(index + 1))
    }

    /// Name of a variable
    pub fn variable_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// All variable names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over `(index, name, column)` for every variable
    pub fn variables(&self) -> impl Iterator<Item = (usize, &str, ArrayView1<'_, f64>)> {
        self.data
            .axis_iter(Axis(1))
            .skip(1)
            .zip(self.names.iter())
            .enumerate()
            .map(|(i, (col, name))| (i, name.as_str(), col))
    }

    /// The underlying matrix (time in column 0)
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Log transform `ln(x + 1)` of every variable column
    ///
    /// The time index is copied unchanged. Values at or below `-1` have no
    /// logarithm and are rejected.
    pub fn log_transform(&self) -> EwsResult<Self> {
        if let Some((i, name, v)) = self.variables().find_map(|(i, name, col)| {
            col.iter().copied().find(|&v| v <= -1.0).map(|v| (i, name, v))
        }) {
            return Err(EwsError::InvalidSeries(format!(
                "log transform needs values above -1, variable {} ('{}') has {}",
                i + 1,
                name,
                v
            )));
        }

        let mut data = self.data.clone();
        data.slice_mut(s![.., 1..]).mapv_inplace(|v| v.ln_1p());

        Ok(Self {
            data,
            names: self.names.clone(),
        })
    }
}

fn default_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("var{i}")).collect()
}
