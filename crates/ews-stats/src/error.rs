//! Error types for ews-stats

use thiserror::Error;

/// Errors raised at the boundary of a statistical primitive
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Out-of-range configuration (window percentage, window length)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Wrong data shape (multi-dimensional series, too few values)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for statistical primitives
pub type StatsResult<T> = Result<T, StatsError>;
