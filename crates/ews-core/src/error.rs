//! Error types for ews-core
//!
//! Every failure maps onto one of two kinds:
//! - **InvalidParameter**: out-of-range configuration (window size,
//!   unknown indicator, bad config values)
//! - **InvalidInput**: wrong data shape (time index not increasing, too few
//!   windows to test a trend)
//!
//! Undefined statistics are not errors; they are reported as NaN.

use ews_stats::StatsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for early-warning-signal operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EwsError {
    /// Error raised by a statistical primitive
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Time series violates its invariants
    #[error("Invalid time series: {0}")]
    InvalidSeries(String),

    /// Indicator id not present in the registry
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed or written
    #[error("Configuration format error: {0}")]
    ConfigFormat(String),
}

/// Coarse classification of an [`EwsError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidParameter,
    InvalidInput,
}

impl EwsError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EwsError::Stats(StatsError::InvalidParameter(_))
            | EwsError::UnknownIndicator(_)
            | EwsError::InvalidConfig(_)
            | EwsError::ConfigFormat(_) => ErrorKind::InvalidParameter,
            EwsError::Stats(StatsError::InvalidInput(_)) | EwsError::InvalidSeries(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}

impl From<toml::de::Error> for EwsError {
    fn from(e: toml::de::Error) -> Self {
        EwsError::ConfigFormat(e.to_string())
    }
}

impl From<toml::ser::Error> for EwsError {
    fn from(e: toml::ser::Error) -> Self {
        EwsError::ConfigFormat(e.to_string())
    }
}

impl From<serde_json::Error> for EwsError {
    fn from(e: serde_json::Error) -> Self {
        EwsError::ConfigFormat(e.to_string())
    }
}

/// Result type for early-warning-signal operations
pub type EwsResult<T> = Result<T, EwsError>;
