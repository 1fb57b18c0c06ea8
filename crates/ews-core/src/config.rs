//! Configuration for ews-core
//!
//! Centralized configuration for a pipeline run: window size, selected
//! indicators, trend test method and preprocessing.

use ews_stats::PValueMethod;
use serde::{Deserialize, Serialize};

use crate::calculator::IndicatorSelection;
use crate::error::{EwsError, EwsResult};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EwsConfig {
    /// Apply `ln(x + 1)` to every variable before windowing
    pub log_transform: bool,
    /// Rolling window settings
    pub window: WindowConfig,
    /// Indicator selection
    pub indicators: IndicatorConfig,
    /// Trend test settings
    pub trend: TrendConfig,
}

impl Default for EwsConfig {
    fn default() -> Self {
        Self {
            log_transform: false,
            window: WindowConfig::default(),
            indicators: IndicatorConfig::default(),
            trend: TrendConfig::default(),
        }
    }
}

/// Rolling window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window length as a percentage of the series length, in (0, 100]
    pub size_percent: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size_percent: 50.0 }
    }
}

/// Indicator selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Registry ids of the indicators to compute
    pub selected: IndicatorSelection,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            selected: IndicatorSelection::core(),
        }
    }
}

/// Trend test configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// How Kendall p-values are computed
    pub method: PValueMethod,
    /// Significance level behind `EwsReport::signals`
    pub alpha: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            method: PValueMethod::Auto,
            alpha: 0.05,
        }
    }
}

impl EwsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size percentage
    pub fn with_window_percent(mut self, size_percent: f64) -> Self {
        self.window.size_percent = size_percent;
        self
    }

    /// Replace the indicator selection
    pub fn with_indicators(mut self, selected: IndicatorSelection) -> Self {
        self.indicators.selected = selected;
        self
    }

    /// Set the p-value method
    pub fn with_method(mut self, method: PValueMethod) -> Self {
        self.trend.method = method;
        self
    }

    /// Set the significance level for reported signals
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.trend.alpha = alpha;
        self
    }

    /// Enable or disable the log transform
    pub fn with_log_transform(mut self, enabled: bool) -> Self {
        self.log_transform = enabled;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> EwsResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> EwsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> EwsResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> EwsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    ///
    /// Indicator ids are checked against a registry when the pipeline is
    /// built, not here.
    pub fn validate(&self) -> EwsResult<()> {
        let percent = self.window.size_percent;
        if !(percent > 0.0 && percent <= 100.0) {
            return Err(EwsError::InvalidConfig(format!(
                "window.size_percent must be in (0, 100], got {percent}"
            )));
        }

        let alpha = self.trend.alpha;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(EwsError::InvalidConfig(format!(
                "trend.alpha must be in (0, 1), got {alpha}"
            )));
        }

        Ok(())
    }
}
