// src/config/mod.rs
//! Monitoring configuration: defaults, validation and loading

pub mod constants;
pub mod loader;
pub mod processing_config;
pub mod validation;

pub use constants::*;
pub use loader::ConfigLoader;
pub use processing_config::*;
pub use validation::ValidationError;

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::error::{AvcsError, AvcsResult};
use crate::processing::actuator::ForceLevelTable;
use crate::processing::scoring::ScoreLimits;

/// Complete configuration for one monitored asset
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MonitorConfig {
    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub conditioning: ConditioningConfig,

    #[serde(default)]
    pub limits: ScoreLimits,

    /// Force magnitude per level name, in Newtons
    #[serde(default = "defaults::force_levels")]
    pub force_levels: BTreeMap<String, f64>,

    #[serde(default)]
    pub trend: TrendConfig,
}

/// Buffer and history sizing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PipelineSettings {
    #[serde(default = "defaults::buffer_capacity")]
    pub buffer_capacity: usize,

    #[serde(default = "defaults::history_limit")]
    pub history_limit: usize,

    /// Nominal acquisition rate, used by collaborators that do not pass one per cycle
    #[serde(default = "defaults::sample_rate_hz")]
    pub sample_rate_hz: f64,
}

/// Default value providers using constants
pub(crate) mod defaults {
    use std::collections::BTreeMap;
    use crate::config::constants::*;
    use crate::processing::actuator::ForceLevel;

    pub fn buffer_capacity() -> usize { buffer::DEFAULT_BUFFER_CAPACITY }
    pub fn history_limit() -> usize { buffer::DEFAULT_HISTORY_LIMIT }
    pub fn sample_rate_hz() -> f64 { buffer::DEFAULT_SAMPLE_RATE_HZ }

    pub fn lowpass_enabled() -> bool { true }
    pub fn filter_threshold_hz() -> f64 { conditioning::DEFAULT_FILTER_THRESHOLD_HZ }
    pub fn filter_order() -> usize { conditioning::DEFAULT_FILTER_ORDER }
    pub fn max_cutoff_hz() -> f64 { conditioning::DEFAULT_MAX_CUTOFF_HZ }
    pub fn nyquist_fraction() -> f64 { conditioning::DEFAULT_NYQUIST_FRACTION }

    pub fn critical_rms_limit() -> f64 { scoring::DEFAULT_CRITICAL_RMS_LIMIT }

    pub fn min_history() -> usize { trend::DEFAULT_MIN_HISTORY }
    pub fn recent_window() -> usize { trend::DEFAULT_RECENT_WINDOW }
    pub fn slope_threshold() -> f64 { trend::DEFAULT_SLOPE_THRESHOLD }
    pub fn rul_scale_cycles() -> f64 { trend::DEFAULT_RUL_SCALE_CYCLES }

    pub fn force_levels() -> BTreeMap<String, f64> {
        ForceLevel::ALL
            .iter()
            .map(|level| (level.name().to_string(), level.default_force()))
            .collect()
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: defaults::buffer_capacity(),
            history_limit: defaults::history_limit(),
            sample_rate_hz: defaults::sample_rate_hz(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineSettings::default(),
            conditioning: ConditioningConfig::default(),
            limits: ScoreLimits::default(),
            force_levels: defaults::force_levels(),
            trend: TrendConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> AvcsResult<Self> {
        let config: MonitorConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> AvcsResult<String> {
        toml::to_string_pretty(self).map_err(|e| AvcsError::ConfigLoad {
            source_name: "MonitorConfig".to_string(),
            reason: e.to_string(),
            context: crate::error_context!("monitor_config", "to_toml_string"),
        })
    }

    /// Collect every violation in the configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors = validation::validate_config(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the validated force table
    pub fn force_table(&self) -> AvcsResult<ForceLevelTable> {
        ForceLevelTable::from_levels(&self.force_levels)
    }

    /// Validate and convert violations into a single configuration error
    pub fn validated(self) -> AvcsResult<Self> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(errors) => {
                let reason = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(AvcsError::configuration(
                    "monitor_config",
                    reason,
                    crate::error_context!("monitor_config", "validate"),
                ))
            }
        }
    }
}
