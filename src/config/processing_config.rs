// src/config/processing_config.rs
//! Conditioning and trend configuration structures

use serde::{Deserialize, Serialize};
use super::defaults;

/// Anti-aliasing filter configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConditioningConfig {
    /// Allow the low-pass stage; DC removal always runs
    #[serde(default = "defaults::lowpass_enabled")]
    pub lowpass_enabled: bool,

    /// The low-pass stage runs only when the sample rate exceeds this
    #[serde(default = "defaults::filter_threshold_hz")]
    pub filter_threshold_hz: f64,

    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    #[serde(default = "defaults::max_cutoff_hz")]
    pub max_cutoff_hz: f64,

    #[serde(default = "defaults::nyquist_fraction")]
    pub nyquist_fraction: f64,
}

/// Trend estimation configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrendConfig {
    /// History entries required before a trend is reported; also the fit window
    #[serde(default = "defaults::min_history")]
    pub min_history: usize,

    /// Entries averaged for the remaining-life estimate
    #[serde(default = "defaults::recent_window")]
    pub recent_window: usize,

    /// Net drift across the fit window that counts as a trend
    #[serde(default = "defaults::slope_threshold")]
    pub slope_threshold: f64,

    /// K in remaining ≈ K × mean_score²
    #[serde(default = "defaults::rul_scale_cycles")]
    pub rul_scale_cycles: f64,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            lowpass_enabled: defaults::lowpass_enabled(),
            filter_threshold_hz: defaults::filter_threshold_hz(),
            filter_order: defaults::filter_order(),
            max_cutoff_hz: defaults::max_cutoff_hz(),
            nyquist_fraction: defaults::nyquist_fraction(),
        }
    }
}

impl ConditioningConfig {
    /// Low-pass cutoff for a given sample rate: min(max_cutoff, fraction × Nyquist)
    pub fn cutoff_for(&self, sample_rate_hz: f64) -> f64 {
        let nyquist = sample_rate_hz / 2.0;
        self.max_cutoff_hz.min(self.nyquist_fraction * nyquist)
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_history: defaults::min_history(),
            recent_window: defaults::recent_window(),
            slope_threshold: defaults::slope_threshold(),
            rul_scale_cycles: defaults::rul_scale_cycles(),
        }
    }
}
