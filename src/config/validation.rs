// src/config/validation.rs
//! Configuration validation

use crate::config::constants::{buffer, conditioning};
use crate::config::MonitorConfig;
use crate::processing::actuator::ForceLevelTable;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub value: String,
}

impl ValidationError {
    fn new(field: &str, message: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation error for '{}': {} (value: {})", self.field, self.message, self.value)
    }
}

impl std::error::Error for ValidationError {}

fn check_count(errors: &mut Vec<ValidationError>, field: &str, value: usize, max: usize) {
    if value == 0 || value > max {
        errors.push(ValidationError::new(field, &format!("must be in 1..={}", max), value));
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ValidationError::new(field, "must be a finite positive number", value));
    }
}

/// Check every section and collect all violations
pub fn validate_config(config: &MonitorConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_count(&mut errors, "pipeline.buffer_capacity", config.pipeline.buffer_capacity, buffer::MAX_BUFFER_CAPACITY);
    check_count(&mut errors, "pipeline.history_limit", config.pipeline.history_limit, buffer::MAX_HISTORY_LIMIT);
    check_positive(&mut errors, "pipeline.sample_rate_hz", config.pipeline.sample_rate_hz);

    let cond = &config.conditioning;
    check_positive(&mut errors, "conditioning.filter_threshold_hz", cond.filter_threshold_hz);
    check_positive(&mut errors, "conditioning.max_cutoff_hz", cond.max_cutoff_hz);
    if !(conditioning::MIN_FILTER_ORDER..=conditioning::MAX_FILTER_ORDER).contains(&cond.filter_order) {
        errors.push(ValidationError::new(
            "conditioning.filter_order",
            &format!("must be in {}..={}", conditioning::MIN_FILTER_ORDER, conditioning::MAX_FILTER_ORDER),
            cond.filter_order,
        ));
    }
    if !(cond.nyquist_fraction > 0.0 && cond.nyquist_fraction < 1.0) {
        errors.push(ValidationError::new(
            "conditioning.nyquist_fraction",
            "must be strictly between 0 and 1",
            cond.nyquist_fraction,
        ));
    }

    if let Err(reason) = config.limits.check() {
        errors.push(ValidationError::new("limits.critical_rms_limit", &reason, config.limits.critical_rms_limit));
    }

    if let Err(err) = ForceLevelTable::from_levels(&config.force_levels) {
        let reason = match err {
            crate::error::AvcsError::Configuration { reason, .. } => reason,
            other => other.to_string(),
        };
        errors.push(ValidationError::new("force_levels", &reason, format!("{:?}", config.force_levels)));
    }

    let trend = &config.trend;
    if trend.min_history < 2 {
        errors.push(ValidationError::new("trend.min_history", "a slope needs at least 2 entries", trend.min_history));
    }
    if trend.recent_window == 0 {
        errors.push(ValidationError::new("trend.recent_window", "must be at least 1", trend.recent_window));
    }
    if !trend.slope_threshold.is_finite() || trend.slope_threshold < 0.0 {
        errors.push(ValidationError::new("trend.slope_threshold", "must be finite and non-negative", trend.slope_threshold));
    }
    check_positive(&mut errors, "trend.rul_scale_cycles", trend.rul_scale_cycles);

    errors
}
