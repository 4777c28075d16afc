// src/processing/conditioning.rs
//! Anti-aliasing low-pass and DC-offset removal

use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::ConditioningConfig;
use crate::processing::filters::IirFilter;

/// Conditioning actually applied to a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConditioningMode {
    /// Zero-phase Butterworth low-pass followed by mean removal
    Filtered { cutoff_hz: f64 },
    /// Mean removal only
    DcRemovedOnly { reason: DcOnlyReason },
}

/// Why the low-pass stage did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DcOnlyReason {
    /// Sample rate at or below the filtering threshold
    BelowThreshold,
    /// Built without the `lowpass` feature, or disabled in configuration
    LowpassUnavailable,
    /// Filter could not be designed for this sample rate
    DesignFailed,
    /// Window shorter than the filter's edge padding
    WindowTooShort,
}

/// Filtered, DC-removed copy of a buffer snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedWindow {
    pub samples: Vec<f64>,
    pub mode: ConditioningMode,
}

impl ConditionedWindow {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.mode, ConditioningMode::Filtered { .. })
    }
}

/// Applies the configured conditioning chain to raw windows
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    config: ConditioningConfig,
    // Design is cached per sample rate; rates rarely change between cycles
    cached: Option<(f64, IirFilter)>,
}

impl SignalConditioner {
    pub fn new(config: ConditioningConfig) -> Self {
        Self { config, cached: None }
    }

    /// Whether the low-pass stage can run at all
    pub fn lowpass_available(&self) -> bool {
        cfg!(feature = "lowpass") && self.config.lowpass_enabled
    }

    pub fn config(&self) -> &ConditioningConfig {
        &self.config
    }

    /// Low-pass (when applicable) then subtract the arithmetic mean
    pub fn condition(&mut self, window: &[f64], sample_rate_hz: f64) -> ConditionedWindow {
        let (mut samples, mode) = if sample_rate_hz <= self.config.filter_threshold_hz {
            (window.to_vec(), ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::BelowThreshold })
        } else if !self.lowpass_available() {
            (window.to_vec(), ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::LowpassUnavailable })
        } else {
            self.lowpass(window, sample_rate_hz)
        };

        remove_dc(&mut samples);
        ConditionedWindow { samples, mode }
    }

    fn lowpass(&mut self, window: &[f64], sample_rate_hz: f64) -> (Vec<f64>, ConditioningMode) {
        let filter = match self.filter_for(sample_rate_hz) {
            Some(filter) => filter,
            None => {
                return (window.to_vec(), ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::DesignFailed });
            }
        };
        let cutoff_hz = filter.cutoff();

        match filter.filtfilt(window) {
            Ok(filtered) => (filtered, ConditioningMode::Filtered { cutoff_hz }),
            Err(e) => {
                debug!(error = %e, len = window.len(), "window too short for low-pass, removing DC only");
                (window.to_vec(), ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::WindowTooShort })
            }
        }
    }

    fn filter_for(&mut self, sample_rate_hz: f64) -> Option<&IirFilter> {
        let stale = !matches!(&self.cached, Some((rate, _)) if *rate == sample_rate_hz);
        if stale {
            let cutoff = self.config.cutoff_for(sample_rate_hz);
            match IirFilter::butterworth_lowpass(self.config.filter_order, cutoff, sample_rate_hz) {
                Ok(filter) => {
                    debug!(sample_rate_hz, cutoff_hz = cutoff, order = self.config.filter_order, "designed low-pass filter");
                    self.cached = Some((sample_rate_hz, filter));
                }
                Err(e) => {
                    debug!(error = %e, sample_rate_hz, "low-pass design failed, removing DC only");
                    self.cached = None;
                    return None;
                }
            }
        }
        self.cached.as_ref().map(|(_, filter)| filter)
    }
}

/// Subtract the arithmetic mean in place
pub fn remove_dc(samples: &mut [f64]) {
    if samples.is_empty() {
        return;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter_mut().for_each(|x| *x -= mean);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn mean(data: &[f64]) -> f64 {
        data.iter().sum::<f64>() / data.len() as f64
    }

    #[test]
    fn test_low_rate_removes_dc_only() {
        let mut conditioner = SignalConditioner::new(ConditioningConfig::default());
        let window = vec![3.0, 5.0, 4.0, 4.0];
        let conditioned = conditioner.condition(&window, 1000.0);

        assert_eq!(conditioned.samples, vec![-1.0, 1.0, 0.0, 0.0]);
        assert_eq!(conditioned.mode, ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::BelowThreshold });
    }

    #[cfg(feature = "lowpass")]
    #[test]
    fn test_high_rate_filters_and_removes_dc() {
        let mut conditioner = SignalConditioner::new(ConditioningConfig::default());
        let window: Vec<f64> = (0..1000)
            .map(|i| 2.0 + (2.0 * PI * 50.0 * i as f64 / 2000.0).sin())
            .collect();
        let conditioned = conditioner.condition(&window, 2000.0);

        assert_eq!(conditioned.len(), window.len());
        assert_eq!(conditioned.mode, ConditioningMode::Filtered { cutoff_hz: 500.0 });
        assert!(mean(&conditioned.samples).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_lowpass_is_reported() {
        let config = ConditioningConfig { lowpass_enabled: false, ..ConditioningConfig::default() };
        let mut conditioner = SignalConditioner::new(config);
        assert!(!conditioner.lowpass_available());

        let conditioned = conditioner.condition(&[1.0; 300], 4000.0);
        assert_eq!(
            conditioned.mode,
            ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::LowpassUnavailable }
        );
        assert!(conditioned.samples.iter().all(|&x| x.abs() < 1e-12));
    }

    #[cfg(feature = "lowpass")]
    #[test]
    fn test_short_window_falls_back() {
        let mut conditioner = SignalConditioner::new(ConditioningConfig::default());
        let conditioned = conditioner.condition(&[1.0, 2.0, 3.0], 2000.0);

        assert_eq!(
            conditioned.mode,
            ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::WindowTooShort }
        );
        assert_eq!(conditioned.samples, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_window_stays_empty() {
        let mut conditioner = SignalConditioner::new(ConditioningConfig::default());
        assert!(conditioner.condition(&[], 500.0).is_empty());
    }
}
