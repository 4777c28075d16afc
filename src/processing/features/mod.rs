//! Vibration signal feature extraction
//!
//! Produces one [`FeatureSet`] per conditioned window:
//! - Time domain statistics (RMS, peak, crest factor, kurtosis, skewness)
//! - Frequency domain statistics (dominant frequency, harmonic-energy ratio)
//!
//! Empty or all-zero windows fail closed to [`FeatureSet::neutral`].

pub mod time_domain;
pub mod frequency;

use serde::{Deserialize, Serialize};
use crate::config::constants::features::{GAUSSIAN_KURTOSIS, NEUTRAL_HARMONIC_RATIO, NEUTRAL_SKEWNESS};
use crate::processing::conditioning::ConditionedWindow;

pub use time_domain::{TimeDomainExtractor, TimeDomainFeatures};
pub use frequency::{FrequencyDomainExtractor, FrequencyDomainFeatures};

/// Statistical and spectral features of one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub rms: f64,
    pub peak: f64,
    pub crest_factor: f64,
    pub kurtosis: f64,
    pub skewness: f64,
    pub dominant_frequency: f64,
    pub harmonic_ratio: f64,
}

impl FeatureSet {
    /// Features of a silent window: zero energy, Gaussian shape, no spectrum
    pub fn neutral() -> Self {
        Self {
            rms: 0.0,
            peak: 0.0,
            crest_factor: 0.0,
            kurtosis: GAUSSIAN_KURTOSIS,
            skewness: NEUTRAL_SKEWNESS,
            dominant_frequency: 0.0,
            harmonic_ratio: NEUTRAL_HARMONIC_RATIO,
        }
    }

    /// True when every feature is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.rms,
            self.peak,
            self.crest_factor,
            self.kurtosis,
            self.skewness,
            self.dominant_frequency,
            self.harmonic_ratio,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Main feature extractor that coordinates the time and frequency domains
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    time_domain: TimeDomainExtractor,
    frequency_domain: FrequencyDomainExtractor,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract features from a conditioned window
    pub fn extract(&mut self, window: &ConditionedWindow, sample_rate_hz: f64) -> FeatureSet {
        self.extract_samples(&window.samples, sample_rate_hz)
    }

    /// Extract features from raw samples
    pub fn extract_samples(&mut self, samples: &[f64], sample_rate_hz: f64) -> FeatureSet {
        if samples.iter().all(|&x| x == 0.0) {
            return FeatureSet::neutral();
        }

        let time = self.time_domain.extract(samples);
        let frequency = self.frequency_domain.extract(samples, sample_rate_hz);

        FeatureSet {
            rms: time.rms,
            peak: time.peak,
            crest_factor: time.crest_factor,
            kurtosis: time.kurtosis,
            skewness: time.skewness,
            dominant_frequency: frequency.dominant_frequency,
            harmonic_ratio: frequency.harmonic_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::conditioning::ConditioningMode;
    use crate::processing::conditioning::DcOnlyReason;

    #[test]
    fn test_empty_window_is_neutral() {
        let mut extractor = FeatureExtractor::new();
        assert_eq!(extractor.extract_samples(&[], 1000.0), FeatureSet::neutral());
    }

    #[test]
    fn test_all_zero_window_is_neutral() {
        let mut extractor = FeatureExtractor::new();
        let window = ConditionedWindow {
            samples: vec![0.0; 1000],
            mode: ConditioningMode::DcRemovedOnly { reason: DcOnlyReason::BelowThreshold },
        };
        let features = extractor.extract(&window, 1000.0);

        assert_eq!(features, FeatureSet::neutral());
        assert_eq!(features.kurtosis, 3.0);
        assert_eq!(features.skewness, 0.0);
    }

    #[test]
    fn test_short_window_skips_spectrum() {
        let mut extractor = FeatureExtractor::new();
        let features = extractor.extract_samples(&[1.0, -1.0, 2.0, -2.0, 0.5], 1000.0);

        assert!(features.rms > 0.0);
        assert_eq!(features.dominant_frequency, 0.0);
        assert_eq!(features.harmonic_ratio, 1.0);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut features = FeatureSet::neutral();
        assert!(features.is_finite());
        features.kurtosis = f64::NAN;
        assert!(!features.is_finite());
    }
}
