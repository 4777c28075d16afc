//! Time domain statistics for vibration windows

use crate::config::constants::features::{
    DEGENERATE_VARIANCE_RATIO, GAUSSIAN_KURTOSIS, MIN_MOMENT_SAMPLES, NEUTRAL_SKEWNESS,
};

/// Time domain features of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDomainFeatures {
    pub rms: f64,
    pub peak: f64,
    pub crest_factor: f64,
    pub kurtosis: f64,
    pub skewness: f64,
}

/// Time domain feature extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDomainExtractor;

impl TimeDomainExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all time domain features; `data` must not be empty
    pub fn extract(&self, data: &[f64]) -> TimeDomainFeatures {
        let rms = self.calculate_rms(data);
        let peak = self.calculate_peak(data);
        let (kurtosis, skewness) = self.calculate_moments(data, rms);

        TimeDomainFeatures {
            rms,
            peak,
            crest_factor: if rms > 0.0 { peak / rms } else { 0.0 },
            kurtosis,
            skewness,
        }
    }

    fn calculate_rms(&self, data: &[f64]) -> f64 {
        let sum_squares: f64 = data.iter().map(|&x| x * x).sum();
        (sum_squares / data.len() as f64).sqrt()
    }

    fn calculate_peak(&self, data: &[f64]) -> f64 {
        data.iter().fold(0.0_f64, |acc, &x| acc.max(x.abs()))
    }

    /// Population kurtosis and skewness, neutral for short or flat windows
    fn calculate_moments(&self, data: &[f64], rms: f64) -> (f64, f64) {
        if data.len() < MIN_MOMENT_SAMPLES {
            return (GAUSSIAN_KURTOSIS, NEUTRAL_SKEWNESS);
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let (m2, m3, m4) = data.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &x| {
            let d = x - mean;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        });
        let variance = m2 / n;
        if variance <= DEGENERATE_VARIANCE_RATIO * rms * rms {
            return (GAUSSIAN_KURTOSIS, NEUTRAL_SKEWNESS);
        }

        let std_dev = variance.sqrt();
        let kurtosis = (m4 / n) / (variance * variance);
        let skewness = (m3 / n) / (variance * std_dev);
        (kurtosis, skewness)
    }
}
