//! Frequency domain features using the FFT

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;
use ndarray::Array1;
use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use crate::config::constants::features::{MIN_SPECTRAL_SAMPLES, NEUTRAL_HARMONIC_RATIO};

/// Frequency domain features of one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyDomainFeatures {
    pub dominant_frequency: f64,
    pub harmonic_ratio: f64,
}

impl FrequencyDomainFeatures {
    /// Values reported when no spectrum is computed
    pub fn neutral() -> Self {
        Self {
            dominant_frequency: 0.0,
            harmonic_ratio: NEUTRAL_HARMONIC_RATIO,
        }
    }
}

/// Frequency domain feature extractor
///
/// Applies a Hann window and a full-length FFT (no zero padding), so bin `k`
/// sits at `k * fs / N`. Plans and the window are cached per length.
pub struct FrequencyDomainExtractor {
    plan: Option<Arc<dyn Fft<f64>>>,
    window_function: Array1<f64>,
}

impl fmt::Debug for FrequencyDomainExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyDomainExtractor")
            .field("fft_size", &self.window_function.len())
            .finish()
    }
}

impl Clone for FrequencyDomainExtractor {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for FrequencyDomainExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyDomainExtractor {
    pub fn new() -> Self {
        Self {
            plan: None,
            window_function: Array1::zeros(0),
        }
    }

    /// Extract dominant frequency and harmonic ratio
    ///
    /// Windows shorter than the spectral minimum yield neutral values.
    pub fn extract(&mut self, data: &[f64], sample_rate_hz: f64) -> FrequencyDomainFeatures {
        if data.len() < MIN_SPECTRAL_SAMPLES {
            return FrequencyDomainFeatures::neutral();
        }

        let magnitudes = self.magnitude_spectrum(data);

        let (dominant_bin, dominant_magnitude) = magnitudes
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0_f64), |best, (bin, magnitude)| {
                if magnitude > best.1 { (bin, magnitude) } else { best }
            });

        FrequencyDomainFeatures {
            dominant_frequency: dominant_bin as f64 * sample_rate_hz / data.len() as f64,
            harmonic_ratio: harmonic_ratio(&magnitudes, dominant_bin, dominant_magnitude),
        }
    }

    /// Magnitudes of bins 0..=N/2
    pub fn magnitude_spectrum(&mut self, data: &[f64]) -> Array1<f64> {
        let n = data.len();
        if self.window_function.len() != n {
            self.window_function = create_hann_window(n);
            self.plan = Some(FftPlanner::new().plan_fft_forward(n));
        }

        let windowed = Array1::from_iter(data.iter().copied()) * &self.window_function;
        let mut buffer: Vec<Complex64> = windowed.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        if let Some(plan) = &self.plan {
            plan.process(&mut buffer);
        }

        buffer.iter().take(n / 2 + 1).map(|c| c.norm()).collect()
    }
}

/// Mean magnitude of the in-range 2nd and 3rd harmonic bins over the dominant magnitude
fn harmonic_ratio(magnitudes: &Array1<f64>, dominant_bin: usize, dominant_magnitude: f64) -> f64 {
    if dominant_bin == 0 || dominant_magnitude <= 0.0 {
        return NEUTRAL_HARMONIC_RATIO;
    }

    let harmonics: Vec<f64> = [2 * dominant_bin, 3 * dominant_bin]
        .iter()
        .filter_map(|&bin| magnitudes.get(bin).copied())
        .collect();
    if harmonics.is_empty() {
        return NEUTRAL_HARMONIC_RATIO;
    }

    let mean = harmonics.iter().sum::<f64>() / harmonics.len() as f64;
    mean / dominant_magnitude
}

/// Symmetric Hann window of length `n`
fn create_hann_window(n: usize) -> Array1<f64> {
    if n < 2 {
        return Array1::ones(n);
    }
    Array1::from_shape_fn(n, |i| 0.5 * (1.0 - (2.0 * PI * i as f64 / (n - 1) as f64).cos()))
}
