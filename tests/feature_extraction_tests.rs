// ================================================================================
// Integration tests for conditioning and feature extraction
// File: tests/feature_extraction_tests.rs
// ================================================================================

use std::f64::consts::PI;

use avcs_core::config::ConditioningConfig;
use avcs_core::processing::conditioning::{ConditioningMode, SignalConditioner};
use avcs_core::processing::features::{FeatureExtractor, FeatureSet};
use avcs_core::simulation::{AssetSimulator, LoadProfile, SimulationConfig};

fn sine(freq: f64, amplitude: f64, sample_rate: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate).sin())
        .collect()
}

#[test]
fn test_sine_statistics() {
    let mut extractor = FeatureExtractor::new();
    let features = extractor.extract_samples(&sine(50.0, 1.0, 1000.0, 1000), 1000.0);

    assert!((features.rms - 1.0 / 2f64.sqrt()).abs() < 1e-9);
    assert!((features.peak - 1.0).abs() < 1e-9);
    assert!((features.crest_factor - 2f64.sqrt()).abs() < 1e-6);
    assert!((features.kurtosis - 1.5).abs() < 1e-6);
    assert!(features.skewness.abs() < 1e-9);
    assert!((features.dominant_frequency - 50.0).abs() < 1e-9);
}

#[cfg(feature = "lowpass")]
#[test]
fn test_conditioning_removes_out_of_band_tone() {
    // 100 Hz signal, 1500 Hz interference above the 500 Hz cutoff
    let fs = 4000.0;
    let signal = sine(100.0, 1.0, fs, 4000);
    let noisy: Vec<f64> = signal
        .iter()
        .zip(sine(1500.0, 0.5, fs, 4000))
        .map(|(s, n)| s + n + 3.0)
        .collect();

    let mut conditioner = SignalConditioner::new(ConditioningConfig::default());
    let conditioned = conditioner.condition(&noisy, fs);
    assert_eq!(conditioned.mode, ConditioningMode::Filtered { cutoff_hz: 500.0 });

    let mut extractor = FeatureExtractor::new();
    let features = extractor.extract(&conditioned, fs);
    assert!((features.dominant_frequency - 100.0).abs() < 1e-9);
    assert!((features.rms - 1.0 / 2f64.sqrt()).abs() < 0.01);
}

#[test]
fn test_short_windows_skip_frequency_analysis() {
    let mut extractor = FeatureExtractor::new();
    let features = extractor.extract_samples(&sine(50.0, 1.0, 1000.0, 255), 1000.0);

    assert_eq!(features.dominant_frequency, 0.0);
    assert_eq!(features.harmonic_ratio, 1.0);
    assert!(features.rms > 0.5);
}

#[test]
fn test_neutral_feature_set() {
    let neutral = FeatureSet::neutral();
    assert_eq!(neutral.rms, 0.0);
    assert_eq!(neutral.crest_factor, 0.0);
    assert_eq!(neutral.kurtosis, 3.0);
    assert_eq!(neutral.skewness, 0.0);
    assert_eq!(neutral.harmonic_ratio, 1.0);
}

#[test]
fn test_simulated_machine_fundamental() {
    let config = SimulationConfig { random_fault_probability: 0.0, ..SimulationConfig::seeded(11) };
    let fundamental = config.fundamental_hz();
    let mut simulator = AssetSimulator::new(config).unwrap();
    let frame = simulator.step(LoadProfile::Normal);

    let mut extractor = FeatureExtractor::new();
    let features = extractor.extract_samples(&frame.vibration, frame.sample_rate_hz);

    // 1 Hz bins: the strongest bin sits within one bin of rpm / 60
    assert!((features.dominant_frequency - fundamental).abs() <= 1.0);
    assert!(features.harmonic_ratio > 0.1 && features.harmonic_ratio < 0.5);
}
