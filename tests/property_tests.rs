// ================================================================================
// Property-based tests for scoring, decisions and buffering
// File: tests/property_tests.rs
// ================================================================================

use proptest::prelude::*;

use avcs_core::acquisition::SampleBuffer;
use avcs_core::processing::features::FeatureSet;
use avcs_core::processing::{decide, ForceLevelTable, HealthScorer, ScoreLimits};
use avcs_core::processing::{initialize, run_cycle};

fn finite_features() -> impl Strategy<Value = FeatureSet> {
    (
        0.0..100.0f64,
        0.0..100.0f64,
        0.0..50.0f64,
        -10.0..200.0f64,
        -50.0..50.0f64,
        0.0..10_000.0f64,
        0.0..100.0f64,
    )
        .prop_map(|(rms, peak, crest_factor, kurtosis, skewness, dominant_frequency, harmonic_ratio)| FeatureSet {
            rms,
            peak,
            crest_factor,
            kurtosis,
            skewness,
            dominant_frequency,
            harmonic_ratio,
        })
}

/// Magnitudes at the edges of the f64 range, plus ordinary values
fn extreme_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::MAX),
        Just(-f64::MAX),
        Just(1e300),
        Just(-1e300),
        Just(f64::MIN_POSITIVE),
        Just(-f64::MIN_POSITIVE),
        Just(0.0),
        -1.0e6..1.0e6f64,
    ]
}

fn extreme_features() -> impl Strategy<Value = FeatureSet> {
    prop::array::uniform7(extreme_value()).prop_map(|v| FeatureSet {
        rms: v[0],
        peak: v[1],
        crest_factor: v[2],
        kurtosis: v[3],
        skewness: v[4],
        dominant_frequency: v[5],
        harmonic_ratio: v[6],
    })
}

fn extreme_limit() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(1e-300),
        Just(f64::MIN_POSITIVE),
        Just(4.0),
        Just(f64::MAX),
        1e-300..1e300f64,
    ]
}

proptest! {
    #[test]
    fn score_is_always_bounded(features in finite_features(), limit in 0.01..1000.0f64) {
        let assessment = HealthScorer::new().score(&features, &ScoreLimits::new(limit));
        prop_assert!((0.0..=1.0).contains(&assessment.health_score));
        prop_assert!(assessment.data_valid);
        prop_assert_eq!(assessment.anomaly_flag, assessment.health_score < 0.7);
    }

    #[test]
    fn score_is_bounded_for_extreme_features(features in extreme_features(), limit in extreme_limit()) {
        let assessment = HealthScorer::new().score(&features, &ScoreLimits::new(limit));

        prop_assert!((0.0..=1.0).contains(&assessment.health_score));
        if assessment.data_valid {
            prop_assert_eq!(assessment.anomaly_flag, assessment.health_score < 0.7);
        } else {
            prop_assert_eq!(assessment.health_score, 1.0);
            prop_assert!(!assessment.anomaly_flag);
        }
    }

    #[test]
    fn force_never_drops_as_score_falls(a in 0.0..=1.0f64, b in 0.0..=1.0f64, anomaly in any::<bool>()) {
        let table = ForceLevelTable::default();
        let (high, low) = if a >= b { (a, b) } else { (b, a) };

        let at_high = decide(high, anomaly, &table);
        let at_low = decide(low, anomaly, &table);
        prop_assert!(at_low.level >= at_high.level);
        prop_assert!(at_low.force_newtons >= at_high.force_newtons);
    }

    #[test]
    fn anomaly_never_lowers_force(score in 0.0..=1.0f64) {
        let table = ForceLevelTable::default();
        prop_assert!(decide(score, true, &table).level >= decide(score, false, &table).level);
    }

    #[test]
    fn buffer_keeps_most_recent_samples(
        capacity in 1usize..64,
        windows in prop::collection::vec(prop::collection::vec(-10.0..10.0f64, 0..100), 1..10),
    ) {
        let mut buffer = SampleBuffer::new(capacity);
        let mut all = Vec::new();
        for window in &windows {
            buffer.push(window);
            all.extend_from_slice(window);
        }

        let expected_len = all.len().min(capacity);
        prop_assert_eq!(buffer.len(), expected_len);
        prop_assert_eq!(buffer.snapshot(), all[all.len() - expected_len..].to_vec());
    }

    #[test]
    fn history_is_bounded(limit in 1usize..20, cycles in 1usize..60) {
        let mut handle = initialize(32, limit, ForceLevelTable::default(), ScoreLimits::default()).unwrap();
        for _ in 0..cycles {
            run_cycle(&mut handle, &[0.2, -0.1, 0.3, -0.4], 1000.0);
        }

        let history = handle.get_history(usize::MAX);
        prop_assert_eq!(history.len(), cycles.min(limit));
        prop_assert_eq!(history[0].cycle_index as usize, cycles - history.len() + 1);
    }

    #[test]
    fn arbitrary_windows_never_escape_bounds(
        window in prop::collection::vec(-1.0e3..1.0e3f64, 0..600),
        sample_rate in prop_oneof![Just(500.0f64), Just(1000.0), Just(2000.0), Just(8000.0)],
    ) {
        let mut handle = initialize(1000, 10, ForceLevelTable::default(), ScoreLimits::default()).unwrap();
        let result = run_cycle(&mut handle, &window, sample_rate);

        prop_assert!((0.0..=1.0).contains(&result.health_score));
        prop_assert_eq!(result.data_valid, !window.is_empty());
    }
}
