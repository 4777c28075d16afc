// src/config/constants.rs
//! System-wide configuration constants

/// Sample buffer and history sizing
pub mod buffer {
    pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;
    pub const DEFAULT_HISTORY_LIMIT: usize = 1000;
    pub const MAX_BUFFER_CAPACITY: usize = 1 << 20;
    pub const MAX_HISTORY_LIMIT: usize = 1 << 20;
    pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 1000.0;
}

/// Anti-aliasing and DC-removal constants
pub mod conditioning {
    /// The low-pass stage only runs above this sample rate
    pub const DEFAULT_FILTER_THRESHOLD_HZ: f64 = 1000.0;
    pub const DEFAULT_FILTER_ORDER: usize = 4;
    pub const MIN_FILTER_ORDER: usize = 1;
    pub const MAX_FILTER_ORDER: usize = 8;
    pub const DEFAULT_MAX_CUTOFF_HZ: f64 = 500.0;
    /// Cutoff ceiling as a fraction of Nyquist
    pub const DEFAULT_NYQUIST_FRACTION: f64 = 0.8;
}

/// Feature extraction constants
pub mod features {
    /// Kurtosis and skewness need at least this many samples
    pub const MIN_MOMENT_SAMPLES: usize = 4;
    /// Frequency analysis needs at least this many samples
    pub const MIN_SPECTRAL_SAMPLES: usize = 256;
    /// Reference kurtosis of a Gaussian-shaped distribution
    pub const GAUSSIAN_KURTOSIS: f64 = 3.0;
    pub const NEUTRAL_SKEWNESS: f64 = 0.0;
    pub const NEUTRAL_HARMONIC_RATIO: f64 = 1.0;
    /// A window is flat when its variance is at most this fraction of its
    /// mean square, so the floor scales with the channel's units
    pub const DEGENERATE_VARIANCE_RATIO: f64 = 1e-20;
}

/// Health scoring constants
pub mod scoring {
    pub const RMS_WEIGHT: f64 = 0.40;
    pub const CREST_FACTOR_WEIGHT: f64 = 0.25;
    pub const KURTOSIS_WEIGHT: f64 = 0.15;
    pub const SKEWNESS_WEIGHT: f64 = 0.10;
    pub const FREQUENCY_WEIGHT: f64 = 0.10;

    /// Below this crest factor the signal scores as sinusoid-like
    pub const CREST_FACTOR_IDEAL: f64 = 3.0;
    /// Above this crest factor the signal scores as fully impulsive
    pub const CREST_FACTOR_SEVERE: f64 = 8.0;

    /// Scores below this raise the anomaly flag
    pub const ANOMALY_THRESHOLD: f64 = 0.7;

    pub const DEFAULT_CRITICAL_RMS_LIMIT: f64 = 4.0;
    pub const DEFAULT_CRITICAL_TEMPERATURE_C: f64 = 100.0;
    pub const DEFAULT_CRITICAL_NOISE_DB: f64 = 100.0;
}

/// Actuator force ladder constants
pub mod actuator {
    pub const CRITICAL_SCORE: f64 = 0.5;
    pub const WARNING_SCORE: f64 = 0.7;
    pub const NORMAL_SCORE: f64 = 0.9;

    pub const DEFAULT_STANDBY_FORCE_N: f64 = 500.0;
    pub const DEFAULT_NORMAL_FORCE_N: f64 = 1000.0;
    pub const DEFAULT_WARNING_FORCE_N: f64 = 4000.0;
    pub const DEFAULT_CRITICAL_FORCE_N: f64 = 8000.0;
}

/// Trend and remaining-life constants
pub mod trend {
    pub const DEFAULT_MIN_HISTORY: usize = 50;
    pub const DEFAULT_RECENT_WINDOW: usize = 10;
    pub const DEFAULT_SLOPE_THRESHOLD: f64 = 0.01;
    /// K in remaining ≈ K × mean_score²
    pub const DEFAULT_RUL_SCALE_CYCLES: f64 = 10_000.0;
}

/// Environment and file locations
pub mod paths {
    pub const ENV_PREFIX: &str = "AVCS";
    pub const ENV_SEPARATOR: &str = "__";
    pub const DEFAULT_CONFIG_FILE: &str = "avcs.toml";
}
