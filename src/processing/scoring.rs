// src/processing/scoring.rs
//! Composite health scoring

use serde::{Deserialize, Serialize};
use crate::config::constants::scoring::*;
use crate::config::constants::features::GAUSSIAN_KURTOSIS;
use crate::processing::features::FeatureSet;
use crate::station::ChannelKind;

/// Per-channel limits the score is measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreLimits {
    /// RMS at which the RMS sub-score reaches zero, in channel units
    #[serde(default = "crate::config::defaults::critical_rms_limit")]
    pub critical_rms_limit: f64,
}

impl Default for ScoreLimits {
    fn default() -> Self {
        Self { critical_rms_limit: DEFAULT_CRITICAL_RMS_LIMIT }
    }
}

impl ScoreLimits {
    pub fn new(critical_rms_limit: f64) -> Self {
        Self { critical_rms_limit }
    }

    /// Default limits for a channel type
    pub fn for_channel(kind: ChannelKind) -> Self {
        let critical_rms_limit = match kind {
            ChannelKind::Vibration => DEFAULT_CRITICAL_RMS_LIMIT,
            ChannelKind::Thermal => DEFAULT_CRITICAL_TEMPERATURE_C,
            ChannelKind::Acoustic => DEFAULT_CRITICAL_NOISE_DB,
        };
        Self { critical_rms_limit }
    }

    pub fn check(&self) -> Result<(), String> {
        if self.critical_rms_limit.is_finite() && self.critical_rms_limit > 0.0 {
            Ok(())
        } else {
            Err("critical RMS limit must be a finite positive number".to_string())
        }
    }
}

/// Qualitative health band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            HealthBand::Excellent
        } else if score >= 0.7 {
            HealthBand::Good
        } else if score >= 0.5 {
            HealthBand::Fair
        } else {
            HealthBand::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthBand::Excellent => "excellent",
            HealthBand::Good => "good",
            HealthBand::Fair => "fair",
            HealthBand::Poor => "poor",
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five weighted components of a health score, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub rms: f64,
    pub crest_factor: f64,
    pub kurtosis: f64,
    pub skewness: f64,
    pub frequency: f64,
}

impl SubScores {
    /// Sub-scores of a perfectly quiet window
    pub fn perfect() -> Self {
        Self { rms: 1.0, crest_factor: 1.0, kurtosis: 1.0, skewness: 1.0, frequency: 1.0 }
    }

    pub fn weighted_sum(&self) -> f64 {
        RMS_WEIGHT * self.rms
            + CREST_FACTOR_WEIGHT * self.crest_factor
            + KURTOSIS_WEIGHT * self.kurtosis
            + SKEWNESS_WEIGHT * self.skewness
            + FREQUENCY_WEIGHT * self.frequency
    }

    fn is_finite(&self) -> bool {
        [self.rms, self.crest_factor, self.kurtosis, self.skewness, self.frequency]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Outcome of scoring one feature set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// Composite score in [0, 1]; 1.0 is healthy
    pub health_score: f64,
    pub anomaly_flag: bool,
    /// False when the features could not be scored and defaults were used
    pub data_valid: bool,
    pub sub_scores: SubScores,
    pub band: HealthBand,
}

impl HealthAssessment {
    /// Fail-safe result for unscorable input
    pub fn invalid() -> Self {
        Self {
            health_score: 1.0,
            anomaly_flag: false,
            data_valid: false,
            sub_scores: SubScores::perfect(),
            band: HealthBand::Excellent,
        }
    }
}

/// Weighted health scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScorer;

impl HealthScorer {
    pub fn new() -> Self {
        Self
    }

    /// Combine features into a clamped score and anomaly flag
    pub fn score(&self, features: &FeatureSet, limits: &ScoreLimits) -> HealthAssessment {
        if !features.is_finite() || limits.check().is_err() {
            return HealthAssessment::invalid();
        }

        let sub_scores = SubScores {
            rms: rms_score(features.rms, limits.critical_rms_limit),
            crest_factor: crest_factor_score(features.crest_factor),
            kurtosis: 1.0 / (1.0 + (features.kurtosis - GAUSSIAN_KURTOSIS).abs() / 2.0),
            skewness: 1.0 / (1.0 + features.skewness.abs()),
            frequency: 1.0 / (1.0 + features.harmonic_ratio.abs()),
        };
        if !sub_scores.is_finite() {
            return HealthAssessment::invalid();
        }

        let health_score = sub_scores.weighted_sum().clamp(0.0, 1.0);
        HealthAssessment {
            health_score,
            anomaly_flag: health_score < ANOMALY_THRESHOLD,
            data_valid: true,
            sub_scores,
            band: HealthBand::from_score(health_score),
        }
    }
}

fn rms_score(rms: f64, limit: f64) -> f64 {
    (1.0 - rms / limit).max(0.0)
}

/// 1 below the ideal crest factor, 0 above the severe one, linear in between
fn crest_factor_score(crest_factor: f64) -> f64 {
    if crest_factor < CREST_FACTOR_IDEAL {
        1.0
    } else if crest_factor > CREST_FACTOR_SEVERE {
        0.0
    } else {
        1.0 - (crest_factor - CREST_FACTOR_IDEAL) / (CREST_FACTOR_SEVERE - CREST_FACTOR_IDEAL)
    }
}
