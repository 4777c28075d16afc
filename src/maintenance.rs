//! Maintenance advice and failure-mode prediction from a health score

use serde::{Deserialize, Serialize};

/// How soon maintenance is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn from_health(health: f64) -> Self {
        if health < 0.3 {
            Urgency::High
        } else if health < 0.6 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    /// Severity of a failure prediction with the given probability
    fn from_probability(probability: f64) -> Self {
        if probability > 0.5 {
            Urgency::High
        } else if probability > 0.3 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

/// Mechanical failure modes of a rotating machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    BearingWear,
    Imbalance,
    Misalignment,
    Cavitation,
}

impl FailureMode {
    pub const ALL: [FailureMode; 4] = [
        FailureMode::BearingWear,
        FailureMode::Imbalance,
        FailureMode::Misalignment,
        FailureMode::Cavitation,
    ];

    /// Probability of this mode on a fully worn machine
    pub fn base_probability(&self) -> f64 {
        match self {
            FailureMode::BearingWear => 0.3,
            FailureMode::Imbalance => 0.2,
            FailureMode::Misalignment => 0.25,
            FailureMode::Cavitation => 0.15,
        }
    }
}

/// One likely failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePrediction {
    pub failure_mode: FailureMode,
    pub probability: f64,
    pub expected_timeframe_hours: u64,
    pub severity: Urgency,
}

/// Advice for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub health: f64,
    pub urgency: Urgency,
    pub recommendations: Vec<String>,
    pub next_maintenance_days: u32,
    pub remaining_useful_life_hours: u64,
    pub predicted_failures: Vec<FailurePrediction>,
}

/// Recommendations, in order, with the health below which each applies
const RECOMMENDATIONS: [(f64, &str); 4] = [
    (0.8, "Check bearing lubrication"),
    (0.6, "Perform rotor balancing"),
    (0.4, "Check shaft alignment"),
    (0.3, "SCHEDULE MAJOR OVERHAUL"),
];

/// Predictions below this probability are not reported
const MIN_REPORTED_PROBABILITY: f64 = 0.1;
const MAINTENANCE_HORIZON_DAYS: f64 = 30.0;
const RUL_SCALE_HOURS: f64 = 10_000.0;

/// Stateless advisor mapping health in [0, 1] to a [`MaintenanceReport`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceAdvisor;

impl MaintenanceAdvisor {
    pub fn new() -> Self {
        Self
    }

    pub fn advise(&self, health: f64) -> MaintenanceReport {
        let health = if health.is_finite() { health.clamp(0.0, 1.0) } else { 1.0 };

        MaintenanceReport {
            health,
            urgency: Urgency::from_health(health),
            recommendations: RECOMMENDATIONS
                .iter()
                .filter(|(threshold, _)| health < *threshold)
                .map(|(_, text)| text.to_string())
                .collect(),
            next_maintenance_days: ((1.0 - health) * MAINTENANCE_HORIZON_DAYS) as u32,
            remaining_useful_life_hours: (health * RUL_SCALE_HOURS) as u64,
            predicted_failures: self.predict_failures(health),
        }
    }

    pub fn predict_failures(&self, health: f64) -> Vec<FailurePrediction> {
        FailureMode::ALL
            .iter()
            .filter_map(|&mode| {
                let probability = mode.base_probability() * (1.0 - health);
                (probability > MIN_REPORTED_PROBABILITY).then(|| FailurePrediction {
                    failure_mode: mode,
                    probability,
                    expected_timeframe_hours: (1.0 / probability) as u64,
                    severity: Urgency::from_probability(probability),
                })
            })
            .collect()
    }
}
