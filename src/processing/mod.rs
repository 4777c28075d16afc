// src/processing/mod.rs
//! Signal-health scoring pipeline

pub mod actuator;
pub mod conditioning;
pub mod features;
pub mod filters;
pub mod pipeline;
pub mod scoring;
pub mod trend;

pub use actuator::{decide, ForceDecision, ForceLevel, ForceLevelTable};
pub use conditioning::{ConditionedWindow, ConditioningMode, DcOnlyReason, SignalConditioner};
pub use features::{FeatureExtractor, FeatureSet};
pub use pipeline::*;
pub use scoring::{HealthAssessment, HealthBand, HealthScorer, ScoreLimits, SubScores};
pub use trend::{ScoreHistory, ScoreHistoryEntry, TrendEstimator, TrendLabel, TrendReport};
