//! AVCS-Core: signal-health scoring for active vibration control
//!
//! This library turns a rolling buffer of vibration, thermal or acoustic
//! readings into a bounded health score, an actuator force command and a
//! remaining-useful-life trend. It features:
//!
//! - Fixed-capacity sample buffering per channel
//! - Zero-phase Butterworth anti-aliasing and DC removal
//! - Time and frequency domain feature extraction
//! - Weighted composite health scoring with anomaly detection
//! - Discrete force-level decisions and history-based trend estimation
//! - Maintenance advice, multi-channel stations and a digital-twin simulator
//!
//! # Quick Start
//!
//! ```rust
//! use avcs_core::processing::{ForceLevelTable, PipelineHandle, ScoreLimits};
//!
//! let mut handle = PipelineHandle::initialize(
//!     1000,
//!     1000,
//!     ForceLevelTable::default(),
//!     ScoreLimits::default(),
//! )?;
//!
//! let window: Vec<f64> = (0..1000)
//!     .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 50.0 * i as f64 / 1000.0).sin())
//!     .collect();
//! let result = handle.run_cycle(&window, 1000.0);
//! println!("health {:.3}, force {} N", result.health_score, result.force_command);
//! # Ok::<(), avcs_core::AvcsError>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod processing;
pub mod simulation;
pub mod station;
pub mod utils;

// Re-export commonly used types for convenience
pub use acquisition::SampleBuffer;
pub use config::{ConfigLoader, MonitorConfig};
pub use error::{AvcsError, AvcsResult};
pub use maintenance::{MaintenanceAdvisor, MaintenanceReport};
pub use processing::{
    CycleResult, Diagnostics, ForceLevel, ForceLevelTable, PipelineHandle, ScoreHistoryEntry,
    ScoreLimits, TrendLabel,
};
pub use station::{ChannelKind, MonitoringStation};
pub use utils::time::{current_timestamp_nanos, TimeProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Signal-health scoring pipeline for active vibration control".to_string(),
        lowpass_available: cfg!(feature = "lowpass"),
    }
}

/// Library version information
#[derive(Debug, Clone, serde::Serialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Built with the Butterworth conditioning stage
    pub lowpass_available: bool,
}
