//! Digital-twin signal source for a degrading rotating machine
//!
//! Used by the `avcs-monitor` binary, benchmarks and tests. Seeded runs are
//! fully deterministic.

pub mod signal_generator;

use serde::{Deserialize, Serialize};

pub use signal_generator::{AssetFrame, AssetSimulator};

/// Operating load applied during one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadProfile {
    #[default]
    Normal,
    High,
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub rpm: f64,
    pub sample_rate_hz: f64,
    /// Vibration samples per step
    pub window_len: usize,
    /// Thermal and acoustic samples per step
    pub aux_window_len: usize,
    pub noise_std: f64,
    pub initial_health: f64,
    pub health_floor: f64,
    pub base_degradation: f64,
    pub high_load_penalty: f64,
    /// Chance per step of a sudden fault
    pub random_fault_probability: f64,
    pub random_fault_drop: f64,
    pub baseline_temperature_c: f64,
    pub baseline_noise_db: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rpm: 2950.0,
            sample_rate_hz: 1000.0,
            window_len: 1000,
            aux_window_len: 32,
            noise_std: 0.05,
            initial_health: 1.0,
            health_floor: 0.1,
            base_degradation: 0.0001,
            high_load_penalty: 0.0002,
            random_fault_probability: 0.001,
            random_fault_drop: 0.1,
            baseline_temperature_c: 65.0,
            baseline_noise_db: 65.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Deterministic configuration with the given seed
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn fundamental_hz(&self) -> f64 {
        self.rpm / 60.0
    }
}
