//! Vibration, thermal and acoustic window generation
//! Location: src/simulation/signal_generator.rs

use std::f64::consts::PI;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;
use super::{LoadProfile, SimulationConfig};
use crate::error::{AvcsError, AvcsResult};

/// Bearing defect tones, as multiples of the fundamental
const BEARING_HARMONICS: [f64; 3] = [3.1, 4.8, 2.0];

/// Output of one simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFrame {
    pub vibration: Vec<f64>,
    /// Bearing and casing temperatures, °C
    pub thermal: Vec<f64>,
    /// Sound pressure readings, dB
    pub acoustic: Vec<f64>,
    /// Ground-truth health after this step
    pub health: f64,
    pub operating_hours: u64,
    pub sample_rate_hz: f64,
}

/// Slowly degrading rotating machine
pub struct AssetSimulator {
    config: SimulationConfig,
    rng: StdRng,
    vibration_noise: Normal<f64>,
    thermal_noise: Normal<f64>,
    acoustic_noise: Normal<f64>,
    health: f64,
    operating_hours: u64,
}

impl std::fmt::Debug for AssetSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetSimulator")
            .field("health", &self.health)
            .field("operating_hours", &self.operating_hours)
            .finish()
    }
}

impl AssetSimulator {
    pub fn new(config: SimulationConfig) -> AvcsResult<Self> {
        let normal = |std_dev: f64, name: &str| {
            Normal::new(0.0, std_dev).map_err(|e| {
                AvcsError::configuration(
                    "asset_simulator",
                    format!("{}: {}", name, e),
                    crate::error_context!("asset_simulator", "new"),
                )
            })
        };
        if !(config.sample_rate_hz.is_finite() && config.sample_rate_hz > 0.0) {
            return Err(AvcsError::configuration(
                "asset_simulator",
                format!("sample rate must be positive, got {}", config.sample_rate_hz),
                crate::error_context!("asset_simulator", "new"),
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            vibration_noise: normal(config.noise_std, "noise_std")?,
            thermal_noise: normal(2.0, "thermal noise")?,
            acoustic_noise: normal(2.0, "acoustic noise")?,
            health: config.initial_health.clamp(config.health_floor, 1.0),
            operating_hours: 0,
            rng,
            config,
        })
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    /// Force the ground-truth health, e.g. to start from a worn state
    pub fn set_health(&mut self, health: f64) {
        self.health = health.clamp(self.config.health_floor, 1.0);
    }

    pub fn operating_hours(&self) -> u64 {
        self.operating_hours
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Advance one operating hour and generate the windows for it
    pub fn step(&mut self, load: LoadProfile) -> AssetFrame {
        self.operating_hours += 1;
        self.degrade(load);

        AssetFrame {
            vibration: self.vibration_window(),
            thermal: self.thermal_window(),
            acoustic: self.acoustic_window(),
            health: self.health,
            operating_hours: self.operating_hours,
            sample_rate_hz: self.config.sample_rate_hz,
        }
    }

    fn degrade(&mut self, load: LoadProfile) {
        if self.rng.gen::<f64>() < self.config.random_fault_probability {
            self.health -= self.config.random_fault_drop;
            debug!(hours = self.operating_hours, health = self.health, "sudden fault injected");
        }

        let penalty = match load {
            LoadProfile::Normal => 0.0,
            LoadProfile::High => self.config.high_load_penalty,
        };
        self.health = (self.health - self.config.base_degradation - penalty).max(self.config.health_floor);
    }

    /// Fundamental with 2× and 3× harmonics, fault tones and Gaussian noise
    fn vibration_window(&mut self) -> Vec<f64> {
        let f0 = self.config.fundamental_hz();
        let fs = self.config.sample_rate_hz;
        let h = self.health;

        let mut components: Vec<(f64, f64)> = vec![(1.0, f0), (0.3, 2.0 * f0), (0.1, 3.0 * f0)];
        if h < 0.8 {
            let severity = 1.0 - h;
            components.extend(BEARING_HARMONICS.iter().map(|m| (0.1 * severity, m * f0)));
        }
        if h < 0.6 {
            components.push((0.5 * (0.8 - h) * 2.0, f0));
        }
        if h < 0.4 {
            components.push((0.3 * (0.6 - h) * 3.0, 2.0 * f0));
        }

        (0..self.config.window_len)
            .map(|i| {
                let t = i as f64 / fs;
                let clean: f64 = components
                    .iter()
                    .map(|(amplitude, freq)| amplitude * (2.0 * PI * freq * t).sin())
                    .sum();
                clean + self.vibration_noise.sample(&mut self.rng)
            })
            .collect()
    }

    /// Temperatures rise 20 °C from new to fully worn
    fn thermal_window(&mut self) -> Vec<f64> {
        let base = self.config.baseline_temperature_c + (1.0 - self.health) * 20.0;
        (0..self.config.aux_window_len)
            .map(|_| base + self.thermal_noise.sample(&mut self.rng))
            .collect()
    }

    /// Noise rises 25 dB from new to fully worn, plus 10 dB once below half health
    fn acoustic_window(&mut self) -> Vec<f64> {
        let mut base = self.config.baseline_noise_db + (1.0 - self.health) * 25.0;
        if self.health < 0.5 {
            base += 10.0;
        }
        (0..self.config.aux_window_len)
            .map(|_| base + self.acoustic_noise.sample(&mut self.rng))
            .collect()
    }
}
