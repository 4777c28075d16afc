// src/processing/actuator.rs
//! Health score to actuator force mapping

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::config::constants::actuator::*;
use crate::error::{AvcsError, AvcsResult};

/// Discrete actuator force levels, ordered from least to most force
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceLevel {
    Standby,
    Normal,
    Warning,
    Critical,
}

impl ForceLevel {
    pub const ALL: [ForceLevel; 4] = [
        ForceLevel::Standby,
        ForceLevel::Normal,
        ForceLevel::Warning,
        ForceLevel::Critical,
    ];

    /// Key used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            ForceLevel::Standby => "standby",
            ForceLevel::Normal => "normal",
            ForceLevel::Warning => "warning",
            ForceLevel::Critical => "critical",
        }
    }

    pub fn default_force(&self) -> f64 {
        match self {
            ForceLevel::Standby => DEFAULT_STANDBY_FORCE_N,
            ForceLevel::Normal => DEFAULT_NORMAL_FORCE_N,
            ForceLevel::Warning => DEFAULT_WARNING_FORCE_N,
            ForceLevel::Critical => DEFAULT_CRITICAL_FORCE_N,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for ForceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated force magnitudes in Newtons, one per level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForceLevelTable {
    forces: [f64; 4],
}

impl Default for ForceLevelTable {
    fn default() -> Self {
        Self {
            forces: ForceLevel::ALL.map(|level| level.default_force()),
        }
    }
}

impl ForceLevelTable {
    /// Build from magnitudes ordered standby, normal, warning, critical
    pub fn new(forces: [f64; 4]) -> AvcsResult<Self> {
        for (level, force) in ForceLevel::ALL.iter().zip(forces.iter()) {
            if !force.is_finite() || *force < 0.0 {
                return Err(AvcsError::configuration(
                    "force_level_table",
                    format!("force for '{}' must be finite and non-negative, got {}", level, force),
                    crate::error_context!("force_level_table", "new"),
                ));
            }
        }
        if let Some(pair) = forces.windows(2).position(|w| w[1] < w[0]) {
            return Err(AvcsError::configuration(
                "force_level_table",
                format!(
                    "force for '{}' ({} N) is below '{}' ({} N)",
                    ForceLevel::ALL[pair + 1],
                    forces[pair + 1],
                    ForceLevel::ALL[pair],
                    forces[pair]
                ),
                crate::error_context!("force_level_table", "new"),
            ));
        }
        Ok(Self { forces })
    }

    /// Build from a name → Newtons map; every level must be present
    pub fn from_levels(levels: &BTreeMap<String, f64>) -> AvcsResult<Self> {
        let mut forces = [0.0; 4];
        for level in ForceLevel::ALL {
            forces[level.index()] = *levels.get(level.name()).ok_or_else(|| {
                AvcsError::configuration(
                    "force_level_table",
                    format!("missing force level '{}'", level),
                    crate::error_context!("force_level_table", "from_levels"),
                )
            })?;
        }
        if let Some(unknown) = levels.keys().find(|k| !ForceLevel::ALL.iter().any(|l| l.name() == k.as_str())) {
            return Err(AvcsError::configuration(
                "force_level_table",
                format!("unknown force level '{}'", unknown),
                crate::error_context!("force_level_table", "from_levels"),
            ));
        }
        Self::new(forces)
    }

    pub fn force(&self, level: ForceLevel) -> f64 {
        self.forces[level.index()]
    }

    pub fn as_map(&self) -> BTreeMap<String, f64> {
        ForceLevel::ALL
            .iter()
            .map(|level| (level.name().to_string(), self.force(*level)))
            .collect()
    }
}

/// Chosen level and its magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceDecision {
    pub level: ForceLevel,
    pub force_newtons: f64,
}

/// Level for a score, checked top-down from the most severe
pub fn force_level_for(health_score: f64, anomaly_flag: bool) -> ForceLevel {
    if anomaly_flag || health_score < CRITICAL_SCORE {
        ForceLevel::Critical
    } else if health_score < WARNING_SCORE {
        ForceLevel::Warning
    } else if health_score < NORMAL_SCORE {
        ForceLevel::Normal
    } else {
        ForceLevel::Standby
    }
}

/// Map a health score and anomaly flag to a force command
pub fn decide(health_score: f64, anomaly_flag: bool, table: &ForceLevelTable) -> ForceDecision {
    let level = force_level_for(health_score, anomaly_flag);
    ForceDecision {
        level,
        force_newtons: table.force(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_ladder() {
        let table = ForceLevelTable::default();
        assert_eq!(decide(0.95, false, &table).level, ForceLevel::Standby);
        assert_eq!(decide(0.9, false, &table).level, ForceLevel::Standby);
        assert_eq!(decide(0.89, false, &table).level, ForceLevel::Normal);
        assert_eq!(decide(0.69, false, &table).level, ForceLevel::Warning);
        assert_eq!(decide(0.49, false, &table).level, ForceLevel::Critical);
        assert_eq!(decide(0.49, false, &table).force_newtons, 8000.0);
    }

    #[test]
    fn test_anomaly_forces_critical() {
        let decision = decide(0.99, true, &ForceLevelTable::default());
        assert_eq!(decision.level, ForceLevel::Critical);
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(ForceLevel::Standby < ForceLevel::Normal);
        assert!(ForceLevel::Warning < ForceLevel::Critical);
    }

    #[test]
    fn test_decreasing_forces_rejected() {
        let err = ForceLevelTable::new([500.0, 1000.0, 900.0, 8000.0]).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("warning"));

        assert!(ForceLevelTable::new([500.0, f64::NAN, 4000.0, 8000.0]).is_err());
        assert!(ForceLevelTable::new([-1.0, 1000.0, 4000.0, 8000.0]).is_err());
    }

    #[test]
    fn test_from_levels() {
        let table = ForceLevelTable::from_levels(&ForceLevelTable::default().as_map()).unwrap();
        assert_eq!(table, ForceLevelTable::default());

        let mut levels = table.as_map();
        levels.remove("critical");
        let err = ForceLevelTable::from_levels(&levels).unwrap_err();
        assert!(err.to_string().contains("critical"));

        let mut levels = table.as_map();
        levels.insert("emergency".to_string(), 9000.0);
        assert!(ForceLevelTable::from_levels(&levels).is_err());
    }
}
