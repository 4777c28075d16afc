// src/processing/trend.rs
//! Score history, trend classification and remaining-life estimate

use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::config::TrendConfig;
use crate::processing::actuator::ForceLevel;

/// One successful cycle, as retained in the history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryEntry {
    pub cycle_index: u64,
    /// Nanoseconds since the Unix epoch
    pub timestamp: u64,
    pub health_score: f64,
    pub anomaly_flag: bool,
    pub force_command: f64,
    pub force_level: ForceLevel,
}

/// Bounded FIFO of score entries, oldest first
#[derive(Debug, Clone)]
pub struct ScoreHistory {
    entries: VecDeque<ScoreHistoryEntry>,
    limit: usize,
}

impl ScoreHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(4096)),
            limit,
        }
    }

    /// Append, evicting the oldest entry once the limit is reached
    pub fn push(&mut self, entry: ScoreHistoryEntry) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The most recent `limit` entries, oldest first
    pub fn recent(&self, limit: usize) -> Vec<ScoreHistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).copied().collect()
    }

    /// Health scores of the most recent `count` entries, oldest first
    pub fn recent_scores(&self, count: usize) -> Vec<f64> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).map(|e| e.health_score).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Qualitative direction of the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Deteriorating,
    Improving,
    Stable,
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Deteriorating => "deteriorating",
            TrendLabel::Improving => "improving",
            TrendLabel::Stable => "stable",
            TrendLabel::InsufficientData => "insufficient data",
        }
    }
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend label with its supporting figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub label: TrendLabel,
    /// Net score drift across the fit window; `None` without enough history
    pub slope: Option<f64>,
    pub estimated_remaining_cycles: Option<f64>,
}

impl TrendReport {
    pub fn insufficient() -> Self {
        Self {
            label: TrendLabel::InsufficientData,
            slope: None,
            estimated_remaining_cycles: None,
        }
    }
}

/// Fits a line to the recent history and estimates remaining life
#[derive(Debug, Clone)]
pub struct TrendEstimator {
    config: TrendConfig,
}

impl TrendEstimator {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    pub fn update(&self, history: &ScoreHistory) -> TrendReport {
        if history.len() < self.config.min_history {
            return TrendReport::insufficient();
        }

        let window = history.recent_scores(self.config.min_history);
        let slope = match normalized_slope(&window) {
            Some(slope) => slope,
            None => return TrendReport::insufficient(),
        };

        let label = if slope < -self.config.slope_threshold {
            TrendLabel::Deteriorating
        } else if slope > self.config.slope_threshold {
            TrendLabel::Improving
        } else {
            TrendLabel::Stable
        };

        let recent = history.recent_scores(self.config.recent_window);
        let estimate = if recent.is_empty() {
            None
        } else {
            let mean = recent.iter().sum::<f64>() / recent.len() as f64;
            Some(self.config.rul_scale_cycles * mean * mean)
        };

        TrendReport {
            label,
            slope: Some(slope),
            estimated_remaining_cycles: estimate,
        }
    }
}

/// Least-squares slope of `values` against position scaled to [0, 1]
///
/// Equals the per-sample slope times `len - 1`. `None` for fewer than two
/// values.
pub fn normalized_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let span = (n - 1) as f64;
    let x_mean = 0.5;
    let y_mean = values.iter().sum::<f64>() / n as f64;
    let (sxy, sxx) = values.iter().enumerate().fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
        let dx = i as f64 / span - x_mean;
        (sxy + dx * (y - y_mean), sxx + dx * dx)
    });

    Some(sxy / sxx)
}

/// Anomalous cycles as a fraction of all cycles, 0 when none have run
pub fn anomaly_frequency(anomaly_count: u64, cycle_count: u64) -> f64 {
    if cycle_count == 0 {
        0.0
    } else {
        anomaly_count as f64 / cycle_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cycle_index: u64, health_score: f64) -> ScoreHistoryEntry {
        ScoreHistoryEntry {
            cycle_index,
            timestamp: cycle_index * 1_000,
            health_score,
            anomaly_flag: health_score < 0.7,
            force_command: 500.0,
            force_level: ForceLevel::Standby,
        }
    }

    fn history_of(scores: &[f64]) -> ScoreHistory {
        let mut history = ScoreHistory::new(1000);
        for (i, &score) in scores.iter().enumerate() {
            history.push(entry(i as u64 + 1, score));
        }
        history
    }

    #[test]
    fn test_history_is_bounded_fifo() {
        let mut history = ScoreHistory::new(3);
        for i in 1..=5 {
            history.push(entry(i, 0.9));
        }

        let indices: Vec<u64> = history.iter().map(|e| e.cycle_index).collect();
        assert_eq!(indices, vec![3, 4, 5]);
        assert_eq!(history.recent(2).iter().map(|e| e.cycle_index).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(history.recent(10).len(), 3);
    }

    #[test]
    fn test_insufficient_history() {
        let estimator = TrendEstimator::new(TrendConfig::default());
        let report = estimator.update(&history_of(&[0.9; 49]));
        assert_eq!(report, TrendReport::insufficient());
        assert_eq!(report.label.to_string(), "insufficient data");
    }

    #[test]
    fn test_declining_history_is_deteriorating() {
        let scores: Vec<f64> = (0..60).map(|i| 0.95 - 0.55 * i as f64 / 59.0).collect();
        let report = TrendEstimator::new(TrendConfig::default()).update(&history_of(&scores));

        assert_eq!(report.label, TrendLabel::Deteriorating);
        let remaining = report.estimated_remaining_cycles.unwrap();
        assert!(remaining.is_finite() && remaining > 0.0);
    }

    #[test]
    fn test_flat_and_rising_histories() {
        let estimator = TrendEstimator::new(TrendConfig::default());

        let flat = estimator.update(&history_of(&[0.8; 60]));
        assert_eq!(flat.label, TrendLabel::Stable);
        // 10000 × 0.8²
        assert!((flat.estimated_remaining_cycles.unwrap() - 6400.0).abs() < 1e-6);

        let rising: Vec<f64> = (0..50).map(|i| 0.5 + 0.4 * i as f64 / 49.0).collect();
        assert_eq!(estimator.update(&history_of(&rising)).label, TrendLabel::Improving);
    }

    #[test]
    fn test_normalized_slope() {
        assert_eq!(normalized_slope(&[1.0]), None);
        assert!((normalized_slope(&[0.0, 0.5, 1.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((normalized_slope(&[0.9, 0.8]).unwrap() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_anomaly_frequency() {
        assert_eq!(anomaly_frequency(0, 0), 0.0);
        assert_eq!(anomaly_frequency(3, 12), 0.25);
    }
}
