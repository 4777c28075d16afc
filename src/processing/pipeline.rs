// src/processing/pipeline.rs
//! Per-asset monitoring cycle: buffer, condition, extract, score, decide, trend

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::acquisition::SampleBuffer;
use crate::config::{ConditioningConfig, MonitorConfig, TrendConfig};
use crate::error::{AvcsError, AvcsResult};
use crate::processing::actuator::{decide, ForceLevel, ForceLevelTable};
use crate::processing::conditioning::{ConditioningMode, SignalConditioner};
use crate::processing::features::{FeatureExtractor, FeatureSet};
use crate::processing::scoring::{HealthBand, HealthScorer, ScoreLimits};
use crate::processing::trend::{
    anomaly_frequency, ScoreHistory, ScoreHistoryEntry, TrendEstimator, TrendLabel, TrendReport,
};
use crate::utils::time::{SystemTimeProvider, TimeProvider};

/// Name reported as the function-block instance
const FB_INSTANCE: &str = "AVCS_Soul_Integration";

/// Where a handle is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    Idle,
    Processing,
    Succeeded,
    Failed,
}

/// Why a cycle's input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedInput {
    EmptyWindow,
    NonFiniteSample,
    InvalidSampleRate,
    /// Samples are finite but too large for the window statistics
    OutOfRangeSamples,
}

impl std::fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            MalformedInput::EmptyWindow => "empty sample window",
            MalformedInput::NonFiniteSample => "window contains a non-finite sample",
            MalformedInput::InvalidSampleRate => "sample rate must be finite and positive",
            MalformedInput::OutOfRangeSamples => "window statistics overflowed",
        };
        f.write_str(text)
    }
}

/// Outcome of one monitoring cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    pub health_score: f64,
    pub anomaly_flag: bool,
    /// Actuator force in Newtons
    pub force_command: f64,
    pub force_level: ForceLevel,
    pub trend_label: TrendLabel,
    pub estimated_remaining_cycles: Option<f64>,
    pub cycle_index: u64,
    pub data_valid: bool,
    pub band: HealthBand,
    /// Features of the conditioned window; `None` when the input was rejected
    pub features: Option<FeatureSet>,
    pub conditioning: Option<ConditioningMode>,
    pub malformed_input: Option<MalformedInput>,
}

impl CycleResult {
    fn rejected(cycle_index: u64, reason: MalformedInput, force_table: &ForceLevelTable, trend: TrendReport) -> Self {
        Self {
            health_score: 1.0,
            anomaly_flag: false,
            force_command: force_table.force(ForceLevel::Standby),
            force_level: ForceLevel::Standby,
            trend_label: trend.label,
            estimated_remaining_cycles: trend.estimated_remaining_cycles,
            cycle_index,
            data_valid: false,
            band: HealthBand::Excellent,
            features: None,
            conditioning: None,
            malformed_input: Some(reason),
        }
    }
}

/// Read-only snapshot of a handle's counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub cycle_count: u64,
    pub error_count: u64,
    pub anomaly_count: u64,
    pub buffer_size: usize,
    pub buffer_capacity: usize,
    pub history_len: usize,
    pub last_health_score: Option<f64>,
    pub last_force_command: Option<f64>,
    pub anomaly_frequency: f64,
    pub lowpass_available: bool,
    pub state: CycleState,
}

/// Function-block style status report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlcReport {
    #[serde(rename = "FB_Instance")]
    pub instance: String,
    #[serde(rename = "Inputs")]
    pub inputs: PlcInputs,
    #[serde(rename = "Outputs")]
    pub outputs: PlcOutputs,
    #[serde(rename = "Diagnostics")]
    pub diagnostics: PlcDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlcInputs {
    #[serde(rename = "Buffer_Size")]
    pub buffer_size: usize,
    #[serde(rename = "Sample_Rate")]
    pub sample_rate: f64,
    #[serde(rename = "Data_Valid")]
    pub data_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlcOutputs {
    #[serde(rename = "Health_Score")]
    pub health_score: f64,
    #[serde(rename = "Anomaly_Count")]
    pub anomaly_count: u64,
    #[serde(rename = "Force_Recommendation")]
    pub force_recommendation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlcDiagnostics {
    #[serde(rename = "Cycle_Count")]
    pub cycle_count: u64,
    #[serde(rename = "Memory_Usage_Bytes")]
    pub memory_usage_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct CycleCounters {
    cycle_count: u64,
    error_count: u64,
    anomaly_count: u64,
    cycles_since_reset: u64,
}

/// Owns one asset's buffer, history and counters
///
/// Not internally synchronised: drive it from one thread at a time. The
/// handle is `Send`, so it can be moved to a worker.
pub struct PipelineHandle {
    buffer: SampleBuffer,
    history: ScoreHistory,
    conditioner: SignalConditioner,
    extractor: FeatureExtractor,
    scorer: HealthScorer,
    trend: TrendEstimator,
    force_table: ForceLevelTable,
    limits: ScoreLimits,
    time_provider: Arc<dyn TimeProvider>,
    state: CycleState,
    counters: CycleCounters,
    last_health_score: Option<f64>,
    last_force_command: Option<f64>,
    last_anomaly: bool,
    last_sample_rate: f64,
    last_data_valid: bool,
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("buffer_size", &self.buffer.len())
            .field("history_len", &self.history.len())
            .field("state", &self.state)
            .field("cycle_count", &self.counters.cycle_count)
            .finish()
    }
}

impl PipelineHandle {
    /// Create a handle with default conditioning and trend settings
    pub fn initialize(
        capacity: usize,
        history_limit: usize,
        force_table: ForceLevelTable,
        limits: ScoreLimits,
    ) -> AvcsResult<Self> {
        Self::build(
            capacity,
            history_limit,
            force_table,
            limits,
            ConditioningConfig::default(),
            TrendConfig::default(),
        )
    }

    /// Create a handle from a full configuration
    pub fn from_config(config: &MonitorConfig) -> AvcsResult<Self> {
        let config = config.clone().validated()?;
        let force_table = config.force_table()?;
        Self::build(
            config.pipeline.buffer_capacity,
            config.pipeline.history_limit,
            force_table,
            config.limits,
            config.conditioning,
            config.trend,
        )
    }

    fn build(
        capacity: usize,
        history_limit: usize,
        force_table: ForceLevelTable,
        limits: ScoreLimits,
        conditioning: ConditioningConfig,
        trend: TrendConfig,
    ) -> AvcsResult<Self> {
        if capacity == 0 {
            return Err(AvcsError::configuration(
                "pipeline",
                "buffer capacity must be at least 1",
                crate::error_context!("pipeline", "initialize"),
            ));
        }
        if history_limit == 0 {
            return Err(AvcsError::configuration(
                "pipeline",
                "history limit must be at least 1",
                crate::error_context!("pipeline", "initialize"),
            ));
        }
        limits
            .check()
            .map_err(|reason| AvcsError::configuration("pipeline", reason, crate::error_context!("pipeline", "initialize")))?;

        let conditioner = SignalConditioner::new(conditioning);
        if !conditioner.lowpass_available() {
            info!("low-pass stage unavailable, conditioning will remove DC only");
        }
        debug!(capacity, history_limit, critical_rms_limit = limits.critical_rms_limit, "pipeline initialized");

        Ok(Self {
            buffer: SampleBuffer::new(capacity),
            history: ScoreHistory::new(history_limit),
            conditioner,
            extractor: FeatureExtractor::new(),
            scorer: HealthScorer::new(),
            trend: TrendEstimator::new(trend),
            force_table,
            limits,
            time_provider: Arc::new(SystemTimeProvider),
            state: CycleState::Idle,
            counters: CycleCounters::default(),
            last_health_score: None,
            last_force_command: None,
            last_anomaly: false,
            last_sample_rate: 0.0,
            last_data_valid: false,
        })
    }

    /// Replace the clock used for history timestamps
    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    /// Run one cycle on a freshly acquired window
    ///
    /// Never fails: malformed input yields a safe standby result with
    /// `data_valid = false` and bumps the error counter.
    pub fn run_cycle(&mut self, raw_window: &[f64], sample_rate_hz: f64) -> CycleResult {
        self.counters.cycle_count += 1;
        self.counters.cycles_since_reset += 1;
        let cycle_index = self.counters.cycle_count;
        self.state = CycleState::Processing;

        let result = match validate_input(raw_window, sample_rate_hz) {
            Err(reason) => {
                self.counters.error_count += 1;
                self.state = CycleState::Failed;
                warn!(cycle_index, %reason, len = raw_window.len(), sample_rate_hz, "rejected cycle input");
                CycleResult::rejected(cycle_index, reason, &self.force_table, self.trend.update(&self.history))
            }
            Ok(()) => {
                let result = self.process(cycle_index, raw_window, sample_rate_hz);
                self.state = if result.malformed_input.is_some() {
                    CycleState::Failed
                } else {
                    CycleState::Succeeded
                };
                result
            }
        };

        self.state = CycleState::Idle;
        result
    }

    fn process(&mut self, cycle_index: u64, raw_window: &[f64], sample_rate_hz: f64) -> CycleResult {
        self.buffer.push(raw_window);
        let snapshot = self.buffer.snapshot();

        let conditioned = self.conditioner.condition(&snapshot, sample_rate_hz);
        let features = self.extractor.extract(&conditioned, sample_rate_hz);
        let assessment = self.scorer.score(&features, &self.limits);
        if !assessment.data_valid {
            self.counters.error_count += 1;
            self.last_data_valid = false;
            warn!(cycle_index, len = raw_window.len(), "window statistics not finite, cycle discarded");
            return CycleResult {
                conditioning: Some(conditioned.mode),
                ..CycleResult::rejected(
                    cycle_index,
                    MalformedInput::OutOfRangeSamples,
                    &self.force_table,
                    self.trend.update(&self.history),
                )
            };
        }
        let decision = decide(assessment.health_score, assessment.anomaly_flag, &self.force_table);

        self.history.push(ScoreHistoryEntry {
            cycle_index,
            timestamp: self.time_provider.now_nanos(),
            health_score: assessment.health_score,
            anomaly_flag: assessment.anomaly_flag,
            force_command: decision.force_newtons,
            force_level: decision.level,
        });
        let trend = self.trend.update(&self.history);

        if assessment.anomaly_flag {
            self.counters.anomaly_count += 1;
        }
        if assessment.anomaly_flag != self.last_anomaly {
            info!(
                cycle_index,
                health_score = assessment.health_score,
                anomaly = assessment.anomaly_flag,
                "anomaly state changed"
            );
        }
        self.last_anomaly = assessment.anomaly_flag;
        self.last_health_score = Some(assessment.health_score);
        self.last_force_command = Some(decision.force_newtons);
        self.last_sample_rate = sample_rate_hz;
        self.last_data_valid = assessment.data_valid;

        debug!(
            cycle_index,
            health_score = assessment.health_score,
            force_level = %decision.level,
            trend = %trend.label,
            filtered = conditioned.is_filtered(),
            "cycle complete"
        );

        CycleResult {
            health_score: assessment.health_score,
            anomaly_flag: assessment.anomaly_flag,
            force_command: decision.force_newtons,
            force_level: decision.level,
            trend_label: trend.label,
            estimated_remaining_cycles: trend.estimated_remaining_cycles,
            cycle_index,
            data_valid: assessment.data_valid,
            band: assessment.band,
            features: Some(features),
            conditioning: Some(conditioned.mode),
            malformed_input: None,
        }
    }

    /// The most recent `limit` history entries, oldest first
    pub fn get_history(&self, limit: usize) -> Vec<ScoreHistoryEntry> {
        self.history.recent(limit)
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    /// Current trend over the retained history
    pub fn trend(&self) -> TrendReport {
        self.trend.update(&self.history)
    }

    /// Clear error and anomaly counters; history and buffer are kept
    pub fn reset_counters(&mut self) {
        self.counters.error_count = 0;
        self.counters.anomaly_count = 0;
        self.counters.cycles_since_reset = 0;
        debug!("pipeline counters reset");
    }

    /// Clear counters, buffer and history
    pub fn reset(&mut self) {
        self.counters = CycleCounters::default();
        self.buffer.clear();
        self.history.clear();
        self.last_health_score = None;
        self.last_force_command = None;
        self.last_anomaly = false;
        self.last_data_valid = false;
        self.state = CycleState::Idle;
        debug!("pipeline reset");
    }

    pub fn export_diagnostics(&self) -> Diagnostics {
        Diagnostics {
            cycle_count: self.counters.cycle_count,
            error_count: self.counters.error_count,
            anomaly_count: self.counters.anomaly_count,
            buffer_size: self.buffer.len(),
            buffer_capacity: self.buffer.capacity(),
            history_len: self.history.len(),
            last_health_score: self.last_health_score,
            last_force_command: self.last_force_command,
            anomaly_frequency: anomaly_frequency(self.counters.anomaly_count, self.counters.cycles_since_reset),
            lowpass_available: self.conditioner.lowpass_available(),
            state: self.state,
        }
    }

    pub fn plc_report(&self) -> PlcReport {
        PlcReport {
            instance: FB_INSTANCE.to_string(),
            inputs: PlcInputs {
                buffer_size: self.buffer.len(),
                sample_rate: self.last_sample_rate,
                data_valid: self.last_data_valid,
            },
            outputs: PlcOutputs {
                health_score: self.last_health_score.unwrap_or(0.0),
                anomaly_count: self.counters.anomaly_count,
                force_recommendation: self.last_force_command.unwrap_or(0.0),
            },
            diagnostics: PlcDiagnostics {
                cycle_count: self.counters.cycle_count,
                memory_usage_bytes: self.buffer.memory_usage_bytes(),
            },
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn force_table(&self) -> &ForceLevelTable {
        &self.force_table
    }

    pub fn limits(&self) -> &ScoreLimits {
        &self.limits
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }
}

fn validate_input(window: &[f64], sample_rate_hz: f64) -> Result<(), MalformedInput> {
    if window.is_empty() {
        return Err(MalformedInput::EmptyWindow);
    }
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(MalformedInput::InvalidSampleRate);
    }
    if window.iter().any(|x| !x.is_finite()) {
        return Err(MalformedInput::NonFiniteSample);
    }
    Ok(())
}

/// Create a monitoring handle
pub fn initialize(
    capacity: usize,
    history_limit: usize,
    force_table: ForceLevelTable,
    limits: ScoreLimits,
) -> AvcsResult<PipelineHandle> {
    PipelineHandle::initialize(capacity, history_limit, force_table, limits)
}

pub fn run_cycle(handle: &mut PipelineHandle, raw_window: &[f64], sample_rate_hz: f64) -> CycleResult {
    handle.run_cycle(raw_window, sample_rate_hz)
}

pub fn get_history(handle: &PipelineHandle, limit: usize) -> Vec<ScoreHistoryEntry> {
    handle.get_history(limit)
}

pub fn reset_counters(handle: &mut PipelineHandle) {
    handle.reset_counters()
}

pub fn export_diagnostics(handle: &PipelineHandle) -> Diagnostics {
    handle.export_diagnostics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::MockTimeProvider;

    fn handle() -> PipelineHandle {
        PipelineHandle::initialize(100, 5, ForceLevelTable::default(), ScoreLimits::default()).unwrap()
    }

    fn assert_send<T: Send>() {}

    #[test]
    fn test_handle_is_send() {
        assert_send::<PipelineHandle>();
    }

    #[test]
    fn test_invalid_construction() {
        assert!(PipelineHandle::initialize(0, 5, ForceLevelTable::default(), ScoreLimits::default()).is_err());
        assert!(PipelineHandle::initialize(10, 0, ForceLevelTable::default(), ScoreLimits::default()).is_err());
        let err = PipelineHandle::initialize(10, 5, ForceLevelTable::default(), ScoreLimits::new(-1.0)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_construction_errors_record_location() {
        let err = PipelineHandle::initialize(0, 5, ForceLevelTable::default(), ScoreLimits::default()).unwrap_err();
        let context = err.context();
        assert_eq!(context.operation, "initialize");
        assert_eq!(context.file, Some(file!()));
        assert!(context.line.is_some());
    }

    #[test]
    fn test_cycle_indices_start_at_one() {
        let mut handle = handle();
        assert_eq!(handle.run_cycle(&[0.1, -0.1, 0.2], 1000.0).cycle_index, 1);
        assert_eq!(handle.run_cycle(&[0.1, -0.1, 0.2], 1000.0).cycle_index, 2);
        assert_eq!(handle.state(), CycleState::Idle);
    }

    #[test]
    fn test_malformed_inputs_are_absorbed() {
        let mut handle = handle();

        let result = handle.run_cycle(&[1.0, f64::NAN], 1000.0);
        assert_eq!(result.malformed_input, Some(MalformedInput::NonFiniteSample));
        assert!(!result.data_valid);

        let result = handle.run_cycle(&[1.0], 0.0);
        assert_eq!(result.malformed_input, Some(MalformedInput::InvalidSampleRate));
        assert_eq!(result.force_level, ForceLevel::Standby);

        let diagnostics = handle.export_diagnostics();
        assert_eq!(diagnostics.error_count, 2);
        assert_eq!(diagnostics.cycle_count, 2);
        assert_eq!(diagnostics.history_len, 0);
        assert_eq!(diagnostics.buffer_size, 0);
        assert_eq!(diagnostics.last_health_score, None);
    }

    #[test]
    fn test_overflowing_window_is_discarded() {
        let mut handle = handle();
        handle.run_cycle(&[0.5, -0.5, 0.25, -0.25], 1000.0);

        let huge: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1e160 } else { -1e160 }).collect();
        let result = handle.run_cycle(&huge, 1000.0);

        assert!(!result.data_valid);
        assert_eq!(result.health_score, 1.0);
        assert_eq!(result.force_level, ForceLevel::Standby);
        assert_eq!(result.malformed_input, Some(MalformedInput::OutOfRangeSamples));
        assert_eq!(result.cycle_index, 2);
        assert!(result.conditioning.is_some());

        let diagnostics = handle.export_diagnostics();
        assert_eq!(diagnostics.error_count, 1);
        assert_eq!(diagnostics.cycle_count, 2);
        assert_eq!(diagnostics.history_len, 1);
        assert!(diagnostics.last_health_score.unwrap() < 1.0);
        assert!(!handle.plc_report().inputs.data_valid);
    }

    #[test]
    fn test_history_uses_time_provider() {
        let clock = Arc::new(MockTimeProvider::new(42));
        let mut handle = handle().with_time_provider(clock.clone());

        handle.run_cycle(&[0.5, -0.5], 1000.0);
        clock.advance_by(8);
        handle.run_cycle(&[0.5, -0.5], 1000.0);

        let timestamps: Vec<u64> = handle.get_history(10).iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![42, 50]);
    }

    #[test]
    fn test_reset_counters_keeps_history() {
        let mut handle = handle();
        handle.run_cycle(&[], 1000.0);
        handle.run_cycle(&[4.0, -4.0, 4.0, -4.0], 1000.0);
        handle.reset_counters();

        let diagnostics = handle.export_diagnostics();
        assert_eq!(diagnostics.error_count, 0);
        assert_eq!(diagnostics.anomaly_count, 0);
        assert_eq!(diagnostics.anomaly_frequency, 0.0);
        assert_eq!(diagnostics.cycle_count, 2);
        assert_eq!(handle.get_history(10).len(), 1);

        handle.reset();
        assert_eq!(handle.export_diagnostics().cycle_count, 0);
        assert!(handle.get_history(10).is_empty());
        assert!(handle.buffer().is_empty());
    }

    #[test]
    fn test_plc_report() {
        let mut handle = handle();
        let report = handle.plc_report();
        assert_eq!(report.outputs.health_score, 0.0);
        assert_eq!(report.diagnostics.memory_usage_bytes, 800);

        let result = handle.run_cycle(&[0.2, -0.2, 0.1], 500.0);
        let report = handle.plc_report();
        assert_eq!(report.instance, FB_INSTANCE);
        assert_eq!(report.inputs.sample_rate, 500.0);
        assert_eq!(report.outputs.force_recommendation, result.force_command);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["Inputs"]["Buffer_Size"], 3);
        assert_eq!(json["Diagnostics"]["Cycle_Count"], 1);
    }
}
