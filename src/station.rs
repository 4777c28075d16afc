//! Multi-channel monitoring of one asset
//!
//! Each channel owns its own [`PipelineHandle`]. A station cycle hands every
//! handle to exactly one rayon worker, so handles are never shared.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::config::MonitorConfig;
use crate::error::AvcsResult;
use crate::processing::pipeline::{CycleResult, Diagnostics, PipelineHandle};
use crate::processing::scoring::ScoreLimits;

/// Physical quantity measured by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Velocity, mm/s
    Vibration,
    /// Temperature, °C
    Thermal,
    /// Sound pressure, dB
    Acoustic,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Vibration, ChannelKind::Thermal, ChannelKind::Acoustic];

    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::Vibration => "vibration",
            ChannelKind::Thermal => "thermal",
            ChannelKind::Acoustic => "acoustic",
        }
    }
}

/// One window for one channel
#[derive(Debug, Clone, Copy)]
pub struct ChannelInput<'a> {
    pub kind: ChannelKind,
    pub samples: &'a [f64],
    pub sample_rate_hz: f64,
}

/// Result of one channel in a station cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub kind: ChannelKind,
    pub result: CycleResult,
}

/// Combined outcome of a station cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub channels: Vec<ChannelResult>,
    /// Lowest valid channel score, 1.0 when no channel produced valid data
    pub overall_health: f64,
    pub any_anomaly: bool,
}

struct Channel {
    kind: ChannelKind,
    handle: PipelineHandle,
}

/// Set of channel pipelines monitoring one asset
pub struct MonitoringStation {
    channels: Vec<Channel>,
}

impl std::fmt::Debug for MonitoringStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.channels.iter().map(|c| c.kind)).finish()
    }
}

impl MonitoringStation {
    /// One pipeline per channel kind, each with its channel's default limit
    pub fn new(config: &MonitorConfig) -> AvcsResult<Self> {
        let channels = ChannelKind::ALL
            .iter()
            .map(|&kind| {
                let mut channel_config = config.clone();
                if kind != ChannelKind::Vibration {
                    channel_config.limits = ScoreLimits::for_channel(kind);
                }
                Ok(Channel {
                    kind,
                    handle: PipelineHandle::from_config(&channel_config)?,
                })
            })
            .collect::<AvcsResult<Vec<_>>>()?;

        Ok(Self { channels })
    }

    /// Station with explicitly built handles
    pub fn with_channels(channels: Vec<(ChannelKind, PipelineHandle)>) -> Self {
        Self {
            channels: channels
                .into_iter()
                .map(|(kind, handle)| Channel { kind, handle })
                .collect(),
        }
    }

    pub fn channel_kinds(&self) -> Vec<ChannelKind> {
        self.channels.iter().map(|c| c.kind).collect()
    }

    pub fn handle(&self, kind: ChannelKind) -> Option<&PipelineHandle> {
        self.channels.iter().find(|c| c.kind == kind).map(|c| &c.handle)
    }

    /// Run one cycle on every channel that has input, in parallel
    ///
    /// Inputs for channels the station does not own are ignored.
    pub fn run_cycle(&mut self, inputs: &[ChannelInput<'_>]) -> StationReport {
        for input in inputs {
            if !self.channels.iter().any(|c| c.kind == input.kind) {
                warn!(channel = input.kind.name(), "no pipeline for channel, input ignored");
            }
        }

        let channels: Vec<ChannelResult> = self
            .channels
            .par_iter_mut()
            .filter_map(|channel| {
                let input = inputs.iter().find(|i| i.kind == channel.kind)?;
                let result = channel.handle.run_cycle(input.samples, input.sample_rate_hz);
                Some(ChannelResult { kind: channel.kind, result })
            })
            .collect();

        let overall_health = channels
            .iter()
            .filter(|c| c.result.data_valid)
            .map(|c| c.result.health_score)
            .fold(1.0_f64, f64::min);
        let any_anomaly = channels.iter().any(|c| c.result.anomaly_flag);
        debug!(channels = channels.len(), overall_health, any_anomaly, "station cycle complete");

        StationReport { channels, overall_health, any_anomaly }
    }

    pub fn diagnostics(&self) -> Vec<(ChannelKind, Diagnostics)> {
        self.channels
            .iter()
            .map(|c| (c.kind, c.handle.export_diagnostics()))
            .collect()
    }

    pub fn reset_counters(&mut self) {
        self.channels.iter_mut().for_each(|c| c.handle.reset_counters());
    }
}
