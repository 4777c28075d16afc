//! AVCS monitor demo
//!
//! Simulates a degrading rotating machine, runs every window through a
//! monitoring station and prints the final diagnostics and maintenance
//! report as JSON.
//!
//! # Usage
//! ```bash
//! RUST_LOG=avcs_core=debug ./avcs-monitor --cycles 500 --seed 42 --initial-health 0.7
//! ```

use std::path::PathBuf;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use avcs_core::config::{ConfigLoader, MonitorConfig};
use avcs_core::maintenance::{MaintenanceAdvisor, MaintenanceReport};
use avcs_core::processing::{Diagnostics, PlcReport, TrendReport};
use avcs_core::simulation::{AssetSimulator, LoadProfile, SimulationConfig};
use avcs_core::station::{ChannelInput, ChannelKind, MonitoringStation};

/// Thermal and acoustic sensors report once per second
const AUX_SAMPLE_RATE_HZ: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(name = "avcs-monitor")]
#[command(about = "Signal-health monitoring of a simulated rotating machine")]
#[command(version)]
struct Args {
    /// Number of monitoring cycles (simulated operating hours)
    #[arg(short, long, default_value = "200")]
    cycles: u64,

    /// TOML configuration file; AVCS__SECTION__KEY variables override it
    #[arg(short = 'C', long, env = "AVCS_CONFIG")]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Starting health of the simulated machine (0.1-1.0)
    #[arg(long, default_value = "1.0")]
    initial_health: f64,

    /// Run the machine under high load (faster wear)
    #[arg(long)]
    high_load: bool,

    /// Only print the final JSON report
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct FinalReport {
    cycles: u64,
    true_health: f64,
    trend: TrendReport,
    diagnostics: Vec<(ChannelKind, Diagnostics)>,
    plc: Option<PlcReport>,
    maintenance: MaintenanceReport,
}

fn load_config(path: Option<PathBuf>) -> avcs_core::AvcsResult<MonitorConfig> {
    match path {
        Some(path) => ConfigLoader::with_paths(vec![path]).load(),
        None => ConfigLoader::new().load(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(if args.quiet { "warn" } else { "info" })),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config)?;
    let mut station = MonitoringStation::new(&config)?;

    let mut simulator = AssetSimulator::new(SimulationConfig {
        initial_health: args.initial_health,
        sample_rate_hz: config.pipeline.sample_rate_hz,
        seed: args.seed,
        ..SimulationConfig::default()
    })?;
    let load = if args.high_load { LoadProfile::High } else { LoadProfile::Normal };

    info!(cycles = args.cycles, initial_health = simulator.health(), ?load, "starting simulation");

    for _ in 0..args.cycles {
        let frame = simulator.step(load);
        let report = station.run_cycle(&[
            ChannelInput { kind: ChannelKind::Vibration, samples: &frame.vibration, sample_rate_hz: frame.sample_rate_hz },
            ChannelInput { kind: ChannelKind::Thermal, samples: &frame.thermal, sample_rate_hz: AUX_SAMPLE_RATE_HZ },
            ChannelInput { kind: ChannelKind::Acoustic, samples: &frame.acoustic, sample_rate_hz: AUX_SAMPLE_RATE_HZ },
        ]);

        if let Some(vibration) = report.channels.iter().find(|c| c.kind == ChannelKind::Vibration) {
            let result = &vibration.result;
            if frame.operating_hours % 50 == 0 || result.anomaly_flag {
                info!(
                    hour = frame.operating_hours,
                    true_health = format_args!("{:.4}", frame.health),
                    score = format_args!("{:.3}", result.health_score),
                    force_n = result.force_command,
                    trend = %result.trend_label,
                    "cycle"
                );
            }
        }
    }

    let vibration = station.handle(ChannelKind::Vibration);
    let score = vibration
        .and_then(|h| h.export_diagnostics().last_health_score)
        .unwrap_or(1.0);

    let report = FinalReport {
        cycles: args.cycles,
        true_health: simulator.health(),
        trend: vibration.map(|h| h.trend()).unwrap_or_else(TrendReport::insufficient),
        diagnostics: station.diagnostics(),
        plc: vibration.map(|h| h.plc_report()),
        maintenance: MaintenanceAdvisor::new().advise(score),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
