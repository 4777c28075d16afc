// ================================================================================
// Configuration file loading and validation
// File: tests/config_loading_tests.rs
// ================================================================================

use std::collections::HashMap;
use std::io::Write;

use avcs_core::config::{ConfigLoader, MonitorConfig};
use avcs_core::processing::PipelineHandle;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_partial_file_over_defaults() {
    let file = write_config(
        r#"
        [pipeline]
        buffer_capacity = 2048
        history_limit = 300

        [force_levels]
        standby = 250.0
        normal = 1000.0
        warning = 4000.0
        critical = 9000.0
        "#,
    );

    let config = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .with_environment(HashMap::new())
        .load()
        .unwrap();

    assert_eq!(config.pipeline.buffer_capacity, 2048);
    assert_eq!(config.pipeline.history_limit, 300);
    assert_eq!(config.force_levels["critical"], 9000.0);
    assert_eq!(config.limits.critical_rms_limit, 4.0);
    assert_eq!(config.trend.min_history, 50);

    let handle = PipelineHandle::from_config(&config).unwrap();
    assert_eq!(handle.export_diagnostics().buffer_capacity, 2048);
}

#[test]
fn environment_overrides_file() {
    let file = write_config(
        r#"
        [limits]
        critical_rms_limit = 6.0
        "#,
    );

    let mut vars = HashMap::new();
    vars.insert("AVCS__LIMITS__CRITICAL_RMS_LIMIT".to_string(), "2.5".to_string());

    let config = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .with_environment(vars)
        .load()
        .unwrap();
    assert_eq!(config.limits.critical_rms_limit, 2.5);
}

#[test]
fn invalid_values_are_rejected_at_load() {
    let file = write_config(
        r#"
        [conditioning]
        nyquist_fraction = 1.2

        [force_levels]
        standby = 500.0
        normal = 1000.0
        warning = 4000.0
        critical = 3000.0
        "#,
    );

    let err = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .with_environment(HashMap::new())
        .load()
        .unwrap_err();

    assert!(err.is_configuration());
    let message = err.to_string();
    assert!(message.contains("conditioning.nyquist_fraction"));
    assert!(message.contains("force_levels"));
}

#[test]
fn malformed_toml_is_a_load_error() {
    let file = write_config("[pipeline\nbuffer_capacity = ");

    let err = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .with_environment(HashMap::new())
        .load()
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn exported_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("avcs.toml");

    let mut original = MonitorConfig::default();
    original.trend.recent_window = 20;
    original.conditioning.filter_order = 6;
    ConfigLoader::export_config(&original, &path).unwrap();

    let loaded = ConfigLoader::with_paths(vec![path])
        .with_environment(HashMap::new())
        .load()
        .unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn toml_string_parsing() {
    let config = MonitorConfig::from_toml_str("[trend]\nslope_threshold = 0.02\n").unwrap();
    assert_eq!(config.trend.slope_threshold, 0.02);
    assert!(MonitorConfig::from_toml_str("pipeline = 3").is_err());
}
