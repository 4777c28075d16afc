// src/config/loader.rs
//! Configuration loader: TOML files layered with environment overrides

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use config::{Config, Environment, File, FileFormat};
use tracing::{debug, info};
use crate::config::constants::paths;
use crate::config::MonitorConfig;
use crate::error::{AvcsError, AvcsResult};

/// Loads a [`MonitorConfig`] from files and `AVCS__SECTION__KEY` variables
///
/// Later sources override earlier ones: defaults, then each file in order,
/// then the environment.
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    files_required: bool,
    env_override: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader for `avcs.toml` in the working directory, if present
    pub fn new() -> Self {
        Self {
            config_paths: vec![PathBuf::from(paths::DEFAULT_CONFIG_FILE)],
            files_required: false,
            env_override: None,
        }
    }

    /// Loader for explicit files, all of which must exist
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            files_required: true,
            env_override: None,
        }
    }

    /// Read overrides from this map instead of the process environment
    pub fn with_environment(mut self, vars: HashMap<String, String>) -> Self {
        self.env_override = Some(vars);
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> AvcsResult<MonitorConfig> {
        let mut builder = Config::builder();

        for path in &self.config_paths {
            debug!(path = %path.display(), required = self.files_required, "adding config file source");
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(self.files_required),
            );
        }

        let environment = Environment::with_prefix(paths::ENV_PREFIX)
            .prefix_separator(paths::ENV_SEPARATOR)
            .separator(paths::ENV_SEPARATOR)
            .try_parsing(true)
            .source(self.env_override.clone());
        builder = builder.add_source(environment);

        let config: MonitorConfig = builder.build()?.try_deserialize()?;
        let config = config.validated()?;

        info!(
            buffer_capacity = config.pipeline.buffer_capacity,
            history_limit = config.pipeline.history_limit,
            critical_rms_limit = config.limits.critical_rms_limit,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Write a configuration as TOML
    pub fn export_config<P: AsRef<Path>>(config: &MonitorConfig, path: P) -> AvcsResult<()> {
        let path = path.as_ref();
        let content = config.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| AvcsError::ConfigLoad {
            source_name: path.display().to_string(),
            reason: e.to_string(),
            context: crate::error_context!("config_loader", "export_config"),
        })
    }

    /// Files this loader reads, in merge order
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
