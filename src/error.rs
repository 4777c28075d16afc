// src/error.rs
//! Unified error handling for the AVCS core
//!
//! Only configuration problems are hard errors. Everything that can go wrong
//! inside a monitoring cycle (empty windows, degenerate statistics, a missing
//! filter) is reported as data on the [`CycleResult`](crate::processing::CycleResult)
//! instead, so this enum is deliberately small.

use std::collections::HashMap;
use std::time::SystemTime;
use thiserror::Error;

/// Unified error type for the crate
#[derive(Debug, Clone, Error)]
pub enum AvcsError {
    /// A force table, limit set or pipeline setting is missing or inconsistent
    #[error("[CONFIG] Invalid configuration in {component}: {reason} ({})", .context.operation)]
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },

    /// The configuration source could not be read or parsed
    #[error("[CONFIG-LOAD] Failed to load {source_name}: {reason}")]
    ConfigLoad {
        source_name: String,
        reason: String,
        context: ErrorContext,
    },

    /// A digital filter could not be designed or applied
    #[error("[FILTER] Conditioning error: {reason} ({})", .context.operation)]
    Filter {
        reason: String,
        context: ErrorContext,
    },
}

/// Error context for debugging and analysis
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub component: String,
    pub operation: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub additional_info: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
            additional_info: HashMap::new(),
        }
    }

    /// Create error context with file and line information
    pub fn with_location(component: &str, operation: &str, file: &'static str, line: u32) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }

    /// Add additional information to the context
    pub fn add_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}

impl AvcsError {
    /// Build a configuration error for `component`; pass `error_context!` so
    /// the raising site is recorded
    pub fn configuration(component: &str, reason: impl Into<String>, context: ErrorContext) -> Self {
        AvcsError::Configuration {
            component: component.to_string(),
            reason: reason.into(),
            context,
        }
    }

    /// Build a filter error raised while conditioning
    pub fn filter(operation: &str, reason: impl Into<String>) -> Self {
        AvcsError::Filter {
            reason: reason.into(),
            context: ErrorContext::new("signal_conditioner", operation),
        }
    }

    /// Context attached to this error
    pub fn context(&self) -> &ErrorContext {
        match self {
            AvcsError::Configuration { context, .. }
            | AvcsError::ConfigLoad { context, .. }
            | AvcsError::Filter { context, .. } => context,
        }
    }

    /// True for the construction-time configuration failures
    pub fn is_configuration(&self) -> bool {
        matches!(self, AvcsError::Configuration { .. } | AvcsError::ConfigLoad { .. })
    }
}

impl From<config::ConfigError> for AvcsError {
    fn from(err: config::ConfigError) -> Self {
        AvcsError::ConfigLoad {
            source_name: "configuration sources".to_string(),
            reason: err.to_string(),
            context: error_context!("config_loader", "load"),
        }
    }
}

impl From<toml::de::Error> for AvcsError {
    fn from(err: toml::de::Error) -> Self {
        AvcsError::ConfigLoad {
            source_name: "TOML document".to_string(),
            reason: err.to_string(),
            context: error_context!("config_loader", "parse_toml"),
        }
    }
}

/// Result type alias for AVCS operations
pub type AvcsResult<T> = Result<T, AvcsError>;
