// src/processing/filters/mod.rs
//! Digital filters for signal conditioning

pub mod iir;

pub use iir::*;

use thiserror::Error;
use crate::error::AvcsError;

/// Common filter error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Signal too short for zero-phase filtering: need {required} samples, have {actual}")]
    SignalTooShort { required: usize, actual: usize },
}

impl From<FilterError> for AvcsError {
    fn from(err: FilterError) -> Self {
        AvcsError::filter("filter", err.to_string())
    }
}
