//! Error types for the bottleneck analysis pipeline

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised at the boundary of a pipeline stage
///
/// Configuration and shape errors abort the run. Numeric degeneracies
/// (zero MAD, single-bin paths) are resolved inside the stages and never
/// show up here.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid interval: start {from} is after end {to}")]
    InvalidInterval {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No cases to analyze")]
    EmptyCase,

    #[error("No segment dataset: run transform before detection")]
    EmptyDataset,

    #[error("Activity label not present in lane order: {0}")]
    UnknownActivity(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
