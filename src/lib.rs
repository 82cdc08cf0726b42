//! Dynbottle - dynamic bottleneck detection for process-mining event logs
//!
//! This library turns case-level activity logs into segment-level data
//! (transitions between adjacent activity points), scores every segment
//! against its path with a robust modified z-score computed on
//! business-calendar working time, and detects two kinds of dynamic
//! bottleneck: blockage (runs of abnormally slow transitions) and high load
//! (time bins with abnormally many transitions).

pub mod binning;
pub mod calendar;
pub mod chart;
pub mod cli;
pub mod config;
pub mod csv_input;
pub mod csv_output;
pub mod detection;
pub mod engine;
pub mod error;
pub mod event;
pub mod json_output;
pub mod report;
pub mod scoring;
pub mod segment;
pub mod stats;

pub use config::AnalysisConfig;
pub use engine::{AnalysisReport, BottleneckEngine};
pub use error::{AnalysisError, Result};
