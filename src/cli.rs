//! CLI argument parsing for Dynbottle

use crate::calendar::HolidaySet;
use crate::config::AnalysisConfig;
use crate::csv_input::parse_timestamp;
use crate::detection::TrailingRunPolicy;
use crate::error::{AnalysisError, Result};
use crate::scoring::ScoreField;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON report for machine parsing
    Json,
    /// Segment table as CSV for spreadsheet analysis
    Csv,
    /// Chart geometry as JSON (requires --activity-order)
    Chart,
}

#[derive(Parser, Debug)]
#[command(name = "dynbottle")]
#[command(version)]
#[command(
    about = "Detect dynamic bottlenecks (blockage and high load) in process event logs",
    long_about = None
)]
pub struct Cli {
    /// Event log CSV (Case, Activity, Start Timestamp, End Timestamp)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input is a case-level point log (Case, Activity, Timestamp)
    #[arg(long = "points")]
    pub points: bool,

    /// TOML analysis configuration; flags below override its values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Holiday dates, comma-separated (e.g. 2021-09-20,2021-09-21)
    #[arg(long = "holidays", value_name = "DATES")]
    pub holidays: Option<String>,

    /// Time bin length for high-load detection (default: 86400)
    #[arg(long = "bin-length", value_name = "SECONDS")]
    pub bin_length: Option<i64>,

    /// Blockage threshold on the modified z-score (default: 2.0)
    #[arg(long = "threshold", value_name = "SCORE", allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// Percentile of bin counts for high-load detection (default: 75)
    #[arg(long = "percentile", value_name = "P")]
    pub percentile: Option<f64>,

    /// Bin origin timestamp (default: earliest segment start)
    #[arg(long = "origin", value_name = "TIMESTAMP")]
    pub origin: Option<String>,

    /// Segment value to score (default: work-minutes)
    #[arg(long = "score-field", value_enum)]
    pub score_field: Option<ScoreField>,

    /// Discard anomalous runs still open at the end of a path
    #[arg(long = "drop-trailing-runs")]
    pub drop_trailing_runs: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Chart lane order, top to bottom (comma-separated activity labels)
    #[arg(long = "activity-order", value_name = "LABELS", value_delimiter = ',')]
    pub activity_order: Vec<String>,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of `config`
    pub fn apply_overrides(&self, mut config: AnalysisConfig) -> Result<AnalysisConfig> {
        if let Some(ref list) = self.holidays {
            config.holidays = HolidaySet::parse_list(list)?.iter().copied().collect();
        }
        if let Some(bin_length) = self.bin_length {
            config.bin_length_seconds = bin_length;
        }
        if let Some(threshold) = self.threshold {
            config.blockage_threshold = threshold;
        }
        if let Some(percentile) = self.percentile {
            config.highload_percentile = percentile;
        }
        if let Some(ref origin) = self.origin {
            config.time_origin = Some(parse_timestamp(origin).ok_or_else(|| {
                AnalysisError::InvalidConfig(format!("invalid origin timestamp '{}'", origin))
            })?);
        }
        if let Some(field) = self.score_field {
            config.score_field = field;
        }
        if self.drop_trailing_runs {
            config.trailing_run = TrailingRunPolicy::Drop;
        }

        config.validate()?;
        Ok(config)
    }
}
