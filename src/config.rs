//! Analysis configuration
//!
//! Every knob is an explicit parameter carried by `AnalysisConfig`; nothing
//! is global. The struct can be built in code or loaded from TOML:
//!
//! ```toml
//! holidays = ["2021-09-20", "2021-09-21"]
//! bin_length_seconds = 86400
//! blockage_threshold = 2.0
//! highload_percentile = 75.0
//! time_origin = "2021-09-01T00:00:00"
//! score_field = "work_minutes"
//! trailing_run = "flush"
//! ```

use crate::binning::MAX_BIN_LENGTH_SECONDS;
use crate::calendar::HolidaySet;
use crate::detection::{TrailingRunPolicy, DEFAULT_PERCENTILE};
use crate::error::{AnalysisError, Result};
use crate::scoring::ScoreField;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One day, the bin length used for daily load analysis
pub const DEFAULT_BIN_LENGTH_SECONDS: i64 = 86_400;

/// Modified z-score above which a segment counts as anomalous
pub const DEFAULT_BLOCKAGE_THRESHOLD: f64 = 2.0;

/// Configuration for one bottleneck analysis run
///
/// # Example
/// ```
/// use dynbottle::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.bin_length_seconds, 86_400);
/// assert_eq!(config.highload_percentile, 75.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Non-working dates in addition to weekends
    pub holidays: Vec<NaiveDate>,

    /// Width of a high-load time bin
    pub bin_length_seconds: i64,

    /// Blockage threshold on the modified z-score (strict `>`)
    pub blockage_threshold: f64,

    /// Percentile of the per-path bin-count distribution (0-100)
    pub highload_percentile: f64,

    /// Bin origin; defaults to the earliest segment start
    pub time_origin: Option<NaiveDateTime>,

    /// Segment value fed to the robust scorer
    pub score_field: ScoreField,

    /// Handling of an anomalous run still open at the end of a path
    pub trailing_run: TrailingRunPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            holidays: Vec::new(),
            bin_length_seconds: DEFAULT_BIN_LENGTH_SECONDS,
            blockage_threshold: DEFAULT_BLOCKAGE_THRESHOLD,
            highload_percentile: DEFAULT_PERCENTILE,
            time_origin: None,
            score_field: ScoreField::default(),
            trailing_run: TrailingRunPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| AnalysisError::InvalidConfig(format!("invalid TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Holiday dates as a calendar set
    pub fn holiday_set(&self) -> HolidaySet {
        self.holidays.iter().copied().collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_BIN_LENGTH_SECONDS).contains(&self.bin_length_seconds) {
            return Err(AnalysisError::InvalidConfig(format!(
                "bin_length_seconds must be in 1..={}, got {}",
                MAX_BIN_LENGTH_SECONDS, self.bin_length_seconds
            )));
        }

        if !(0.0..=100.0).contains(&self.highload_percentile) {
            return Err(AnalysisError::InvalidConfig(format!(
                "highload_percentile must be in [0, 100], got {}",
                self.highload_percentile
            )));
        }

        if self.blockage_threshold.is_nan() {
            return Err(AnalysisError::InvalidConfig(
                "blockage_threshold must be a number".to_string(),
            ));
        }

        Ok(())
    }
}
