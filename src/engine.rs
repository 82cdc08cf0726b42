//! Bottleneck analysis pipeline
//!
//! Stages run strictly in order: build segments → score → bin → detect.
//! Each stage takes the dataset by value and hands it back, so exactly one
//! stage owns it at a time.

use crate::binning::Binner;
use crate::calendar::BusinessCalendar;
use crate::config::AnalysisConfig;
use crate::detection::{BlockageDetector, BlockageMap, HighLoadDetector, HighLoadMap};
use crate::error::{AnalysisError, Result};
use crate::event::PointEvent;
use crate::scoring::{PathSummary, RobustScorer};
use crate::segment::{SegmentBuilder, SegmentDataset};

/// Everything one analysis run produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub dataset: SegmentDataset,
    pub summaries: Vec<PathSummary>,
    pub blockage: BlockageMap,
    pub highload: HighLoadMap,
}

impl AnalysisReport {
    pub fn blockage_group_count(&self) -> usize {
        self.blockage.values().map(Vec::len).sum()
    }

    pub fn highload_group_count(&self) -> usize {
        self.highload.values().map(Vec::len).sum()
    }
}

/// Orchestrates the pipeline and holds the resulting dataset
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use dynbottle::config::AnalysisConfig;
/// use dynbottle::engine::BottleneckEngine;
/// use dynbottle::event::PointEvent;
///
/// let day = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
/// let events = vec![
///     PointEvent::new("1", "FU Start", day.and_hms_opt(9, 0, 0).unwrap()),
///     PointEvent::new("1", "FU End", day.and_hms_opt(11, 0, 0).unwrap()),
/// ];
///
/// let mut engine = BottleneckEngine::new(AnalysisConfig::default()).unwrap();
/// let dataset = engine.transform(&events).unwrap();
/// assert_eq!(dataset.len(), 1);
/// assert_eq!(dataset.segments()[0].work_minutes, 120.0);
/// ```
#[derive(Debug)]
pub struct BottleneckEngine {
    config: AnalysisConfig,
    builder: SegmentBuilder,
    scorer: RobustScorer,
    binner: Binner,
    blockage: BlockageDetector,
    highload: HighLoadDetector,
    dataset: Option<SegmentDataset>,
}

impl BottleneckEngine {
    /// Validate `config` and set up every stage
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let calendar = BusinessCalendar::new(config.holiday_set());
        let binner = Binner::new(config.bin_length_seconds, config.time_origin)?;
        let highload = HighLoadDetector::new(config.highload_percentile)?;
        let blockage = BlockageDetector::new(config.blockage_threshold)
            .with_trailing_policy(config.trailing_run);

        Ok(Self {
            builder: SegmentBuilder::new(calendar),
            scorer: RobustScorer::new(config.score_field),
            binner,
            blockage,
            highload,
            dataset: None,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Dataset of the last `transform`, if any
    pub fn dataset(&self) -> Option<&SegmentDataset> {
        self.dataset.as_ref()
    }

    /// Build, score and bin segments; replaces any previous dataset
    ///
    /// A failed build leaves the engine without a dataset.
    pub fn transform(&mut self, events: &[PointEvent]) -> Result<&SegmentDataset> {
        self.dataset = None;
        let dataset = self.builder.build(events)?;
        let dataset = self.scorer.score(dataset);
        let dataset = self.binner.assign_bins(dataset);

        tracing::info!(
            "transformed {} point events into {} segments ({} paths)",
            events.len(),
            dataset.len(),
            dataset.paths().len()
        );
        Ok(&*self.dataset.insert(dataset))
    }

    /// Blockage groups on the held dataset
    pub fn detect_blockage(&self) -> Result<BlockageMap> {
        let groups = self.blockage.detect(self.require_dataset()?);
        tracing::info!("blockage: {} paths flagged", groups.len());
        Ok(groups)
    }

    /// High-load groups on the held dataset
    pub fn detect_high_load(&self) -> Result<HighLoadMap> {
        let groups = self.highload.detect(self.require_dataset()?);
        tracing::info!("high load: {} paths flagged", groups.len());
        Ok(groups)
    }

    /// Per-path location/spread of the scored value
    pub fn summaries(&self) -> Result<Vec<PathSummary>> {
        Ok(self.scorer.summarize(self.require_dataset()?))
    }

    /// Run the full pipeline and collect every output
    pub fn analyze(&mut self, events: &[PointEvent]) -> Result<AnalysisReport> {
        self.transform(events)?;
        let blockage = self.detect_blockage()?;
        let highload = self.detect_high_load()?;
        let summaries = self.summaries()?;
        let dataset = self.require_dataset()?.clone();

        Ok(AnalysisReport {
            config: self.config.clone(),
            dataset,
            summaries,
            blockage,
            highload,
        })
    }

    fn require_dataset(&self) -> Result<&SegmentDataset> {
        self.dataset.as_ref().ok_or(AnalysisError::EmptyDataset)
    }
}
