//! Robust per-path anomaly scoring (modified z-score)
//!
//! For each segment path the scorer takes the median `m` and the median
//! absolute deviation `d` of the chosen value and sets
//! `score = 0.6745 * (x - m) / d`.
//!
//! A path whose MAD is zero (all values identical, or a single segment)
//! would divide by zero. Such paths are scored deterministically instead:
//! `0.0` when `x == m`, `+inf` when `x > m` and `-inf` when `x < m`.

use crate::segment::{PathKey, Segment, SegmentDataset};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Consistency constant relating MAD to the standard deviation
pub const MAD_SCALE: f64 = 0.6745;

/// Which segment value the scorer reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    /// Business-calendar minutes (default)
    #[default]
    WorkMinutes,
    /// Wall-clock minutes
    RawMinutes,
}

impl ScoreField {
    pub fn value(&self, segment: &Segment) -> f64 {
        match self {
            ScoreField::WorkMinutes => segment.work_minutes,
            ScoreField::RawMinutes => segment.raw_minutes,
        }
    }
}

/// Location and spread of one path's scored value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSummary {
    pub path: PathKey,
    pub count: usize,
    pub median: f64,
    pub mad: f64,
    pub mean: f64,
}

impl PathSummary {
    /// True when the zero-MAD policy applies to this path
    pub fn is_degenerate(&self) -> bool {
        self.mad == 0.0
    }
}

/// Modified z-score for one value
pub fn modified_z_score(value: f64, median: f64, mad: f64) -> f64 {
    if mad == 0.0 {
        if value > median {
            f64::INFINITY
        } else if value < median {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    } else {
        MAD_SCALE * (value - median) / mad
    }
}

/// Scores every segment against the other members of its path
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustScorer {
    field: ScoreField,
}

impl RobustScorer {
    pub fn new(field: ScoreField) -> Self {
        Self { field }
    }

    /// Location/spread of every path, in path order
    pub fn summarize(&self, dataset: &SegmentDataset) -> Vec<PathSummary> {
        dataset
            .paths()
            .iter()
            .filter_map(|(path, members)| self.summarize_path(dataset, path, members))
            .collect()
    }

    fn summarize_path(
        &self,
        dataset: &SegmentDataset,
        path: &PathKey,
        members: &[usize],
    ) -> Option<PathSummary> {
        let values: Vec<f64> = members
            .iter()
            .map(|&idx| self.field.value(&dataset.segments()[idx]))
            .collect();
        let median = stats::median(&values)?;
        let mad = stats::median_absolute_deviation(&values, median)?;
        let mean = stats::mean(&values)?;

        Some(PathSummary {
            path: path.clone(),
            count: values.len(),
            median,
            mad,
            mean,
        })
    }

    /// Fill in `anomaly_score` for every segment
    ///
    /// Takes the dataset by value and hands it back scored. An empty
    /// dataset comes back unchanged.
    pub fn score(&self, mut dataset: SegmentDataset) -> SegmentDataset {
        let summaries = self.summarize(&dataset);

        let mut assignments = Vec::with_capacity(dataset.len());
        for summary in &summaries {
            if summary.is_degenerate() {
                tracing::debug!(
                    "zero MAD on path '{}' ({} segments): using degenerate score policy",
                    summary.path,
                    summary.count
                );
            }
            for &idx in dataset.path_members(&summary.path) {
                let value = self.field.value(&dataset.segments()[idx]);
                assignments.push((idx, modified_z_score(value, summary.median, summary.mad)));
            }
        }

        let segments = dataset.segments_mut();
        for (idx, score) in assignments {
            segments[idx].anomaly_score = Some(score);
        }

        tracing::debug!("scored {} paths", summaries.len());
        dataset
    }
}
