// High-load detection: bins holding more segments than a percentile of the
// path's bin-count distribution

use crate::error::{AnalysisError, Result};
use crate::segment::{PathKey, SegmentDataset};
use crate::stats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Default percentile of the bin-count distribution
pub const DEFAULT_PERCENTILE: f64 = 75.0;

/// High-load groups keyed by segment path (paths without groups are absent)
pub type HighLoadMap = BTreeMap<PathKey, Vec<HighLoadGroup>>;

/// All segments of one path that fall into a flagged bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighLoadGroup {
    pub bin_index: i64,
    /// Segment indices ordered by start time
    pub segments: Vec<usize>,
    /// Percentile of the path's bin counts the bin was compared against
    pub threshold: f64,
}

impl HighLoadGroup {
    pub fn count(&self) -> usize {
        self.segments.len()
    }
}

/// Flags bins whose segment count strictly exceeds a percentile
#[derive(Debug, Clone, Copy)]
pub struct HighLoadDetector {
    percentile: f64,
}

impl Default for HighLoadDetector {
    fn default() -> Self {
        Self {
            percentile: DEFAULT_PERCENTILE,
        }
    }
}

impl HighLoadDetector {
    /// # Errors
    /// `InvalidConfig` if `percentile` is outside `[0, 100]`
    pub fn new(percentile: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&percentile) {
            return Err(AnalysisError::InvalidConfig(format!(
                "percentile must be in [0, 100], got {}",
                percentile
            )));
        }
        Ok(Self { percentile })
    }

    /// High-load groups of every path
    ///
    /// Empty bins are absent from the distribution rather than counted as
    /// zero, so a path occupying a single bin never flags anything.
    /// Segments without a bin are ignored.
    pub fn detect(&self, dataset: &SegmentDataset) -> HighLoadMap {
        let mut groups = HighLoadMap::new();

        for (path, members) in dataset.paths() {
            let flagged = self.scan(dataset, members);
            if !flagged.is_empty() {
                tracing::debug!("path '{}': {} high-load bins", path, flagged.len());
                groups.insert(path.clone(), flagged);
            }
        }

        groups
    }

    fn scan(&self, dataset: &SegmentDataset, members: &[usize]) -> Vec<HighLoadGroup> {
        let mut bins: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for &idx in members {
            if let Some(bin) = dataset.segments()[idx].bin_index {
                bins.entry(bin).or_default().push(idx);
            }
        }

        let counts: Vec<f64> = bins.values().map(|m| m.len() as f64).collect();
        let Some(threshold) = stats::percentile(&counts, self.percentile) else {
            return Vec::new();
        };

        bins.into_iter()
            .filter(|(_, segments)| segments.len() as f64 > threshold)
            .map(|(bin_index, segments)| HighLoadGroup {
                bin_index,
                segments,
                threshold,
            })
            .collect()
    }
}
