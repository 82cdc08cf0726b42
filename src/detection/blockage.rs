// Blockage detection: maximal runs of anomalous segments per path

use crate::segment::{PathKey, SegmentDataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Blockage groups keyed by segment path (paths without groups are absent)
pub type BlockageMap = BTreeMap<PathKey, Vec<BlockageGroup>>;

/// What to do with an anomalous run still open when a path ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingRunPolicy {
    /// Report it like any other run (length >= 2)
    #[default]
    Flush,
    /// Discard it; only runs closed by a non-anomalous segment count
    Drop,
}

/// Consecutive same-path segments that all exceed the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockageGroup {
    /// Segment indices ordered by start time; always at least two
    pub segments: Vec<usize>,
}

impl BlockageGroup {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Scans each path in start order and extracts anomalous runs
#[derive(Debug, Clone, Copy)]
pub struct BlockageDetector {
    threshold: f64,
    trailing: TrailingRunPolicy,
}

impl BlockageDetector {
    /// `threshold` is compared with strict greater-than
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            trailing: TrailingRunPolicy::default(),
        }
    }

    pub fn with_trailing_policy(mut self, trailing: TrailingRunPolicy) -> Self {
        self.trailing = trailing;
        self
    }

    /// Blockage groups of every path
    ///
    /// Unscored segments never exceed the threshold; `+inf` scores always do.
    pub fn detect(&self, dataset: &SegmentDataset) -> BlockageMap {
        let mut groups = BlockageMap::new();

        for (path, members) in dataset.paths() {
            let runs = self.scan(dataset, members);
            if !runs.is_empty() {
                tracing::debug!("path '{}': {} blockage groups", path, runs.len());
                groups.insert(path.clone(), runs);
            }
        }

        groups
    }

    fn scan(&self, dataset: &SegmentDataset, members: &[usize]) -> Vec<BlockageGroup> {
        let mut runs = Vec::new();
        let mut current: Vec<usize> = Vec::new();

        for &idx in members {
            if dataset.segments()[idx].exceeds(self.threshold) {
                current.push(idx);
            } else {
                close_run(&mut runs, &mut current);
            }
        }

        match self.trailing {
            TrailingRunPolicy::Flush => close_run(&mut runs, &mut current),
            TrailingRunPolicy::Drop => current.clear(),
        }

        runs
    }
}

fn close_run(runs: &mut Vec<BlockageGroup>, current: &mut Vec<usize>) {
    if current.len() >= 2 {
        runs.push(BlockageGroup {
            segments: std::mem::take(current),
        });
    } else {
        current.clear();
    }
}
