// Dynamic bottleneck detection over a scored, binned segment dataset
//
// Two kinds of bottleneck are reported per segment path:
// - Blockage: a run of consecutive (by start time) segments whose anomaly
//   score exceeds a threshold, i.e. the transition was abnormally slow for
//   several cases in a row.
// - High load: a time bin holding abnormally many segments of the path,
//   compared against a percentile of the path's own bin counts.
//
// Both detectors only read the dataset and return groups of segment indices.

mod blockage;
mod highload;

pub use blockage::{BlockageDetector, BlockageGroup, BlockageMap, TrailingRunPolicy};
pub use highload::{HighLoadDetector, HighLoadGroup, HighLoadMap, DEFAULT_PERCENTILE};

use crate::segment::SegmentDataset;
use chrono::NaiveDateTime;

/// Earliest start and latest end over a set of segment indices
pub fn time_span(
    dataset: &SegmentDataset,
    members: &[usize],
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let segments = members.iter().filter_map(|&idx| dataset.get(idx));
    let (starts, ends): (Vec<_>, Vec<_>) = segments.map(|s| (s.start, s.end)).unzip();
    Some((starts.into_iter().min()?, ends.into_iter().max()?))
}
