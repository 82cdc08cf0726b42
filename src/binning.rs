//! Time bucketing of segments
//!
//! `bin_index = floor((start - origin) / bin_length)`. Segments starting
//! before the origin get negative bins.

use crate::error::{AnalysisError, Result};
use crate::segment::SegmentDataset;
use chrono::NaiveDateTime;

/// Longest bin whose length still fits in `i64` milliseconds
pub const MAX_BIN_LENGTH_SECONDS: i64 = i64::MAX / 1000;

/// Assigns each segment a discrete time bucket relative to an origin
#[derive(Debug, Clone, Copy)]
pub struct Binner {
    bin_length_seconds: i64,
    origin: Option<NaiveDateTime>,
}

impl Binner {
    /// # Errors
    /// `InvalidConfig` if `bin_length_seconds` is not positive or exceeds
    /// `MAX_BIN_LENGTH_SECONDS`
    pub fn new(bin_length_seconds: i64, origin: Option<NaiveDateTime>) -> Result<Self> {
        if !(1..=MAX_BIN_LENGTH_SECONDS).contains(&bin_length_seconds) {
            return Err(AnalysisError::InvalidConfig(format!(
                "bin length must be in 1..={} seconds, got {}",
                MAX_BIN_LENGTH_SECONDS, bin_length_seconds
            )));
        }
        Ok(Self {
            bin_length_seconds,
            origin,
        })
    }

    /// Bin of a single instant
    pub fn bin_of(&self, origin: NaiveDateTime, ts: NaiveDateTime) -> i64 {
        let elapsed_ms = (ts - origin).num_milliseconds();
        elapsed_ms.div_euclid(self.bin_length_seconds * 1000)
    }

    /// Fill in `bin_index` for every segment
    ///
    /// The origin defaults to the earliest segment start. An empty dataset
    /// comes back unchanged.
    pub fn assign_bins(&self, mut dataset: SegmentDataset) -> SegmentDataset {
        let Some(origin) = self.origin.or_else(|| dataset.min_start()) else {
            return dataset;
        };

        for segment in dataset.segments_mut() {
            segment.bin_index = Some(self.bin_of(origin, segment.start));
        }

        tracing::debug!(
            "binned {} segments from origin {} with {}s bins",
            dataset.len(),
            origin,
            self.bin_length_seconds
        );
        dataset
    }
}
