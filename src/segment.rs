//! Segment-level dataset
//!
//! A segment is the transition between two chronologically adjacent point
//! events of one case. Segments sharing the same (source, target) label pair
//! form a segment path; the path index is built once and reused by scoring,
//! binning and both detectors.

use crate::calendar::{raw_minutes, BusinessCalendar};
use crate::error::{AnalysisError, Result};
use crate::event::{group_by_case, PointEvent};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Literal (source label, target label) pair identifying a segment path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathKey {
    pub source: String,
    pub target: String,
}

impl PathKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.source, self.target)
    }
}

/// One transition between adjacent point events of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub case_id: String,
    pub path: PathKey,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Wall-clock minutes between `start` and `end`
    pub raw_minutes: f64,
    /// Business-calendar minutes between `start` and `end`
    pub work_minutes: f64,
    /// Modified z-score within the path; `None` until scored
    pub anomaly_score: Option<f64>,
    /// Time bucket relative to the analysis origin; `None` until binned
    pub bin_index: Option<i64>,
}

impl Segment {
    pub fn source(&self) -> &str {
        &self.path.source
    }

    pub fn target(&self) -> &str {
        &self.path.target
    }

    /// True when the score is defined and strictly greater than `threshold`
    ///
    /// Unscored segments never exceed; `+inf` always does.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.anomaly_score.is_some_and(|score| score > threshold)
    }
}

/// Ordered segments plus the path index shared by all downstream passes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentDataset {
    segments: Vec<Segment>,
    /// Path -> member indices ordered by start time (ties keep build order)
    paths: BTreeMap<PathKey, Vec<usize>>,
}

impl SegmentDataset {
    /// Build a dataset from finished segments and index it by path
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut paths: BTreeMap<PathKey, Vec<usize>> = BTreeMap::new();
        for (idx, segment) in segments.iter().enumerate() {
            paths.entry(segment.path.clone()).or_default().push(idx);
        }
        for members in paths.values_mut() {
            members.sort_by_key(|&idx| segments[idx].start);
        }
        Self { segments, paths }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, idx: usize) -> Option<&Segment> {
        self.segments.get(idx)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path index: every path with its members ordered by start time
    pub fn paths(&self) -> &BTreeMap<PathKey, Vec<usize>> {
        &self.paths
    }

    /// Members of one path ordered by start time
    pub fn path_members(&self, path: &PathKey) -> &[usize] {
        self.paths.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Earliest segment start, if any
    pub fn min_start(&self) -> Option<NaiveDateTime> {
        self.segments.iter().map(|s| s.start).min()
    }

    /// Latest segment end, if any
    pub fn max_end(&self) -> Option<NaiveDateTime> {
        self.segments.iter().map(|s| s.end).max()
    }

    /// Mutable access for the scoring and binning stages
    ///
    /// Paths and timestamps are fixed once built; stages only fill in
    /// `anomaly_score` and `bin_index`.
    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }
}

/// Turns per-case point events into segments
#[derive(Debug, Clone, Default)]
pub struct SegmentBuilder {
    calendar: BusinessCalendar,
}

impl SegmentBuilder {
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }

    /// Emit one segment per consecutive pair of points in every case
    ///
    /// `events` must be chronologically ordered within each case; cases may
    /// be interleaved and are grouped in first-appearance order. A case with
    /// fewer than two points contributes nothing.
    ///
    /// # Errors
    /// `EmptyCase` when `events` is empty, `InvalidInterval` when a case is
    /// not chronologically ordered.
    pub fn build(&self, events: &[PointEvent]) -> Result<SegmentDataset> {
        if events.is_empty() {
            return Err(AnalysisError::EmptyCase);
        }

        let cases = group_by_case(events, |e| e.case_id.as_str());
        let mut segments = Vec::with_capacity(events.len().saturating_sub(cases.len()));

        for (case_id, points) in &cases {
            for pair in points.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                let work_minutes = self.calendar.work_minutes(from.timestamp, to.timestamp)?;
                segments.push(Segment {
                    case_id: case_id.clone(),
                    path: PathKey::new(from.label.clone(), to.label.clone()),
                    start: from.timestamp,
                    end: to.timestamp,
                    raw_minutes: raw_minutes(from.timestamp, to.timestamp),
                    work_minutes,
                    anomaly_score: None,
                    bin_index: None,
                });
            }
        }

        let dataset = SegmentDataset::from_segments(segments);
        tracing::debug!(
            "built {} segments over {} paths from {} cases",
            dataset.len(),
            dataset.paths().len(),
            cases.len()
        );
        Ok(dataset)
    }
}
