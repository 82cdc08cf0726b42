//! Plot-ready geometry for the bottleneck timeline chart
//!
//! Nothing is rendered here. The model places activity labels on lanes
//! (index 0 at the top of the caller's ordering), draws one flow line per
//! segment between its source and target lanes, and shades one region per
//! blockage or high-load group on the lane of the path's target label.

use crate::detection::{time_span, BlockageMap, HighLoadMap};
use crate::error::{AnalysisError, Result};
use crate::segment::{PathKey, SegmentDataset};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Extra room after the last timestamp, as a fraction of the full span
const AXIS_PADDING: f64 = 0.05;

/// One segment drawn as a line from (start, source lane) to (end, target lane)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLine {
    pub segment: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub source_lane: usize,
    pub target_lane: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Blockage,
    HighLoad,
}

/// Shaded rectangle covering a detected group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    pub path: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Lower edge; the region is one lane tall
    pub lane: usize,
}

/// Everything a renderer needs to draw the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    /// Activity labels, lane 0 first
    pub lanes: Vec<String>,
    pub axis_start: NaiveDateTime,
    pub axis_end: NaiveDateTime,
    pub lines: Vec<FlowLine>,
    pub regions: Vec<Region>,
}

impl ChartModel {
    /// Build the chart geometry
    ///
    /// # Errors
    /// `UnknownActivity` if a segment label is missing from `lane_order`,
    /// `EmptyDataset` if there are no segments to draw.
    pub fn build(
        dataset: &SegmentDataset,
        blockage: Option<&BlockageMap>,
        highload: Option<&HighLoadMap>,
        lane_order: &[String],
    ) -> Result<Self> {
        let lanes: HashMap<&str, usize> = lane_order
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();
        let lane_of = |label: &str| {
            lanes
                .get(label)
                .copied()
                .ok_or_else(|| AnalysisError::UnknownActivity(label.to_string()))
        };

        let (Some(first), Some(last)) = (dataset.min_start(), dataset.max_end()) else {
            return Err(AnalysisError::EmptyDataset);
        };
        let span_ms = (last - first).num_milliseconds() as f64;
        let axis_end =
            first + chrono::Duration::milliseconds((span_ms * (1.0 + AXIS_PADDING)) as i64);

        let lines = dataset
            .segments()
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                Ok(FlowLine {
                    segment: idx,
                    start: s.start,
                    end: s.end,
                    source_lane: lane_of(s.source())?,
                    target_lane: lane_of(s.target())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut regions = Vec::new();
        let mut shade = |kind: RegionKind, path: &PathKey, members: &[usize]| -> Result<()> {
            if let Some((start, end)) = time_span(dataset, members) {
                regions.push(Region {
                    kind,
                    path: path.to_string(),
                    start,
                    end,
                    lane: lane_of(&path.target)?,
                });
            }
            Ok(())
        };

        for (path, groups) in blockage.into_iter().flatten() {
            for group in groups {
                shade(RegionKind::Blockage, path, &group.segments)?;
            }
        }
        for (path, groups) in highload.into_iter().flatten() {
            for group in groups {
                shade(RegionKind::HighLoad, path, &group.segments)?;
            }
        }

        Ok(Self {
            lanes: lane_order.to_vec(),
            axis_start: first,
            axis_end,
            lines,
            regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{BlockageGroup, HighLoadGroup};
    use crate::segment::Segment;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 9, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn dataset() -> SegmentDataset {
        let make = |source: &str, target: &str, start: u32, end: u32| Segment {
            case_id: "1".to_string(),
            path: PathKey::new(source, target),
            start: at(start),
            end: at(end),
            raw_minutes: 0.0,
            work_minutes: 0.0,
            anomaly_score: Some(0.0),
            bin_index: Some(0),
        };
        SegmentDataset::from_segments(vec![
            make("FU Start", "FU End", 8, 10),
            make("FU End", "SW Start", 10, 12),
            make("FU Start", "FU End", 12, 18),
        ])
    }

    fn lanes() -> Vec<String> {
        ["SW Start", "FU End", "FU Start"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_lines_and_axis() {
        let chart = ChartModel::build(&dataset(), None, None, &lanes()).unwrap();
        assert_eq!(chart.lines.len(), 3);
        assert_eq!(chart.lines[0].source_lane, 2);
        assert_eq!(chart.lines[0].target_lane, 1);
        assert_eq!(chart.lines[1].target_lane, 0);
        assert_eq!(chart.axis_start, at(8));
        // 10h span + 5%
        assert_eq!(chart.axis_end, at(18) + chrono::Duration::minutes(30));
        assert!(chart.regions.is_empty());
    }

    #[test]
    fn test_regions_on_target_lane() {
        let path = PathKey::new("FU Start", "FU End");
        let mut blockage = BlockageMap::new();
        blockage.insert(path.clone(), vec![BlockageGroup { segments: vec![0, 2] }]);
        let mut highload = HighLoadMap::new();
        highload.insert(
            path,
            vec![HighLoadGroup {
                bin_index: 0,
                segments: vec![0],
                threshold: 1.0,
            }],
        );

        let chart =
            ChartModel::build(&dataset(), Some(&blockage), Some(&highload), &lanes()).unwrap();
        assert_eq!(chart.regions.len(), 2);
        assert_eq!(chart.regions[0].kind, RegionKind::Blockage);
        assert_eq!(chart.regions[0].start, at(8));
        assert_eq!(chart.regions[0].end, at(18));
        assert_eq!(chart.regions[0].lane, 1);
        assert_eq!(chart.regions[1].kind, RegionKind::HighLoad);
        assert_eq!(chart.regions[1].end, at(10));
    }

    #[test]
    fn test_unknown_label() {
        let lanes = vec!["FU Start".to_string()];
        let err = ChartModel::build(&dataset(), None, None, &lanes).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownActivity(label) if label == "FU End"));
    }

    #[test]
    fn test_empty_dataset() {
        let err = ChartModel::build(&SegmentDataset::default(), None, None, &lanes()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyDataset));
    }
}
