//! Case-level input records
//!
//! An event log arrives as activity intervals (`IntervalEvent`). The segment
//! builder works on point events: every interval contributes a
//! `"<activity> Start"` and a `"<activity> End"` point.

use crate::error::{AnalysisError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Suffix appended to an activity name for its start point
pub const START_SUFFIX: &str = "Start";

/// Suffix appended to an activity name for its end point
pub const END_SUFFIX: &str = "End";

/// One timestamped activity interval of a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalEvent {
    pub case_id: String,
    pub activity: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A single labelled instant within a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    pub case_id: String,
    /// Activity name plus `Start`/`End` suffix, e.g. `"SW End"`
    pub label: String,
    pub timestamp: NaiveDateTime,
}

impl PointEvent {
    pub fn new(
        case_id: impl Into<String>,
        label: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            label: label.into(),
            timestamp,
        }
    }
}

/// Label for an activity start point
pub fn start_label(activity: &str) -> String {
    format!("{} {}", activity, START_SUFFIX)
}

/// Label for an activity end point
pub fn end_label(activity: &str) -> String {
    format!("{} {}", activity, END_SUFFIX)
}

/// Group records by case id, keeping cases in first-appearance order
///
/// Records of one case keep their relative order even when cases are
/// interleaved in the input.
pub fn group_by_case<T, F>(records: &[T], case_of: F) -> Vec<(String, Vec<&T>)>
where
    F: Fn(&T) -> &str,
{
    let mut order: Vec<(String, Vec<&T>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let case = case_of(record);
        let slot = match index.get(case) {
            Some(&slot) => slot,
            None => {
                index.insert(case.to_string(), order.len());
                order.push((case.to_string(), Vec::new()));
                order.len() - 1
            }
        };
        order[slot].1.push(record);
    }

    order
}

/// Expand activity intervals into chronologically ordered point events
///
/// Each case's points are stable-sorted by timestamp, so ties keep input
/// order and an interval's start point always precedes its end point.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use dynbottle::event::{point_events_from_intervals, IntervalEvent};
///
/// let day = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
/// let intervals = vec![IntervalEvent {
///     case_id: "1".to_string(),
///     activity: "FU".to_string(),
///     start: day.and_hms_opt(9, 0, 0).unwrap(),
///     end: day.and_hms_opt(10, 0, 0).unwrap(),
/// }];
///
/// let points = point_events_from_intervals(&intervals).unwrap();
/// assert_eq!(points[0].label, "FU Start");
/// assert_eq!(points[1].label, "FU End");
/// ```
pub fn point_events_from_intervals(intervals: &[IntervalEvent]) -> Result<Vec<PointEvent>> {
    let mut points = Vec::with_capacity(intervals.len() * 2);

    for (case_id, case_intervals) in group_by_case(intervals, |i| i.case_id.as_str()) {
        let mut case_points = Vec::with_capacity(case_intervals.len() * 2);
        for interval in case_intervals {
            if interval.start > interval.end {
                return Err(AnalysisError::InvalidInterval {
                    from: interval.start,
                    to: interval.end,
                });
            }
            case_points.push(PointEvent::new(
                case_id.clone(),
                start_label(&interval.activity),
                interval.start,
            ));
            case_points.push(PointEvent::new(
                case_id.clone(),
                end_label(&interval.activity),
                interval.end,
            ));
        }
        // Vec::sort_by_key is stable
        case_points.sort_by_key(|p| p.timestamp);
        points.extend(case_points);
    }

    Ok(points)
}
