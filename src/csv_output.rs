//! CSV output for the segment dataset
//!
//! One row per segment, in dataset order, for spreadsheet analysis.

use crate::segment::{Segment, SegmentDataset};
use chrono::NaiveDateTime;

/// Column headers of the segment table
pub const SEGMENT_HEADERS: &[&str] = &[
    "Case",
    "Source",
    "Target",
    "Start Timestamp",
    "End Timestamp",
    "Timedelta (minutes)",
    "Worktime (minutes)",
    "Segment Path",
    "MZ Score",
    "Bin",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV output formatter for a segment dataset
#[derive(Debug)]
pub struct SegmentCsv<'a> {
    dataset: &'a SegmentDataset,
}

impl<'a> SegmentCsv<'a> {
    pub fn new(dataset: &'a SegmentDataset) -> Self {
        Self { dataset }
    }

    fn header() -> String {
        SEGMENT_HEADERS.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        // If field contains comma, quote, or newline, wrap in quotes and escape quotes
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Scores print `inf`/`-inf` when the zero-MAD policy applied
    fn format_score(score: Option<f64>) -> String {
        match score {
            Some(s) if s == f64::INFINITY => "inf".to_string(),
            Some(s) if s == f64::NEG_INFINITY => "-inf".to_string(),
            Some(s) => s.to_string(),
            None => String::new(),
        }
    }

    fn format_segment(segment: &Segment) -> String {
        let fields = [
            Self::escape_field(&segment.case_id),
            Self::escape_field(segment.source()),
            Self::escape_field(segment.target()),
            Self::format_timestamp(&segment.start),
            Self::format_timestamp(&segment.end),
            segment.raw_minutes.to_string(),
            segment.work_minutes.to_string(),
            Self::escape_field(&segment.path.to_string()),
            Self::format_score(segment.anomaly_score),
            segment.bin_index.map(|b| b.to_string()).unwrap_or_default(),
        ];
        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&Self::header());
        output.push('\n');

        for segment in self.dataset.segments() {
            output.push_str(&Self::format_segment(segment));
            output.push('\n');
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::PathKey;
    use chrono::NaiveDate;

    fn segment(case_id: &str, source: &str, score: Option<f64>, bin: Option<i64>) -> Segment {
        let day = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        Segment {
            case_id: case_id.to_string(),
            path: PathKey::new(source, "SW Start"),
            start: day.and_hms_opt(9, 0, 0).unwrap(),
            end: day.and_hms_opt(10, 30, 0).unwrap(),
            raw_minutes: 90.0,
            work_minutes: 90.0,
            anomaly_score: score,
            bin_index: bin,
        }
    }

    #[test]
    fn test_header_row() {
        let dataset = SegmentDataset::default();
        let csv = SegmentCsv::new(&dataset).to_csv();
        assert_eq!(
            csv,
            "Case,Source,Target,Start Timestamp,End Timestamp,Timedelta (minutes),\
             Worktime (minutes),Segment Path,MZ Score,Bin\n"
        );
    }

    #[test]
    fn test_segment_row() {
        let dataset =
            SegmentDataset::from_segments(vec![segment("7", "FU End", Some(1.5), Some(3))]);
        let csv = SegmentCsv::new(&dataset).to_csv();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "7,FU End,SW Start,2021-09-01 09:00:00,2021-09-01 10:30:00,90,90,\
             FU End - SW Start,1.5,3"
        );
    }

    #[test]
    fn test_unscored_and_infinite_cells() {
        let dataset = SegmentDataset::from_segments(vec![
            segment("1", "A", None, None),
            segment("2", "A", Some(f64::INFINITY), Some(0)),
            segment("3", "A", Some(f64::NEG_INFINITY), Some(0)),
        ]);
        let csv = SegmentCsv::new(&dataset).to_csv();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].ends_with(",A - SW Start,,"));
        assert!(rows[1].ends_with(",inf,0"));
        assert!(rows[2].ends_with(",-inf,0"));
    }

    #[test]
    fn test_escaping() {
        let dataset = SegmentDataset::from_segments(vec![segment(
            "case \"x\"",
            "Weld, final",
            None,
            None,
        )]);
        let csv = SegmentCsv::new(&dataset).to_csv();
        assert!(csv.contains("\"case \"\"x\"\"\""));
        assert!(csv.contains("\"Weld, final\""));
        assert!(csv.contains("\"Weld, final - SW Start\""));
    }
}
