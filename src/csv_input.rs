//! CSV input for event logs
//!
//! Two layouts are understood, both with a header row (column order free,
//! extra columns ignored, RFC 4180 quoting):
//! - interval log: `Case, Activity, Start Timestamp, End Timestamp`
//! - case-level point log: `Case, Activity, Timestamp`

use crate::error::{AnalysisError, Result};
use crate::event::{IntervalEvent, PointEvent};
use chrono::NaiveDateTime;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp in any of the accepted layouts
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Split one CSV record into fields
///
/// Quoted fields may contain commas and doubled quotes. Embedded newlines
/// are not supported; records are one line each.
pub fn split_record(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}

/// Header-resolved column positions
struct Columns {
    indices: Vec<usize>,
}

impl Columns {
    fn resolve(header: &str, names: &[&str]) -> Result<Self> {
        let fields =
            split_record(header).map_err(|message| AnalysisError::Parse { line: 1, message })?;
        let fields: Vec<&str> = fields
            .iter()
            .map(|f| f.trim().trim_start_matches('\u{feff}'))
            .collect();

        let indices = names
            .iter()
            .map(|name| {
                fields.iter().position(|f| f == name).ok_or_else(|| AnalysisError::Parse {
                    line: 1,
                    message: format!("missing column '{}'", name),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { indices })
    }

    fn pick<'a>(&self, record: &'a [String], line: usize) -> Result<Vec<&'a str>> {
        self.indices
            .iter()
            .map(|&idx| {
                record.get(idx).map(|f| f.trim()).ok_or_else(|| AnalysisError::Parse {
                    line,
                    message: format!("expected at least {} fields, got {}", idx + 1, record.len()),
                })
            })
            .collect()
    }
}

/// Data records with their 1-based line numbers, skipping blank lines
fn records(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .skip(1)
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn timestamp_at(value: &str, line: usize) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| AnalysisError::Parse {
        line,
        message: format!("invalid timestamp '{}'", value),
    })
}

fn first_line(source: &str) -> Result<&str> {
    source.lines().next().ok_or_else(|| AnalysisError::Parse {
        line: 1,
        message: "missing header row".to_string(),
    })
}

/// Parse an interval log
///
/// Rows with an empty start or end cell are skipped: the activity has not
/// been performed (or not finished) for that case.
///
/// # Example
/// ```
/// use dynbottle::csv_input::parse_interval_csv;
///
/// let csv = "Case,Activity,Start Timestamp,End Timestamp\n\
///            1,FU,2021-09-01 09:00:00,2021-09-01 10:30:00\n\
///            1,SW,2021-09-01 11:00:00,\n";
/// let intervals = parse_interval_csv(csv).unwrap();
/// assert_eq!(intervals.len(), 1);
/// assert_eq!(intervals[0].activity, "FU");
/// ```
pub fn parse_interval_csv(source: &str) -> Result<Vec<IntervalEvent>> {
    let columns = Columns::resolve(
        first_line(source)?,
        &["Case", "Activity", "Start Timestamp", "End Timestamp"],
    )?;

    let mut intervals = Vec::new();
    let mut skipped = 0usize;

    for (line, text) in records(source) {
        let record = split_record(text).map_err(|message| AnalysisError::Parse { line, message })?;
        let fields = columns.pick(&record, line)?;
        let (case, activity, start, end) = (fields[0], fields[1], fields[2], fields[3]);

        if start.is_empty() || end.is_empty() {
            skipped += 1;
            continue;
        }

        intervals.push(IntervalEvent {
            case_id: case.to_string(),
            activity: activity.to_string(),
            start: timestamp_at(start, line)?,
            end: timestamp_at(end, line)?,
        });
    }

    if skipped > 0 {
        tracing::warn!("skipped {} incomplete activity rows", skipped);
    }
    tracing::debug!("read {} activity intervals", intervals.len());
    Ok(intervals)
}

/// Parse a case-level point log (already ordered within each case)
pub fn parse_point_csv(source: &str) -> Result<Vec<PointEvent>> {
    let columns = Columns::resolve(first_line(source)?, &["Case", "Activity", "Timestamp"])?;

    let mut points = Vec::new();
    for (line, text) in records(source) {
        let record = split_record(text).map_err(|message| AnalysisError::Parse { line, message })?;
        let fields = columns.pick(&record, line)?;
        points.push(PointEvent::new(
            fields[0],
            fields[1],
            timestamp_at(fields[2], line)?,
        ));
    }

    tracing::debug!("read {} point events", points.len());
    Ok(points)
}
