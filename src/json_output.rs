//! JSON output format for analysis results

use crate::config::AnalysisConfig;
use crate::detection::time_span;
use crate::engine::AnalysisReport;
use crate::segment::{PathKey, SegmentDataset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location/spread of one segment path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPathSummary {
    /// `"<source> - <target>"`
    pub path: String,
    pub source: String,
    pub target: String,
    pub count: usize,
    pub median: f64,
    pub mad: f64,
    pub mean: f64,
}

/// A detected blockage group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBlockageGroup {
    pub path: String,
    /// Segment indices (rows of the segment table)
    pub segments: Vec<usize>,
    pub cases: Vec<String>,
    pub start: String,
    pub end: String,
    /// Highest score in the run; `"inf"` under the zero-MAD policy
    pub max_score: Value,
}

/// A detected high-load bin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonHighLoadGroup {
    pub path: String,
    pub bin_index: i64,
    pub count: usize,
    /// Percentile of the path's bin counts that `count` exceeded
    pub threshold: f64,
    pub segments: Vec<usize>,
    pub cases: Vec<String>,
    pub start: String,
    pub end: String,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub config: AnalysisConfig,
    pub total_segments: usize,
    pub total_paths: usize,
    pub paths: Vec<JsonPathSummary>,
    pub blockage: Vec<JsonBlockageGroup>,
    pub highload: Vec<JsonHighLoadGroup>,
}

/// JSON number for finite scores, `"inf"`/`"-inf"`/`"nan"` otherwise
pub fn score_value(score: f64) -> Value {
    serde_json::Number::from_f64(score)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(score.to_string()))
}

fn cases_of(dataset: &SegmentDataset, members: &[usize]) -> Vec<String> {
    members
        .iter()
        .filter_map(|&idx| dataset.get(idx))
        .map(|s| s.case_id.clone())
        .collect()
}

fn span_strings(dataset: &SegmentDataset, members: &[usize]) -> (String, String) {
    time_span(dataset, members)
        .map(|(start, end)| (start.to_string(), end.to_string()))
        .unwrap_or_default()
}

fn path_string(path: &PathKey) -> String {
    path.to_string()
}

impl JsonReport {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let dataset = &report.dataset;

        let paths = report
            .summaries
            .iter()
            .map(|s| JsonPathSummary {
                path: path_string(&s.path),
                source: s.path.source.clone(),
                target: s.path.target.clone(),
                count: s.count,
                median: s.median,
                mad: s.mad,
                mean: s.mean,
            })
            .collect();

        let blockage = report
            .blockage
            .iter()
            .flat_map(|(path, groups)| groups.iter().map(move |g| (path, g)))
            .map(|(path, group)| {
                let (start, end) = span_strings(dataset, &group.segments);
                let max_score = group
                    .segments
                    .iter()
                    .filter_map(|&idx| dataset.get(idx).and_then(|s| s.anomaly_score))
                    .fold(f64::NEG_INFINITY, f64::max);
                JsonBlockageGroup {
                    path: path_string(path),
                    segments: group.segments.clone(),
                    cases: cases_of(dataset, &group.segments),
                    start,
                    end,
                    max_score: score_value(max_score),
                }
            })
            .collect();

        let highload = report
            .highload
            .iter()
            .flat_map(|(path, groups)| groups.iter().map(move |g| (path, g)))
            .map(|(path, group)| {
                let (start, end) = span_strings(dataset, &group.segments);
                JsonHighLoadGroup {
                    path: path_string(path),
                    bin_index: group.bin_index,
                    count: group.count(),
                    threshold: group.threshold,
                    segments: group.segments.clone(),
                    cases: cases_of(dataset, &group.segments),
                    start,
                    end,
                }
            })
            .collect();

        Self {
            config: report.config.clone(),
            total_segments: dataset.len(),
            total_paths: dataset.paths().len(),
            paths,
            blockage,
            highload,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
