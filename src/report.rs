//! Human-readable text report

use crate::detection::time_span;
use crate::engine::AnalysisReport;
use crate::segment::SegmentDataset;

fn span_text(dataset: &SegmentDataset, members: &[usize]) -> String {
    match time_span(dataset, members) {
        Some((start, end)) => format!(
            "{} → {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        ),
        None => "-".to_string(),
    }
}

fn case_list(dataset: &SegmentDataset, members: &[usize]) -> String {
    members
        .iter()
        .filter_map(|&idx| dataset.get(idx))
        .map(|s| s.case_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format the analysis as a plain-text report
pub fn to_report_string(report: &AnalysisReport) -> String {
    let dataset = &report.dataset;
    let mut out = String::new();

    out.push_str("=== Dynamic Bottlenecks: Blockage & High Load ===\n");
    out.push_str(&format!(
        "Segments: {}  Paths: {}  Threshold: {}  Percentile: {}  Bin: {}s\n\n",
        dataset.len(),
        dataset.paths().len(),
        report.config.blockage_threshold,
        report.config.highload_percentile,
        report.config.bin_length_seconds
    ));

    out.push_str(&format!("Blockage ({} groups):\n", report.blockage_group_count()));
    if report.blockage.is_empty() {
        out.push_str("  none\n");
    }
    for (path, groups) in &report.blockage {
        out.push_str(&format!("  {}\n", path));
        for group in groups {
            out.push_str(&format!(
                "    {} segments  {}  cases: {}\n",
                group.len(),
                span_text(dataset, &group.segments),
                case_list(dataset, &group.segments)
            ));
        }
    }
    out.push('\n');

    out.push_str(&format!("High load ({} groups):\n", report.highload_group_count()));
    if report.highload.is_empty() {
        out.push_str("  none\n");
    }
    for (path, groups) in &report.highload {
        out.push_str(&format!("  {}\n", path));
        for group in groups {
            out.push_str(&format!(
                "    bin {}: {} segments (> {:.2})  {}\n",
                group.bin_index,
                group.count(),
                group.threshold,
                span_text(dataset, &group.segments)
            ));
        }
    }

    out
}
