//! Order statistics shared by the scorer and the high-load detector
//!
//! Percentiles use linear interpolation between closest ranks (the R-7 /
//! numpy default), so `percentile(v, 50.0)` is the usual median.

use std::cmp::Ordering;

/// Sort a copy of `values` ascending (NaN sorts as equal)
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut data = values.to_vec();
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    data
}

/// Calculate percentile from sorted data
///
/// Returns `None` for empty input. `percentile` is clamped to `[0, 100]`.
pub fn percentile_sorted(sorted_data: &[f64], percentile: f64) -> Option<f64> {
    if sorted_data.is_empty() {
        return None;
    }
    if sorted_data.len() == 1 {
        return Some(sorted_data[0]);
    }

    let index = (percentile.clamp(0.0, 100.0) / 100.0) * (sorted_data.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        Some(sorted_data[lower])
    } else {
        // a + (b - a) * w stays exact when a == b
        let weight = index - lower as f64;
        Some(sorted_data[lower] + (sorted_data[upper] - sorted_data[lower]) * weight)
    }
}

/// Percentile of unsorted data
pub fn percentile(values: &[f64], percentile: f64) -> Option<f64> {
    percentile_sorted(&sorted(values), percentile)
}

/// Median of unsorted data
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// Median absolute deviation around `center`
pub fn median_absolute_deviation(values: &[f64], center: f64) -> Option<f64> {
    let deviations: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();
    median(&deviations)
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
