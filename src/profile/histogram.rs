//! Equal-width histogram over a numeric column's `[min, max]` range.

use serde::Serialize;

use crate::sanitize::{metric, round2};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub label: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub midpoint: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub total_values: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Histogram {
    pub fn empty() -> Self {
        Self {
            bins: Vec::new(),
            total_values: 0,
            min: None,
            max: None,
        }
    }

    pub fn bin_total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramError {
    ZeroBins,
    NonFiniteRange,
}

impl HistogramError {
    pub fn message(&self) -> &'static str {
        match self {
            HistogramError::ZeroBins => "histogram needs at least one bin",
            HistogramError::NonFiniteRange => "histogram range is not finite",
        }
    }
}

/// Bin `sorted` (ascending, finite) into `bin_count` equal-width bins.
///
/// The last bin is closed on the right so the maximum lands inside it. A
/// constant column spans `value ± 0.5`, widened for magnitudes where half a
/// unit is below float resolution. A range too narrow to split at that
/// magnitude becomes a single bin.
pub fn build(sorted: &[f64], bin_count: usize) -> Result<Histogram, HistogramError> {
    if bin_count == 0 {
        return Err(HistogramError::ZeroBins);
    }
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Ok(Histogram::empty());
    };
    let (start, end) = if min == max {
        let half = 0.5f64.max(min.abs() * f64::EPSILON * bin_count as f64);
        (min - half, max + half)
    } else {
        (min, max)
    };
    let span = end - start;
    if !span.is_finite() {
        return Err(HistogramError::NonFiniteRange);
    }
    let resolution = start.abs().max(end.abs()) * f64::EPSILON;
    let bin_count = if span / bin_count as f64 > resolution {
        bin_count
    } else {
        1
    };
    let width = span / bin_count as f64;

    let edges: Vec<f64> = (0..=bin_count)
        .map(|i| {
            if i == bin_count {
                end
            } else {
                start + width * i as f64
            }
        })
        .collect();
    let mut counts = vec![0usize; bin_count];
    for &value in sorted {
        counts[bin_index(value, &edges, start, width)] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| {
            let lower = edges[idx];
            let upper = edges[idx + 1];
            HistogramBin {
                label: format!("{lower:.2}-{upper:.2}"),
                lower: metric(lower),
                upper: metric(upper),
                midpoint: metric((lower + upper) / 2.0),
                count,
            }
        })
        .collect();

    Ok(Histogram {
        bins,
        total_values: sorted.len(),
        min: Some(round2(min)),
        max: Some(round2(max)),
    })
}

fn bin_index(value: f64, edges: &[f64], start: f64, width: f64) -> usize {
    let last = edges.len() - 2;
    let mut idx = (((value - start) / width).floor().max(0.0) as usize).min(last);
    // Floating division can land one bin off near an edge.
    if idx > 0 && value < edges[idx] {
        idx -= 1;
    } else if idx < last && value >= edges[idx + 1] {
        idx += 1;
    }
    idx
}
