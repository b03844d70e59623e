//! Interquartile-range outlier detection.

use serde::Serialize;

use crate::{
    profile::stats::percentile,
    sanitize::{metric, percentage, round2},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierInfo {
    pub has_outliers: bool,
    pub outlier_count: usize,
    pub outlier_percentage: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub inlier_count: usize,
    pub examples: Vec<f64>,
}

impl OutlierInfo {
    fn none() -> Self {
        Self {
            has_outliers: false,
            outlier_count: 0,
            outlier_percentage: 0.0,
            lower_bound: None,
            upper_bound: None,
            q1: None,
            q3: None,
            iqr: None,
            inlier_count: 0,
            examples: Vec::new(),
        }
    }
}

/// `values` is in column order (examples keep that order); `sorted` holds the
/// same values ascending.
pub fn detect(values: &[f64], sorted: &[f64], multiplier: f64, example_cap: usize) -> OutlierInfo {
    let (Some(q1), Some(q3)) = (percentile(sorted, 0.25), percentile(sorted, 0.75)) else {
        return OutlierInfo::none();
    };
    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let mut outlier_count = 0usize;
    let mut examples = Vec::new();
    for &value in values {
        if value < lower_bound || value > upper_bound {
            outlier_count += 1;
            if examples.len() < example_cap {
                examples.push(round2(value));
            }
        }
    }

    OutlierInfo {
        has_outliers: outlier_count > 0,
        outlier_count,
        outlier_percentage: percentage(outlier_count, values.len(), 0.0),
        lower_bound: metric(lower_bound),
        upper_bound: metric(upper_bound),
        q1: metric(q1),
        q3: metric(q3),
        iqr: metric(iqr),
        inlier_count: values.len() - outlier_count,
        examples,
    }
}
