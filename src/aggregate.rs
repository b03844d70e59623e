//! Dataset-level rollup of column profiles.
//!
//! The quality score penalizes missing and invalid cells only. Outliers and
//! duplicate rows are reported beside it so callers can weigh them
//! separately. The upload-time completeness score (explicit nulls only) is
//! exposed under its own name.

use std::collections::HashSet;

use log::warn;
use serde::Serialize;

use crate::{
    dataset::Table,
    profile::{ColumnOutcome, ColumnProfile},
    sanitize::round2,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssuesSummary {
    pub missing_values: usize,
    pub invalid_values: usize,
    pub outliers: usize,
    pub type_inconsistencies: usize,
}

impl IssuesSummary {
    pub fn from_profiles(profiles: &[ColumnProfile]) -> Self {
        profiles.iter().fold(Self::default(), |acc, profile| Self {
            missing_values: acc.missing_values + profile.missing_count(),
            invalid_values: acc.invalid_values + profile.invalid_count.unwrap_or(0),
            outliers: acc.outliers + profile.outlier_count(),
            type_inconsistencies: acc.type_inconsistencies
                + usize::from(!profile.type_consistent()),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetMetrics {
    pub total_rows: usize,
    pub total_columns: usize,
    pub total_cells: usize,
    pub profiled_columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetQuality {
    pub metrics: DatasetMetrics,
    pub duplicate_rows: usize,
    pub issues_summary: IssuesSummary,
    pub quality_score: f64,
    pub completeness_score: f64,
}

/// Resolve per-column outcomes, replacing failures with degraded profiles.
pub fn collect_profiles(outcomes: Vec<ColumnOutcome>) -> Vec<ColumnProfile> {
    outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(profile) => profile,
            Err(err) => {
                warn!("Column profiling failed: {err}");
                ColumnProfile::degraded(&err)
            }
        })
        .collect()
}

pub fn aggregate(table: &Table, profiles: &[ColumnProfile]) -> DatasetQuality {
    let metrics = DatasetMetrics {
        total_rows: table.row_count(),
        total_columns: table.column_count(),
        total_cells: table.cell_count(),
        profiled_columns: profiles.len(),
    };
    let issues_summary = IssuesSummary::from_profiles(profiles);
    DatasetQuality {
        metrics,
        duplicate_rows: count_duplicate_rows(table),
        issues_summary,
        quality_score: quality_score(
            metrics.total_cells,
            issues_summary.missing_values + issues_summary.invalid_values,
        ),
        completeness_score: completeness_score(table),
    }
}

/// Rows identical to an earlier row across every column.
pub fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen = HashSet::with_capacity(table.row_count());
    (0..table.row_count())
        .filter(|&row_idx| !seen.insert(table.row_key(row_idx)))
        .count()
}

pub fn quality_score(total_cells: usize, problematic_cells: usize) -> f64 {
    if total_cells == 0 {
        return 100.0;
    }
    let clean = total_cells.saturating_sub(problematic_cells);
    round2(clean as f64 / total_cells as f64 * 100.0).clamp(0.0, 100.0)
}

/// Share of cells that are not explicit nulls, over every column.
pub fn completeness_score(table: &Table) -> f64 {
    let null_cells: usize = table.columns().iter().map(|c| c.null_count()).sum();
    quality_score(table.cell_count(), null_cells)
}
