//! Report assembly: the single entry point callers use.
//!
//! [`generate_report`] never fails. Dataset-level errors become a report with
//! `success = false`, the error text, and zeroed metrics. Every float in a
//! report has already been rounded and non-finite values replaced with
//! `None`, so serialization cannot meet a NaN or infinity.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::{
    aggregate::{self, DatasetMetrics, IssuesSummary},
    config::{InvalidValuePolicy, ProfileConfig},
    dataset::Table,
    error::{ProfileError, ProfileResult},
    inference::ColumnType,
    loader::{self, LoadedSource},
    profile::{self, ColumnProfile},
    recommend, table,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,
    pub dataset_metrics: DatasetMetrics,
    pub duplicate_rows: usize,
    pub quality_score: f64,
    pub completeness_score: f64,
    pub issues_summary: IssuesSummary,
    pub total_missing_values: usize,
    pub total_outliers: usize,
    pub invalid_value_policy: InvalidValuePolicy,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub column_quality: Vec<ColumnProfile>,
    pub recommendations: Vec<String>,
}

impl QualityReport {
    pub fn failed(error: &ProfileError, config: &ProfileConfig) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            generated_at: Utc::now(),
            source_sha256: None,
            dataset_metrics: DatasetMetrics::default(),
            duplicate_rows: 0,
            quality_score: 0.0,
            completeness_score: 0.0,
            issues_summary: IssuesSummary::default(),
            total_missing_values: 0,
            total_outliers: 0,
            invalid_value_policy: config.invalid_values,
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            column_quality: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Load `path` and profile it, folding any dataset-level failure into the
/// returned report.
pub fn generate_report(path: &Path, config: &ProfileConfig) -> QualityReport {
    info!("Generating quality report for {:?}", path);
    let outcome = config
        .validate()
        .and_then(|_| loader::load_source(path, &config.load))
        .and_then(|loaded| assemble_loaded(loaded, config));
    match outcome {
        Ok(report) => report,
        Err(err) => {
            warn!("Quality report for {:?} failed: {err}", path);
            QualityReport::failed(&err, config)
        }
    }
}

fn assemble_loaded(loaded: LoadedSource, config: &ProfileConfig) -> ProfileResult<QualityReport> {
    let mut report = build_report(&loaded.table, config)?;
    report.source_sha256 = Some(loaded.sha256);
    Ok(report)
}

/// Profile an already-loaded table.
pub fn build_report(table: &Table, config: &ProfileConfig) -> ProfileResult<QualityReport> {
    if table.row_count() == 0 {
        return Err(ProfileError::EmptyDataset);
    }
    let profiles = aggregate::collect_profiles(profile::profile_table(table, config));
    let quality = aggregate::aggregate(table, &profiles);
    let recommendations = recommend::generate(&quality.issues_summary, &profiles);
    let names_of = |ty: ColumnType| -> Vec<String> {
        profiles
            .iter()
            .filter(|p| p.column_type == ty)
            .map(|p| p.column_name.clone())
            .collect()
    };
    let numeric_columns = names_of(ColumnType::Numeric);
    let categorical_columns = names_of(ColumnType::Categorical);

    info!(
        "Quality score {:.2} across {} row(s), {} of {} column(s) profiled",
        quality.quality_score,
        quality.metrics.total_rows,
        quality.metrics.profiled_columns,
        quality.metrics.total_columns
    );

    Ok(QualityReport {
        success: true,
        error: None,
        generated_at: Utc::now(),
        source_sha256: None,
        dataset_metrics: quality.metrics,
        duplicate_rows: quality.duplicate_rows,
        quality_score: quality.quality_score,
        completeness_score: quality.completeness_score,
        issues_summary: quality.issues_summary,
        total_missing_values: quality.issues_summary.missing_values,
        total_outliers: quality.issues_summary.outliers,
        invalid_value_policy: config.invalid_values,
        numeric_columns,
        categorical_columns,
        column_quality: profiles,
        recommendations,
    })
}

/// Human-readable rendering for terminals.
pub fn render_text(report: &QualityReport) -> String {
    let mut output = String::new();
    if let Some(error) = &report.error {
        output.push_str(&format!("Report failed: {error}\n"));
        return output;
    }
    let metrics = &report.dataset_metrics;
    output.push_str(&format!(
        "Quality score: {:.2}  (completeness {:.2})\nRows: {}  Columns: {} ({} profiled)  Duplicate rows: {}\n\n",
        report.quality_score,
        report.completeness_score,
        metrics.total_rows,
        metrics.total_columns,
        metrics.profiled_columns,
        report.duplicate_rows
    ));

    let headers = [
        "column", "type", "complete", "unique", "invalid", "outliers", "note",
    ]
    .map(String::from);
    let rows: Vec<Vec<String>> = report
        .column_quality
        .iter()
        .map(|p| {
            vec![
                p.column_name.clone(),
                p.column_type.to_string(),
                p.completeness_percentage()
                    .map(|pct| format!("{pct:.2}%"))
                    .unwrap_or_default(),
                p.uniqueness
                    .as_ref()
                    .map(|u| u.unique_count.to_string())
                    .unwrap_or_default(),
                p.invalid_count.map(|c| c.to_string()).unwrap_or_default(),
                p.outliers
                    .as_ref()
                    .map(|o| o.outlier_count.to_string())
                    .unwrap_or_default(),
                p.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    output.push_str(&table::render_table(&headers, &rows));

    output.push('\n');
    for recommendation in &report.recommendations {
        output.push_str(&format!("- {recommendation}\n"));
    }
    output
}
