//! Advisory messages derived from the issues summary.
//!
//! Rules run in a fixed order and each contributes at most one message.

use crate::{aggregate::IssuesSummary, profile::ColumnProfile};

pub const LOW_COMPLETENESS_THRESHOLD: f64 = 50.0;
pub const LOW_COMPLETENESS_NAMED_COLUMNS: usize = 3;
pub const GOOD_QUALITY_MESSAGE: &str = "Dataset quality is good. No major issues detected.";

pub fn generate(issues: &IssuesSummary, profiles: &[ColumnProfile]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if issues.missing_values > 0 {
        recommendations.push(format!(
            "Found {} missing values. Consider imputation or removing incomplete rows.",
            issues.missing_values
        ));
    }
    if issues.outliers > 0 {
        recommendations.push(format!(
            "Detected {} outliers across numeric columns. Review and validate extreme values.",
            issues.outliers
        ));
    }
    if issues.type_inconsistencies > 0 {
        recommendations.push(format!(
            "Found {} columns with type inconsistencies. Verify data types match expectations.",
            issues.type_inconsistencies
        ));
    }
    if issues.invalid_values > 0 {
        recommendations.push(format!(
            "Found {} invalid values. Clean or standardize data format.",
            issues.invalid_values
        ));
    }

    let sparse: Vec<&str> = profiles
        .iter()
        .filter(|p| {
            p.completeness_percentage()
                .is_some_and(|pct| pct < LOW_COMPLETENESS_THRESHOLD)
        })
        .map(|p| p.column_name.as_str())
        .take(LOW_COMPLETENESS_NAMED_COLUMNS)
        .collect();
    if !sparse.is_empty() {
        recommendations.push(format!(
            "Columns with <50% completeness: {}. Consider removing or imputing these columns.",
            sparse.join(", ")
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(GOOD_QUALITY_MESSAGE.to_string());
    }
    recommendations
}
