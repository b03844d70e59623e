//! Per-column profiling.
//!
//! [`profile_column`] turns one [`Column`] plus its [`TypeCheck`] into a
//! [`ColumnProfile`]: completeness, uniqueness, and then either the numeric
//! sections (statistics, histogram, outliers) or the categorical frequency
//! table, never both. A failure inside one column comes back as a
//! [`ColumnProfilingError`] so the caller can degrade that column alone.

pub mod frequency;
pub mod histogram;
pub mod outliers;
pub mod stats;

use std::collections::HashSet;

use log::{debug, warn};
use serde::Serialize;

use crate::{
    config::{InvalidValuePolicy, ProfileConfig},
    data::{CellKey, Value},
    dataset::{Column, Table},
    error::ColumnProfilingError,
    inference::{self, ColumnType, TypeCheck},
    sanitize::{percentage, round2},
};

pub use frequency::{CategoryFrequencies, FrequencyEntry};
pub use histogram::{Histogram, HistogramBin};
pub use outliers::OutlierInfo;
pub use stats::NumericStats;

use frequency::FrequencyAccumulator;
use histogram::HistogramError;
use stats::StatsAccumulator;

pub type ColumnOutcome = Result<ColumnProfile, ColumnProfilingError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completeness {
    pub null_count: usize,
    pub null_percentage: f64,
    pub empty_string_count: usize,
    pub empty_percentage: f64,
    pub total_missing: usize,
    pub missing_percentage: f64,
    pub present_count: usize,
    pub present_percentage: f64,
    pub completeness_percentage: f64,
}

impl Completeness {
    pub fn measure(total: usize, null_count: usize, empty_string_count: usize) -> Self {
        let total_missing = null_count + empty_string_count;
        let present_count = total - total_missing;
        let (missing_percentage, present_percentage) = if total == 0 {
            (0.0, 100.0)
        } else {
            let missing = total_missing as f64 / total as f64 * 100.0;
            (round2(missing), round2(100.0 - missing))
        };
        Self {
            null_count,
            null_percentage: percentage(null_count, total, 0.0),
            empty_string_count,
            empty_percentage: percentage(empty_string_count, total, 0.0),
            total_missing,
            missing_percentage,
            present_count,
            present_percentage,
            completeness_percentage: present_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Uniqueness {
    pub unique_count: usize,
    pub unique_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column_name: String,
    pub column_index: usize,
    pub column_type: ColumnType,
    pub total_values: usize,
    #[serde(flatten)]
    pub type_check: Option<TypeCheckView>,
    #[serde(flatten)]
    pub completeness: Option<Completeness>,
    #[serde(flatten)]
    pub uniqueness: Option<Uniqueness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<CategoryFrequencies>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serialized form of a [`TypeCheck`] inside a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCheckView {
    pub inferred_type: &'static str,
    pub expected_type: Option<String>,
    pub type_consistent: bool,
    pub type_consistency_percentage: f64,
}

impl From<&TypeCheck> for TypeCheckView {
    fn from(check: &TypeCheck) -> Self {
        Self {
            inferred_type: check.inferred_type,
            expected_type: check.expected_type.clone(),
            type_consistent: check.type_consistent,
            type_consistency_percentage: check.consistency_percentage(),
        }
    }
}

impl ColumnProfile {
    /// Placeholder for a column whose analysis failed.
    pub fn degraded(error: &ColumnProfilingError) -> Self {
        Self {
            column_name: error.column.clone(),
            column_index: error.column_index,
            column_type: ColumnType::Unknown,
            total_values: 0,
            type_check: None,
            completeness: None,
            uniqueness: None,
            invalid_count: None,
            numeric_stats: None,
            histogram: None,
            outliers: None,
            frequencies: None,
            error: Some(error.message.clone()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn type_consistent(&self) -> bool {
        self.type_check.as_ref().is_none_or(|t| t.type_consistent)
    }

    pub fn missing_count(&self) -> usize {
        self.completeness.as_ref().map_or(0, |c| c.total_missing)
    }

    pub fn null_count(&self) -> usize {
        self.completeness.as_ref().map_or(0, |c| c.null_count)
    }

    pub fn outlier_count(&self) -> usize {
        self.outliers.as_ref().map_or(0, |o| o.outlier_count)
    }

    pub fn completeness_percentage(&self) -> Option<f64> {
        self.completeness
            .as_ref()
            .map(|c| c.completeness_percentage)
    }
}

/// Profile the first `max_columns` columns of `table`.
pub fn profile_table(table: &Table, config: &ProfileConfig) -> Vec<ColumnOutcome> {
    if table.column_count() > config.max_columns {
        warn!(
            "Dataset has {} columns, profiling only the first {}",
            table.column_count(),
            config.max_columns
        );
    }
    table
        .columns()
        .iter()
        .take(config.max_columns)
        .map(|column| {
            let check = inference::infer_column(column, config.expected_type(column.name()));
            debug!(
                "Column '{}' inferred as {} ({})",
                column.name(),
                check.column_type,
                check.inferred_type
            );
            profile_column(column, &check, config)
        })
        .collect()
}

pub fn profile_column(
    column: &Column,
    check: &TypeCheck,
    config: &ProfileConfig,
) -> ColumnOutcome {
    let fail = |message: &str| ColumnProfilingError::new(column.name(), column.index(), message);
    let total = column.len();
    let null_count = column.null_count();
    let empty_string_count = match check.column_type {
        ColumnType::Categorical => column
            .values()
            .iter()
            .filter(|v| v.as_text().is_some_and(str::is_empty))
            .count(),
        _ => 0,
    };

    let mut profile = ColumnProfile {
        column_name: column.name().to_string(),
        column_index: column.index(),
        column_type: check.column_type,
        total_values: total,
        type_check: Some(TypeCheckView::from(check)),
        completeness: Some(Completeness::measure(total, null_count, empty_string_count)),
        uniqueness: Some(uniqueness(column)),
        invalid_count: None,
        numeric_stats: None,
        histogram: None,
        outliers: None,
        frequencies: None,
        error: None,
    };

    match check.column_type {
        ColumnType::Numeric => {
            let mut values = Vec::with_capacity(total - null_count);
            let mut acc = StatsAccumulator::default();
            for value in column.non_null() {
                let Value::Number(number) = value else {
                    return Err(fail("expected numeric values but found text"));
                };
                acc.add(*number);
                values.push(*number);
            }
            let mut sorted = values.clone();
            sorted.sort_by(f64::total_cmp);

            profile.numeric_stats = acc.finish(&sorted);
            profile.histogram = match histogram::build(&sorted, config.bin_count) {
                Ok(histogram) => Some(histogram),
                Err(HistogramError::ZeroBins) => {
                    return Err(fail(HistogramError::ZeroBins.message()));
                }
                Err(err) => {
                    warn!("Column '{}': {}, histogram omitted", column.name(), err.message());
                    None
                }
            };
            profile.outliers = Some(outliers::detect(
                &values,
                &sorted,
                config.outlier_multiplier,
                config.outlier_example_cap,
            ));
            profile.invalid_count = Some(0);
        }
        ColumnType::Categorical => {
            let mut acc = FrequencyAccumulator::default();
            for value in column.non_null() {
                acc.ingest(value);
            }
            profile.frequencies =
                Some(acc.finish(config.top_n_categories, config.min_category_frequency));
            profile.invalid_count = Some(invalid_count(column, config.invalid_values));
        }
        ColumnType::Unknown => return Err(fail("column type could not be determined")),
    }

    Ok(profile)
}

fn uniqueness(column: &Column) -> Uniqueness {
    let distinct: HashSet<CellKey<'_>> = column.non_null().map(CellKey::from).collect();
    Uniqueness {
        unique_count: distinct.len(),
        unique_percentage: percentage(distinct.len(), column.len(), 0.0),
    }
}

/// Non-empty text values in a categorical column, subject to `policy`.
/// Empty strings never count here, they are already missing.
fn invalid_count(column: &Column, policy: InvalidValuePolicy) -> usize {
    let (non_null, numbers, texts) =
        column
            .non_null()
            .fold((0usize, 0usize, 0usize), |(all, numbers, texts), value| match value {
                Value::Number(_) => (all + 1, numbers + 1, texts),
                Value::Text(s) if !s.is_empty() => (all + 1, numbers, texts + 1),
                _ => (all + 1, numbers, texts),
            });
    match policy {
        InvalidValuePolicy::Disabled => 0,
        InvalidValuePolicy::AllText => texts,
        InvalidValuePolicy::NumericLike if numbers > 0 && numbers * 2 >= non_null => texts,
        InvalidValuePolicy::NumericLike => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::infer_column;

    fn text(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::Text((*v).to_string())).collect()
    }

    fn profile(column: &Column, config: &ProfileConfig) -> ColumnOutcome {
        let check = infer_column(column, config.expected_type(column.name()));
        profile_column(column, &check, config)
    }

    #[test]
    fn numeric_column_gets_numeric_sections_only() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]
            .into_iter()
            .map(Value::Number)
            .chain([Value::Null])
            .collect();
        let column = Column::new("amount", 0, values);
        let profile = profile(&column, &ProfileConfig::default()).unwrap();

        assert_eq!(profile.column_type, ColumnType::Numeric);
        assert_eq!(profile.total_values, 11);
        assert_eq!(profile.null_count(), 1);
        assert_eq!(profile.outlier_count(), 1);
        assert_eq!(profile.numeric_stats.as_ref().unwrap().count, 10);
        assert_eq!(profile.histogram.as_ref().unwrap().bin_total(), 10);
        assert_eq!(profile.invalid_count, Some(0));
        assert!(profile.frequencies.is_none());
        let completeness = profile.completeness.as_ref().unwrap();
        assert_eq!(completeness.present_count, 10);
        assert_eq!(completeness.missing_percentage, 9.09);
        assert_eq!(completeness.present_percentage, 90.91);
    }

    #[test]
    fn categorical_column_gets_frequencies_only() {
        let column = Column::new("grade", 2, text(&["a", "a", "b", "c", "c", "c"]));
        let config = ProfileConfig {
            top_n_categories: 2,
            ..ProfileConfig::default()
        };
        let profile = profile(&column, &config).unwrap();

        assert_eq!(profile.column_type, ColumnType::Categorical);
        assert!(profile.numeric_stats.is_none());
        assert!(profile.histogram.is_none());
        assert!(profile.outliers.is_none());
        let freq = profile.frequencies.as_ref().unwrap();
        assert_eq!(freq.entries.len(), 2);
        assert_eq!(freq.other_bucket.as_ref().unwrap().percentage, 16.67);
        assert_eq!(profile.uniqueness.as_ref().unwrap().unique_count, 3);
        assert_eq!(profile.invalid_count, Some(0));
    }

    #[test]
    fn empty_strings_count_as_missing_in_categorical_columns() {
        let column = Column::new("note", 0, vec![
            Value::Text(String::new()),
            Value::Text("ok".into()),
            Value::Null,
            Value::Text("ok".into()),
        ]);
        let profile = profile(&column, &ProfileConfig::default()).unwrap();
        let completeness = profile.completeness.as_ref().unwrap();
        assert_eq!(completeness.null_count, 1);
        assert_eq!(completeness.empty_string_count, 1);
        assert_eq!(completeness.total_missing, 2);
        assert_eq!(completeness.completeness_percentage, 50.0);
    }

    #[test]
    fn empty_column_is_fully_present_by_definition() {
        let completeness = Completeness::measure(0, 0, 0);
        assert_eq!(completeness.present_percentage, 100.0);
        assert_eq!(completeness.missing_percentage, 0.0);
    }

    #[test]
    fn all_null_numeric_column_has_empty_histogram() {
        let column = Column::new("blank", 0, vec![Value::Null, Value::Null]);
        let profile = profile(&column, &ProfileConfig::default()).unwrap();
        assert_eq!(profile.column_type, ColumnType::Numeric);
        assert!(profile.numeric_stats.is_none());
        assert!(profile.histogram.as_ref().unwrap().bins.is_empty());
        assert_eq!(profile.outlier_count(), 0);
        assert_eq!(profile.completeness_percentage(), Some(0.0));
    }

    #[test]
    fn invalid_value_policy_controls_counts() {
        let values = vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Text("three".into()),
            Value::Number(4.0),
        ];
        let column = Column::new("mixed", 0, values);
        let textual = Column::new("names", 1, text(&["ann", "bob", "cy"]));

        let numeric_like = ProfileConfig::default();
        assert_eq!(profile(&column, &numeric_like).unwrap().invalid_count, Some(1));
        assert_eq!(profile(&textual, &numeric_like).unwrap().invalid_count, Some(0));

        let all_text = ProfileConfig {
            invalid_values: InvalidValuePolicy::AllText,
            ..ProfileConfig::default()
        };
        assert_eq!(profile(&textual, &all_text).unwrap().invalid_count, Some(3));

        let disabled = ProfileConfig {
            invalid_values: InvalidValuePolicy::Disabled,
            ..ProfileConfig::default()
        };
        assert_eq!(profile(&column, &disabled).unwrap().invalid_count, Some(0));
    }

    #[test]
    fn invalid_values_need_half_of_non_null_numeric() {
        let mostly_blank = Column::new("code", 0, vec![
            Value::Number(1.0),
            Value::Text("x".into()),
            Value::Text(String::new()),
            Value::Text(String::new()),
            Value::Text(String::new()),
        ]);
        let blank = profile(&mostly_blank, &ProfileConfig::default()).unwrap();
        assert_eq!(blank.column_type, ColumnType::Categorical);
        assert_eq!(blank.invalid_count, Some(0));
        assert_eq!(blank.missing_count(), 3);

        let half_numeric = Column::new("code", 0, vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Text("x".into()),
            Value::Text(String::new()),
        ]);
        let half = profile(&half_numeric, &ProfileConfig::default()).unwrap();
        assert_eq!(half.invalid_count, Some(1));
    }

    #[test]
    fn overflowing_histogram_keeps_the_rest_of_the_column() {
        let column = Column::new(
            "huge",
            4,
            vec![Value::Number(-f64::MAX), Value::Number(f64::MAX), Value::Null],
        );
        let profile = profile(&column, &ProfileConfig::default()).unwrap();
        assert!(!profile.is_degraded());
        assert_eq!(profile.column_type, ColumnType::Numeric);
        assert!(profile.histogram.is_none());
        assert_eq!(profile.null_count(), 1);
        assert_eq!(profile.numeric_stats.as_ref().unwrap().count, 2);
        assert!(profile.outliers.is_some());
    }

    #[test]
    fn huge_constant_id_is_profiled_normally() {
        let column = Column::new("id", 0, vec![Value::Number(1.5e18), Value::Null]);
        let profile = profile(&column, &ProfileConfig::default()).unwrap();
        assert!(!profile.is_degraded());
        assert_eq!(profile.missing_count(), 1);
        assert_eq!(profile.histogram.as_ref().unwrap().bin_total(), 1);
    }

    #[test]
    fn zero_bins_degrade_the_column() {
        let column = Column::new("n", 3, vec![Value::Number(1.0)]);
        let config = ProfileConfig {
            bin_count: 0,
            ..ProfileConfig::default()
        };
        let err = profile(&column, &config).unwrap_err();
        assert_eq!(err.column, "n");
        assert_eq!(err.column_index, 3);
        assert_eq!(err.message, "histogram needs at least one bin");

        let degraded = ColumnProfile::degraded(&err);
        assert_eq!(degraded.total_values, 0);
        assert_eq!(degraded.column_type, ColumnType::Unknown);
        assert!(degraded.completeness.is_none());
        assert!(degraded.is_degraded());
    }

    #[test]
    fn mismatched_type_check_is_a_column_error() {
        let column = Column::new("c", 0, text(&["x"]));
        let check = TypeCheck {
            column_type: ColumnType::Numeric,
            inferred_type: "float64",
            expected_type: None,
            type_consistent: true,
        };
        let err = profile_column(&column, &check, &ProfileConfig::default()).unwrap_err();
        assert_eq!(err.message, "expected numeric values but found text");
    }

    #[test]
    fn profile_table_respects_column_limit() {
        let table = Table::from_columns(
            (0..5)
                .map(|i| (format!("c{i}"), vec![Value::Number(i as f64)]))
                .collect(),
        )
        .unwrap();
        let config = ProfileConfig {
            max_columns: 3,
            ..ProfileConfig::default()
        };
        let outcomes = profile_table(&table, &config);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(Result::is_ok));
    }
}
