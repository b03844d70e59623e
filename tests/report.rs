mod common;

use common::{TestWorkspace, fixture_path, fixture_report, load_fixture};
use dataset_quality::{
    config::{InvalidValuePolicy, ProfileConfig},
    inference::ColumnType,
    report::{self, QualityReport},
};

fn column<'a>(report: &'a QualityReport, name: &str) -> &'a dataset_quality::profile::ColumnProfile {
    report
        .column_quality
        .iter()
        .find(|p| p.column_name == name)
        .unwrap_or_else(|| panic!("column {name} missing from report"))
}

#[test]
fn customers_report_matches_hand_computed_metrics() {
    let report = fixture_report("customers.csv", &ProfileConfig::default());
    assert!(report.success, "{:?}", report.error);
    assert_eq!(report.dataset_metrics.total_rows, 7);
    assert_eq!(report.dataset_metrics.total_columns, 4);
    assert_eq!(report.dataset_metrics.total_cells, 28);
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.issues_summary.missing_values, 2);
    assert_eq!(report.issues_summary.invalid_values, 0);
    assert_eq!(report.issues_summary.outliers, 1);
    assert_eq!(report.total_missing_values, 2);
    assert_eq!(report.total_outliers, 1);
    assert_eq!(report.quality_score, 92.86);
    assert_eq!(report.completeness_score, 92.86);
    assert_eq!(report.numeric_columns, vec!["id", "age", "score"]);
    assert_eq!(report.categorical_columns, vec!["city"]);
    assert_eq!(
        report.recommendations,
        vec![
            "Found 2 missing values. Consider imputation or removing incomplete rows.",
            "Detected 1 outliers across numeric columns. Review and validate extreme values.",
        ]
    );
    assert_eq!(report.source_sha256.as_ref().map(String::len), Some(64));
}

#[test]
fn numeric_sections_follow_iqr_and_storage_labels() {
    let report = fixture_report("customers.csv", &ProfileConfig::default());

    let score = column(&report, "score");
    assert_eq!(score.column_type, ColumnType::Numeric);
    assert_eq!(score.type_check.as_ref().unwrap().inferred_type, "int64");
    let outliers = score.outliers.as_ref().unwrap();
    assert!(outliers.has_outliers);
    assert_eq!(outliers.q1, Some(10.5));
    assert_eq!(outliers.q3, Some(12.5));
    assert_eq!(outliers.lower_bound, Some(7.5));
    assert_eq!(outliers.upper_bound, Some(15.5));
    assert_eq!(outliers.examples, vec![100.0]);
    assert_eq!(score.histogram.as_ref().unwrap().bin_total(), 7);

    let age = column(&report, "age");
    assert_eq!(age.type_check.as_ref().unwrap().inferred_type, "float64");
    assert_eq!(age.completeness_percentage(), Some(85.71));
    let stats = age.numeric_stats.as_ref().unwrap();
    assert_eq!(stats.count, 6);
    assert_eq!(stats.mean, Some(33.83));
    assert_eq!(stats.median, Some(34.0));
    assert!(age.frequencies.is_none());
}

#[test]
fn categorical_frequencies_rank_by_count_then_value() {
    let report = fixture_report("customers.csv", &ProfileConfig::default());
    let city = column(&report, "city");
    assert_eq!(city.column_type, ColumnType::Categorical);
    assert!(city.numeric_stats.is_none());
    let freq = city.frequencies.as_ref().unwrap();
    let ranked: Vec<(&str, usize, f64)> = freq
        .entries
        .iter()
        .map(|e| (e.value.as_str(), e.count, e.percentage))
        .collect();
    assert_eq!(
        ranked,
        vec![("Paris", 4, 66.67), ("Berlin", 1, 16.67), ("London", 1, 16.67)]
    );
    assert!(freq.other_bucket.is_none());
    assert_eq!(city.uniqueness.as_ref().unwrap().unique_count, 3);
}

#[test]
fn mixed_column_counts_invalid_values_and_type_mismatch() {
    let mut config = ProfileConfig::default();
    config.add_expectation("amount=float64").unwrap();
    let report = fixture_report("mixed.csv", &config);
    assert!(report.success);

    let amount = column(&report, "amount");
    assert_eq!(amount.column_type, ColumnType::Categorical);
    assert_eq!(amount.invalid_count, Some(1));
    let check = amount.type_check.as_ref().unwrap();
    assert_eq!(check.inferred_type, "object");
    assert!(!check.type_consistent);
    assert_eq!(check.type_consistency_percentage, 0.0);

    assert_eq!(report.issues_summary.missing_values, 1);
    assert_eq!(report.issues_summary.invalid_values, 1);
    assert_eq!(report.issues_summary.type_inconsistencies, 1);
    assert_eq!(report.quality_score, 80.0);
    assert_eq!(report.completeness_score, 90.0);
    assert_eq!(
        report.recommendations,
        vec![
            "Found 1 missing values. Consider imputation or removing incomplete rows.",
            "Found 1 columns with type inconsistencies. Verify data types match expectations.",
            "Found 1 invalid values. Clean or standardize data format.",
        ]
    );
}

#[test]
fn invalid_value_policy_can_be_disabled() {
    let config = ProfileConfig {
        invalid_values: InvalidValuePolicy::Disabled,
        ..ProfileConfig::default()
    };
    let report = fixture_report("mixed.csv", &config);
    assert_eq!(report.issues_summary.invalid_values, 0);
    assert_eq!(report.invalid_value_policy, InvalidValuePolicy::Disabled);
    assert_eq!(report.quality_score, 90.0);
}

#[test]
fn reports_are_deterministic_apart_from_timestamp() {
    let config = ProfileConfig::default();
    let first = fixture_report("customers.csv", &config);
    let mut second = fixture_report("customers.csv", &config);
    second.generated_at = first.generated_at;
    assert_eq!(first, second);
    assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());
}

#[test]
fn column_limit_keeps_dataset_totals() {
    let config = ProfileConfig {
        max_columns: 2,
        ..ProfileConfig::default()
    };
    let report = fixture_report("customers.csv", &config);
    assert_eq!(report.column_quality.len(), 2);
    assert_eq!(report.dataset_metrics.profiled_columns, 2);
    assert_eq!(report.dataset_metrics.total_columns, 4);
    assert_eq!(report.dataset_metrics.total_cells, 28);
    assert_eq!(report.issues_summary.missing_values, 1);
}

#[test]
fn missing_file_yields_failed_report() {
    let path = fixture_path("does-not-exist.csv");
    let report = report::generate_report(&path, &ProfileConfig::default());
    assert!(!report.success);
    assert_eq!(
        report.error,
        Some(format!("Dataset file not found: {}", path.display()))
    );
    assert!(report.column_quality.is_empty());
    assert_eq!(report.quality_score, 0.0);
}

#[test]
fn empty_and_header_only_files_are_empty_datasets() {
    let workspace = TestWorkspace::new();
    for (name, contents) in [("empty.csv", ""), ("header.csv", "a,b,c\n")] {
        let path = workspace.write(name, contents);
        let report = report::generate_report(&path, &ProfileConfig::default());
        assert!(!report.success, "{name}");
        assert_eq!(report.error.as_deref(), Some("Dataset is empty"), "{name}");
        assert_eq!(report.dataset_metrics.total_rows, 0);
    }
}

#[test]
fn wide_row_is_a_parse_failure() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("ragged.csv", "a,b\n1,2\n3,4,5\n");
    let report = report::generate_report(&path, &ProfileConfig::default());
    assert!(!report.success);
    let error = report.error.unwrap();
    assert!(
        error.starts_with("Failed to parse dataset: line 3"),
        "{error}"
    );
}

#[test]
fn invalid_config_is_reported_not_raised() {
    let config = ProfileConfig {
        bin_count: 0,
        ..ProfileConfig::default()
    };
    let report = fixture_report("customers.csv", &config);
    assert!(!report.success);
    assert!(report.error.unwrap().starts_with("Invalid configuration"));
}

#[test]
fn failed_report_serializes_error_and_zero_metrics() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("empty.csv", "");
    let report = report::generate_report(&path, &ProfileConfig::default());
    let json: serde_json::Value = serde_json::from_str(&report.to_json(false).unwrap()).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Dataset is empty");
    assert_eq!(json["dataset_metrics"]["total_cells"], 0);
    assert_eq!(json["column_quality"], serde_json::json!([]));
    assert!(json.get("source_sha256").is_none());
}

#[test]
fn semicolon_fixture_loads_with_explicit_delimiter() {
    let mut config = ProfileConfig::default();
    config.load.delimiter = Some(b';');
    let report = fixture_report("orders_semicolon.csv", &config);
    assert!(report.success);
    assert_eq!(report.numeric_columns, vec!["qty"]);
    assert_eq!(report.categorical_columns, vec!["sku", "note"]);
    assert_eq!(report.issues_summary.missing_values, 2);

    let table = load_fixture("customers.csv");
    assert_eq!(table.row_count(), 7);
}
