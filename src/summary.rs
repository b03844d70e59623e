//! Lightweight dataset overview: shape, column types, and a few leading rows.

use serde::{Serialize, Serializer};

use crate::{aggregate, data::Value, dataset::Table, inference};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub type_label: &'static str,
    pub index: usize,
}

/// One preview row, serialized as an object in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow(pub Vec<(String, Value)>);

impl Serialize for PreviewRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnMeta>,
    pub preview: Vec<PreviewRow>,
    pub duplicate_rows: usize,
    #[serde(serialize_with = "ordered_counts")]
    pub null_counts: Vec<(String, usize)>,
    pub completeness_score: f64,
}

fn ordered_counts<S: Serializer>(counts: &[(String, usize)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().map(|(k, v)| (k, v)))
}

pub fn summarize(table: &Table, preview_rows: usize) -> DatasetSummary {
    let headers = table.headers();
    let columns = table
        .columns()
        .iter()
        .map(|column| ColumnMeta {
            name: column.name().to_string(),
            type_label: inference::infer_column(column, None).inferred_type,
            index: column.index(),
        })
        .collect();
    let preview = (0..table.row_count().min(preview_rows))
        .filter_map(|row_idx| table.row(row_idx))
        .map(|row| {
            PreviewRow(
                headers
                    .iter()
                    .cloned()
                    .zip(row.into_iter().cloned())
                    .collect(),
            )
        })
        .collect();
    let null_counts = table
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect();

    DatasetSummary {
        row_count: table.row_count(),
        column_count: table.column_count(),
        columns,
        preview,
        duplicate_rows: aggregate::count_duplicate_rows(table),
        null_counts,
        completeness_score: aggregate::completeness_score(table),
    }
}
