//! Column type inference and expected-type checks.
//!
//! A column is numeric only when every non-null value was tagged as a number
//! at load time; a single text value makes it categorical. The storage label
//! (`int64`, `float64`, `object`) is what callers declare expectations
//! against, and the comparison is strict text equality.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{data::Value, dataset::Column};

pub const INTEGER_LABEL: &str = "int64";
pub const FLOAT_LABEL: &str = "float64";
pub const TEXT_LABEL: &str = "object";
pub const UNKNOWN_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Unknown,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
            ColumnType::Unknown => "unknown",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of inferring one column's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCheck {
    pub column_type: ColumnType,
    pub inferred_type: &'static str,
    pub expected_type: Option<String>,
    pub type_consistent: bool,
}

impl TypeCheck {
    pub fn consistency_percentage(&self) -> f64 {
        if self.type_consistent { 100.0 } else { 0.0 }
    }
}

pub fn infer_column(column: &Column, expected_type: Option<&str>) -> TypeCheck {
    let column_type = infer_type(column.values());
    let inferred_type = storage_label(column_type, column);
    TypeCheck {
        column_type,
        inferred_type,
        expected_type: expected_type.map(str::to_string),
        type_consistent: expected_type.is_none_or(|expected| expected == inferred_type),
    }
}

pub fn infer_type(values: &[Value]) -> ColumnType {
    let all_numeric = values
        .iter()
        .filter(|v| !v.is_null())
        .all(|v| matches!(v, Value::Number(_)));
    if all_numeric {
        ColumnType::Numeric
    } else {
        ColumnType::Categorical
    }
}

fn storage_label(column_type: ColumnType, column: &Column) -> &'static str {
    let values = column.values();
    match column_type {
        ColumnType::Numeric => {
            let mut numbers = values.iter().filter_map(Value::as_number).peekable();
            if numbers.peek().is_none() {
                return FLOAT_LABEL;
            }
            let has_nulls = values.iter().any(Value::is_null);
            let integral = !column.decimal_notation()
                && numbers.all(|n| n.fract() == 0.0 && n.abs() < 9.0e15);
            if !has_nulls && integral {
                INTEGER_LABEL
            } else {
                FLOAT_LABEL
            }
        }
        ColumnType::Categorical => TEXT_LABEL,
        ColumnType::Unknown => UNKNOWN_LABEL,
    }
}
