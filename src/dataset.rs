//! In-memory columnar table produced by the loader.
//!
//! A [`Table`] is immutable once built: every column holds exactly
//! `row_count` values and column names are unique.

use std::collections::HashSet;

use crate::{
    data::{CellKey, Value},
    error::{ProfileError, ProfileResult},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    index: usize,
    values: Vec<Value>,
    decimal_notation: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, index: usize, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            index,
            values,
            decimal_notation: false,
        }
    }

    /// Mark that at least one numeric token was written with a decimal point
    /// or an exponent, so whole values still belong to float storage.
    pub fn with_decimal_notation(mut self, decimal_notation: bool) -> Self {
        self.decimal_notation = decimal_notation;
        self
    }

    pub fn decimal_notation(&self) -> bool {
        self.decimal_notation
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from named value vectors, checking the length and
    /// uniqueness invariants.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> ProfileResult<Self> {
        let row_count = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());
        let mut built = Vec::with_capacity(columns.len());
        for (index, (name, values)) in columns.into_iter().enumerate() {
            if values.len() != row_count {
                return Err(ProfileError::parse(format!(
                    "column '{name}' has {} value(s), expected {row_count}",
                    values.len()
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(ProfileError::parse(format!(
                    "duplicate column name '{name}'"
                )));
            }
            built.push(Column::new(name, index, values));
        }
        Ok(Self {
            columns: built,
            row_count,
        })
    }

    /// Apply per-column decimal-notation flags in column order.
    pub fn with_decimal_notation(mut self, flags: &[bool]) -> Self {
        self.columns = self
            .columns
            .into_iter()
            .zip(flags.iter().copied().chain(std::iter::repeat(false)))
            .map(|(column, flag)| column.with_decimal_notation(flag))
            .collect();
        self
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell_count(&self) -> usize {
        self.row_count * self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row(&self, row_idx: usize) -> Option<Vec<&Value>> {
        if row_idx >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[row_idx]).collect())
    }

    pub(crate) fn row_key(&self, row_idx: usize) -> Vec<CellKey<'_>> {
        self.columns
            .iter()
            .map(|c| CellKey::from(&c.values[row_idx]))
            .collect()
    }
}
