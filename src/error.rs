//! Error taxonomy for the profiling engine.
//!
//! Dataset-level failures ([`ProfileError`]) end a profiling request and are
//! folded into a failed report at the boundary. Column-level failures
//! ([`ColumnProfilingError`]) never leave the aggregate call; the affected
//! column is reported as degraded instead.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to parse dataset: {0}")]
    Parse(String),
    #[error("Dataset is empty")]
    EmptyDataset,
    #[error("Dataset file not found: {}", .0.display())]
    ResourceMissing(PathBuf),
    #[error("Unknown encoding '{0}'")]
    Encoding(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to read dataset: {0}")]
    Io(#[from] io::Error),
}

impl ProfileError {
    pub fn parse(detail: impl Into<String>) -> Self {
        ProfileError::Parse(detail.into())
    }
}

impl From<csv::Error> for ProfileError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return ProfileError::Parse(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => ProfileError::Io(io_err),
            other => ProfileError::Parse(format!("{other:?}")),
        }
    }
}

/// Failure confined to one column's analysis.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Column '{column}': {message}")]
pub struct ColumnProfilingError {
    pub column: String,
    pub column_index: usize,
    pub message: String,
}

impl ColumnProfilingError {
    pub fn new(column: impl Into<String>, column_index: usize, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            column_index,
            message: message.into(),
        }
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;
