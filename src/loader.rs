//! Delimited text → [`Table`].
//!
//! The whole source is read into memory, decoded field by field, and each
//! field is tagged as null, number, or text. Unparsable fragments stay as text
//! and are resolved by type inference later. Structural problems (undecodable
//! bytes, rows wider than the header) fail the load.

use std::{collections::HashSet, path::Path};

use encoding_rs::Encoding;
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::{
    config::LoadOptions,
    data::{Value, has_decimal_notation, parse_cell},
    dataset::Table,
    error::{ProfileError, ProfileResult},
    io_utils,
};

/// A loaded table together with facts about the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub table: Table,
    pub sha256: String,
    pub byte_len: usize,
}

pub fn load_table(path: &Path, options: &LoadOptions) -> ProfileResult<Table> {
    load_source(path, options).map(|loaded| loaded.table)
}

pub fn load_source(path: &Path, options: &LoadOptions) -> ProfileResult<LoadedSource> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
    debug!(
        "Loading {:?} (delimiter '{}', encoding {})",
        path,
        crate::printable_delimiter(delimiter),
        encoding.name()
    );
    let bytes = io_utils::read_source(path)?;
    let table = parse_table(&bytes, delimiter, encoding, options)?;
    info!(
        "Loaded {} row(s) x {} column(s) from {:?}",
        table.row_count(),
        table.column_count(),
        path
    );
    Ok(LoadedSource {
        table,
        sha256: format!("{:x}", Sha256::digest(&bytes)),
        byte_len: bytes.len(),
    })
}

pub fn parse_table(
    bytes: &[u8],
    delimiter: u8,
    encoding: &'static Encoding,
    options: &LoadOptions,
) -> ProfileResult<Table> {
    let mut reader = io_utils::open_csv_reader(bytes, delimiter, true);
    let raw_headers = io_utils::reader_headers(&mut reader, encoding)?;
    if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].trim().is_empty()) {
        return Err(ProfileError::EmptyDataset);
    }
    let headers = normalize_headers(&raw_headers);
    let width = headers.len();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); width];
    let mut decimal_notation = vec![false; width];

    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() > width {
            return Err(ProfileError::parse(format!(
                "line {line}: expected {width} field(s), saw {}",
                record.len()
            )));
        }
        let decoded = io_utils::decode_record(&record, encoding)
            .map_err(|err| ProfileError::parse(format!("line {line}: {err}")))?;
        for (idx, column) in columns.iter_mut().enumerate() {
            let value = match decoded.get(idx) {
                Some(raw) => {
                    let value =
                        parse_cell(raw, options.empty_as_null, options.null_tokens.as_slice());
                    if matches!(value, Value::Number(_)) && has_decimal_notation(raw) {
                        decimal_notation[idx] = true;
                    }
                    value
                }
                None => Value::Null,
            };
            column.push(value);
        }
    }

    Table::from_columns(headers.into_iter().zip(columns).collect())
        .map(|table| table.with_decimal_notation(&decimal_notation))
}

/// Blank names become `Unnamed: <index>`; repeats gain `.1`, `.2`, ...
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());
    for (idx, header) in raw.iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            trimmed.to_string()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        names.push(candidate);
    }
    names
}
