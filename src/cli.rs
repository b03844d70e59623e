use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{config::InvalidValuePolicy, summary::DEFAULT_PREVIEW_ROWS};

#[derive(Debug, Parser)]
#[command(author, version, about = "Profile tabular datasets and score their quality", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Profile every column and emit a data-quality report
    Report(ReportArgs),
    /// Summarize shape, column types, and the first few rows
    Summary(SummaryArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InvalidValuesArg {
    Disabled,
    NumericLike,
    AllText,
}

impl From<InvalidValuesArg> for InvalidValuePolicy {
    fn from(value: InvalidValuesArg) -> Self {
        match value {
            InvalidValuesArg::Disabled => InvalidValuePolicy::Disabled,
            InvalidValuesArg::NumericLike => InvalidValuePolicy::NumericLike,
            InvalidValuesArg::AllText => InvalidValuePolicy::AllText,
        }
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Input CSV file to profile (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file for the report (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML file with profiling settings; flags override its values
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Number of histogram bins for numeric columns
    #[arg(long = "bin-count")]
    pub bin_count: Option<usize>,
    /// IQR multiplier used to flag outliers
    #[arg(long = "outlier-multiplier")]
    pub outlier_multiplier: Option<f64>,
    /// Number of most frequent categories to list per column
    #[arg(long = "top")]
    pub top: Option<usize>,
    /// Minimum occurrences for a category to be listed
    #[arg(long = "min-frequency")]
    pub min_frequency: Option<usize>,
    /// Maximum number of columns to profile
    #[arg(long = "max-columns")]
    pub max_columns: Option<usize>,
    /// Expected storage type per column, as `column=type`
    #[arg(long = "expect", action = clap::ArgAction::Append)]
    pub expect: Vec<String>,
    /// How categorical columns are scanned for invalid values
    #[arg(long = "invalid-values", value_enum)]
    pub invalid_values: Option<InvalidValuesArg>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Load empty fields as empty strings instead of nulls
    #[arg(long = "keep-empty-strings")]
    pub keep_empty_strings: bool,
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Input CSV file to summarize (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of leading rows to include
    #[arg(long = "preview-rows", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
