//! Profiling configuration.
//!
//! [`ProfileConfig`] carries every knob the engine reads. Values come from the
//! built-in defaults, optionally a YAML file, and finally command-line
//! overrides.

use std::{collections::BTreeMap, fmt, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    data::DEFAULT_NULL_TOKENS,
    error::{ProfileError, ProfileResult},
};

pub const DEFAULT_BIN_COUNT: usize = 20;
pub const DEFAULT_OUTLIER_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_TOP_N_CATEGORIES: usize = 15;
pub const DEFAULT_MIN_CATEGORY_FREQUENCY: usize = 1;
pub const DEFAULT_MAX_COLUMNS: usize = 50;
pub const DEFAULT_OUTLIER_EXAMPLE_CAP: usize = 50;

/// How categorical columns are scanned for values that fail numeric coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidValuePolicy {
    /// Never count invalid values.
    Disabled,
    /// Count failures only when at least half of the non-null values coerce.
    #[default]
    NumericLike,
    /// Count every non-null value that fails coercion.
    AllText,
}

impl InvalidValuePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidValuePolicy::Disabled => "disabled",
            InvalidValuePolicy::NumericLike => "numeric-like",
            InvalidValuePolicy::AllText => "all-text",
        }
    }
}

impl fmt::Display for InvalidValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub bin_count: usize,
    pub outlier_multiplier: f64,
    pub top_n_categories: usize,
    pub min_category_frequency: usize,
    pub max_columns: usize,
    pub outlier_example_cap: usize,
    pub invalid_values: InvalidValuePolicy,
    pub expected_types: BTreeMap<String, String>,
    pub load: LoadOptions,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            outlier_multiplier: DEFAULT_OUTLIER_MULTIPLIER,
            top_n_categories: DEFAULT_TOP_N_CATEGORIES,
            min_category_frequency: DEFAULT_MIN_CATEGORY_FREQUENCY,
            max_columns: DEFAULT_MAX_COLUMNS,
            outlier_example_cap: DEFAULT_OUTLIER_EXAMPLE_CAP,
            invalid_values: InvalidValuePolicy::default(),
            expected_types: BTreeMap::new(),
            load: LoadOptions::default(),
        }
    }
}

impl ProfileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: ProfileConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProfileResult<()> {
        if self.bin_count == 0 {
            return Err(ProfileError::Config("bin_count must be at least 1".into()));
        }
        if self.top_n_categories == 0 {
            return Err(ProfileError::Config(
                "top_n_categories must be at least 1".into(),
            ));
        }
        if self.max_columns == 0 {
            return Err(ProfileError::Config("max_columns must be at least 1".into()));
        }
        if !self.outlier_multiplier.is_finite() || self.outlier_multiplier < 0.0 {
            return Err(ProfileError::Config(format!(
                "outlier_multiplier must be a non-negative finite number, got {}",
                self.outlier_multiplier
            )));
        }
        Ok(())
    }

    pub fn expected_type(&self, column: &str) -> Option<&str> {
        self.expected_types.get(column).map(String::as_str)
    }

    /// Parse a `column=type` directive into the expected-type map.
    pub fn add_expectation(&mut self, directive: &str) -> ProfileResult<()> {
        let (column, ty) = directive.split_once('=').ok_or_else(|| {
            ProfileError::Config(format!(
                "expected type '{directive}' must look like column=type"
            ))
        })?;
        let column = column.trim();
        let ty = ty.trim();
        if column.is_empty() || ty.is_empty() {
            return Err(ProfileError::Config(format!(
                "expected type '{directive}' must name both a column and a type"
            )));
        }
        self.expected_types.insert(column.to_string(), ty.to_string());
        Ok(())
    }
}

/// Options that control how the source is parsed into a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// A byte code, a single character, or one of `comma`, `tab`, `pipe`, `semicolon`.
    #[serde(deserialize_with = "deserialize_delimiter")]
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
    pub empty_as_null: bool,
    pub null_tokens: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: None,
            empty_as_null: true,
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

fn deserialize_delimiter<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDelimiter {
        Code(u8),
        Text(String),
    }

    match Option::<RawDelimiter>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDelimiter::Code(byte)) => Ok(Some(byte)),
        Some(RawDelimiter::Text(text)) => crate::cli::parse_delimiter(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
