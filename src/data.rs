use std::{borrow::Cow, fmt};

use serde::{Serialize, Serializer};

/// Tokens that load as an explicit null in addition to empty fields.
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell, tagged once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Display form used for frequency keys; `None` for nulls.
    pub fn as_display(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(Cow::Owned(format_number(*n))),
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_display() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Hashable identity of a cell for row-wise equality. Nulls compare equal to
/// each other and `-0.0` equals `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => CellKey::Null,
            Value::Number(n) => {
                let normalized = if *n == 0.0 { 0.0 } else { *n };
                CellKey::Number(normalized.to_bits())
            }
            Value::Text(s) => CellKey::Text(s.as_str()),
        }
    }
}

/// Strict numeric coercion: the trimmed token must parse as a finite float.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when a numeric token is spelled with a decimal point or an exponent.
pub fn has_decimal_notation(raw: &str) -> bool {
    raw.trim().contains(['.', 'e', 'E'])
}

/// Classify a decoded field into a [`Value`].
pub fn parse_cell<S: AsRef<str>>(raw: &str, empty_as_null: bool, null_tokens: &[S]) -> Value {
    if raw.is_empty() {
        return if empty_as_null {
            Value::Null
        } else {
            Value::Text(String::new())
        };
    }
    if null_tokens.iter().any(|token| token.as_ref() == raw) {
        return Value::Null;
    }
    match coerce_numeric(raw) {
        Some(number) => Value::Number(number),
        None => Value::Text(raw.to_string()),
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_tags_numbers_text_and_nulls() {
        assert_eq!(parse_cell("42", true, DEFAULT_NULL_TOKENS), Value::Number(42.0));
        assert_eq!(parse_cell(" 3.5 ", true, DEFAULT_NULL_TOKENS), Value::Number(3.5));
        assert_eq!(parse_cell("1e3", true, DEFAULT_NULL_TOKENS), Value::Number(1000.0));
        assert_eq!(
            parse_cell("abc", true, DEFAULT_NULL_TOKENS),
            Value::Text("abc".into())
        );
        assert_eq!(parse_cell("NA", true, DEFAULT_NULL_TOKENS), Value::Null);
        assert_eq!(parse_cell("", true, DEFAULT_NULL_TOKENS), Value::Null);
    }

    #[test]
    fn parse_cell_keeps_empty_text_when_requested() {
        assert_eq!(
            parse_cell("", false, DEFAULT_NULL_TOKENS),
            Value::Text(String::new())
        );
    }

    #[test]
    fn coerce_numeric_rejects_non_finite_and_grouped_tokens() {
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric("1,000"), None);
        assert_eq!(coerce_numeric("  "), None);
        assert_eq!(coerce_numeric("-7"), Some(-7.0));
    }

    #[test]
    fn cell_key_treats_signed_zero_as_equal() {
        let pos = Value::Number(0.0);
        let neg = Value::Number(-0.0);
        assert_eq!(CellKey::from(&pos), CellKey::from(&neg));
        assert_eq!(CellKey::from(&Value::Null), CellKey::Null);
    }

    #[test]
    fn display_formats_integral_numbers_without_fraction() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
