use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Declared logical type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Float,
    Integer,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Float => "float",
            ColumnKind::Integer => "integer",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Float | ColumnKind::Integer)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single present cell. Missing cells are represented as `None` at the call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Float(f64),
    Integer(i64),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Float(f) => format_float(*f),
            Value::Integer(i) => i.to_string(),
        }
    }

    /// Numeric view of the cell; text is coerced with [`parse_numeric`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Text(s) => parse_numeric(s),
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Lenient numeric coercion. Anything that is not a finite number yields `None`.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Renders a float the way the output file stores it: whole numbers keep one
/// decimal place, everything else uses the shortest round-trip form.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[ \-]+").expect("valid separator pattern"))
}

fn parenthesis_regex() -> &'static Regex {
    static PARENS: OnceLock<Regex> = OnceLock::new();
    PARENS.get_or_init(|| Regex::new(r"[()]").expect("valid parenthesis pattern"))
}

/// Canonical column label: trimmed, lowercased, space/hyphen runs collapsed to
/// `_`, parentheses removed.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let underscored = separator_regex().replace_all(&lowered, "_");
    parenthesis_regex().replace_all(&underscored, "").into_owned()
}
