//! Logical cell values and value kinds.

use crate::odf::constants::{VALUE_TYPE_DATE, VALUE_TYPE_FLOAT, VALUE_TYPE_PERCENTAGE, VALUE_TYPE_STRING};
use crate::odf::datatype::{Date, Float};
use chrono::NaiveDate;
use std::fmt;

/// A logical cell value.
///
/// Used both as the candidate passed to
/// [`Cell::set_value`](super::Cell::set_value) and as the result of
/// [`Cell::get_value`](super::Cell::get_value). Percentages read back as
/// `Number` holding the stored fraction.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// No value
    Empty,
    /// Numeric value
    Number(f64),
    /// Text string
    Text(String),
    /// Calendar date
    Date(NaiveDate),
}

impl CellValue {
    /// Check if the value is `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric representation: numbers as-is, text that parses as a finite
    /// decimal number.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => Float::parse(s),
            CellValue::Date(_) | CellValue::Empty => None,
        }
    }

    /// Date representation: only dates themselves.
    ///
    /// Text is never reinterpreted as a date, so a text write on a
    /// date-typed cell is stored as text.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Number(_) | CellValue::Text(_) | CellValue::Empty => None,
        }
    }

    /// Textual representation: every non-empty value has one.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => f.write_str(&Float::encode(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => f.write_str(&Date::encode(d)),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// The encoding a cell value resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value, or no viable encoding
    Empty,
    /// `office:value-type="float"`
    Float,
    /// `office:value-type="string"`
    Text,
    /// `office:value-type="date"`
    Date,
    /// Fraction in `office:value`, displayed as whole percent
    Percentage,
}

/// Introspection result of [`Cell::get_type`](super::Cell::get_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// No value
    Empty,
    /// Number
    Float,
    /// Text
    String,
    /// Date
    Date,
    /// Percentage
    Percentage,
    /// Declared type unrecognized although the cell has content
    Unknown,
}

impl From<ValueKind> for CellType {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Empty => CellType::Empty,
            ValueKind::Float => CellType::Float,
            ValueKind::Text => CellType::String,
            ValueKind::Date => CellType::Date,
            ValueKind::Percentage => CellType::Percentage,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellType::Empty => "empty",
            CellType::Float => VALUE_TYPE_FLOAT,
            CellType::String => VALUE_TYPE_STRING,
            CellType::Date => VALUE_TYPE_DATE,
            CellType::Percentage => VALUE_TYPE_PERCENTAGE,
            CellType::Unknown => "unknown",
        })
    }
}
