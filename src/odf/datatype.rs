//! ODF data type conversions (Float, Percentage, Date).
//!
//! This module provides conversion utilities between the strings stored in
//! `office:value` / `office:date-value` attributes (and the display text of
//! a cell) and Rust native types.

use crate::common::{Error, Result};
use crate::odf::constants::DATE_FORMAT;
use chrono::NaiveDate;

// ============================================================================
// FLOAT CONVERSION
// ============================================================================

/// Float data type conversion utilities
///
/// `office:value` holds a plain decimal number; the same string is used as
/// the cell's display text.
pub struct Float;

impl Float {
    /// Decode an `office:value` string.
    ///
    /// Surrounding whitespace is ignored; infinities and NaN are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use ods_cell::odf::datatype::Float;
    ///
    /// assert_eq!(Float::decode("3.5").unwrap(), 3.5);
    /// assert_eq!(Float::decode(" -2e3 ").unwrap(), -2000.0);
    /// assert!(Float::decode("abc").is_err());
    /// assert!(Float::decode("inf").is_err());
    /// ```
    pub fn decode(data: &str) -> Result<f64> {
        Self::parse(data).ok_or_else(|| {
            Error::InconsistentNode(format!("'{}' is not a finite decimal number", data))
        })
    }

    /// Parse a decimal number, returning `None` when `data` is not one.
    pub fn parse(data: &str) -> Option<f64> {
        fast_float2::parse::<f64, _>(data.trim())
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Encode a finite number as a plain decimal string.
    ///
    /// # Examples
    ///
    /// ```
    /// use ods_cell::odf::datatype::Float;
    ///
    /// assert_eq!(Float::encode(3.5), "3.5");
    /// assert_eq!(Float::encode(3.0), "3");
    /// assert_eq!(Float::encode(-0.125), "-0.125");
    /// ```
    #[inline]
    pub fn encode(value: f64) -> String {
        value.to_string()
    }
}

// ============================================================================
// PERCENTAGE CONVERSION
// ============================================================================

/// Percentage data type conversion utilities
///
/// A percentage is stored as a fraction in `office:value` (0.25 for 25%) and
/// displayed as a whole number of percent.
pub struct Percentage;

impl Percentage {
    /// Display text for a fraction: times 100, rounded half away from zero,
    /// suffixed with `%`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ods_cell::odf::datatype::Percentage;
    ///
    /// assert_eq!(Percentage::display(0.25), "25%");
    /// assert_eq!(Percentage::display(0.125), "13%");
    /// assert_eq!(Percentage::display(-1.5), "-150%");
    /// ```
    pub fn display(fraction: f64) -> String {
        // adding 0.0 turns a rounded -0 into 0
        let percent = (fraction * 100.0).round() + 0.0;
        format!("{}%", percent)
    }
}

// ============================================================================
// DATE CONVERSION
// ============================================================================

/// Date data type conversion utilities
///
/// Converts between ODF date format ("YYYY-MM-DD") and chrono::NaiveDate.
pub struct Date;

impl Date {
    /// Decode ODF date string to chrono::NaiveDate
    ///
    /// Only the zero-padded `YYYY-MM-DD` form is accepted.
    ///
    /// # Arguments
    ///
    /// * `data` - date string (e.g., "2024-01-31")
    ///
    /// # Examples
    ///
    /// ```
    /// use ods_cell::odf::datatype::Date;
    /// use chrono::NaiveDate;
    ///
    /// let date = Date::decode("2024-01-31").unwrap();
    /// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    /// ```
    pub fn decode(data: &str) -> Result<NaiveDate> {
        let well_formed = data.len() == 10
            && data.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(Error::InconsistentNode(format!("'{}' is not a YYYY-MM-DD date", data)));
        }
        Ok(NaiveDate::parse_from_str(data, DATE_FORMAT)?)
    }

    /// Encode chrono::NaiveDate to ODF date string
    ///
    /// # Examples
    ///
    /// ```
    /// use ods_cell::odf::datatype::Date;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    /// assert_eq!(Date::encode(&date), "2024-01-31");
    /// ```
    #[inline]
    pub fn encode(value: &NaiveDate) -> String {
        value.format(DATE_FORMAT).to_string()
    }
}
