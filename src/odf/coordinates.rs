//! Cell coordinate conversion utilities (A1 notation).
//!
//! Rows and columns are 1-based throughout the cell layer, matching the way
//! spreadsheet users count them: `(1, 1)` is `A1`, `(3, 2)` is `B3`.

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column to numeric (0-indexed)
///
/// # Examples
///
/// ```
/// use ods_cell::odf::coordinates::alpha_to_digit;
///
/// assert_eq!(alpha_to_digit("A").unwrap(), 0);
/// assert_eq!(alpha_to_digit("Z").unwrap(), 25);
/// assert_eq!(alpha_to_digit("AA").unwrap(), 26);
/// ```
pub fn alpha_to_digit(alpha: &str) -> Result<usize> {
    if alpha.is_empty() || !alpha.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidCoordinates(format!(
            "Column value '{}' is malformed, must contain only letters",
            alpha
        )));
    }

    let mut column = 0usize;
    for c in alpha.bytes().map(|b| b.to_ascii_uppercase()) {
        let val = (c - b'A' + 1) as usize;
        column = column
            .checked_mul(26)
            .and_then(|column| column.checked_add(val))
            .ok_or_else(|| Error::InvalidCoordinates(format!("Column '{}' is too large", alpha)))?;
    }

    Ok(column - 1)
}

/// Convert numeric column to alphabetic notation (0-indexed)
///
/// # Examples
///
/// ```
/// use ods_cell::odf::coordinates::digit_to_alpha;
///
/// assert_eq!(digit_to_alpha(0), "A");
/// assert_eq!(digit_to_alpha(25), "Z");
/// assert_eq!(digit_to_alpha(26), "AA");
/// ```
pub fn digit_to_alpha(mut digit: usize) -> String {
    let mut column = Vec::new();
    digit += 1; // Convert from 0-indexed to 1-indexed for calculation

    while digit > 0 {
        column.push(b'A' + ((digit - 1) % 26) as u8);
        digit = (digit - 1) / 26;
    }

    column.iter().rev().map(|&b| b as char).collect()
}

/// Cell coordinates (row, column), both 1-based
///
/// # Examples
///
/// ```
/// use ods_cell::odf::coordinates::CellCoord;
///
/// let coord = CellCoord::new(3, 2);
/// assert_eq!(coord.to_string(), "B3");
///
/// let coord: CellCoord = "AA10".parse().unwrap();
/// assert_eq!(coord.row(), 10);
/// assert_eq!(coord.column(), 27);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    row: usize,
    column: usize,
}

impl CellCoord {
    /// Create a new cell coordinate from a 1-based row and column
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Get row index (1-based)
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Get column index (1-based)
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Offset by a signed number of rows and columns.
    ///
    /// Fails when the result would leave the sheet on the top or left side.
    pub fn offset(&self, row_offset: isize, col_offset: isize) -> Result<Self> {
        let row = self.row.checked_add_signed(row_offset).filter(|&r| r >= 1);
        let column = self.column.checked_add_signed(col_offset).filter(|&c| c >= 1);
        match (row, column) {
            (Some(row), Some(column)) => Ok(Self::new(row, column)),
            _ => Err(Error::InvalidCoordinates(format!(
                "Offset ({}, {}) from {} leaves the sheet",
                row_offset, col_offset, self
            ))),
        }
    }

    /// Convert to A1 notation string
    ///
    /// Column 0 (never produced by the cell layer) renders as `?`.
    pub fn to_a1(&self) -> String {
        let letters = match self.column {
            0 => "?".to_string(),
            column => digit_to_alpha(column - 1),
        };
        let mut buffer = itoa::Buffer::new();
        letters + buffer.format(self.row)
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    /// Parse cell coordinate from A1 notation
    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (alpha, numeric) = s.split_at(split);

        if alpha.is_empty() {
            return Err(Error::InvalidCoordinates(format!(
                "No column letter found in '{}'",
                s
            )));
        }

        if numeric.is_empty() {
            return Err(Error::InvalidCoordinates(format!(
                "No row number found in '{}'",
                s
            )));
        }

        let column = alpha_to_digit(alpha)? + 1;
        let row: usize = numeric.parse().map_err(|_| {
            Error::InvalidCoordinates(format!("Failed to parse row number from '{}'", numeric))
        })?;

        if row == 0 {
            return Err(Error::InvalidCoordinates("Row number must be >= 1".to_string()));
        }

        Ok(Self::new(row, column))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}
