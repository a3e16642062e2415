//! Configuration options for worksheets.

use crate::odf::constants::{MAX_COLUMNS, MAX_ROWS};

/// Limits applied when addressing and expanding a worksheet.
///
/// # Examples
///
/// ```rust
/// use ods_cell::odf::ods::SheetOptions;
///
/// let options = SheetOptions::new()
///     .with_max_columns(1024)
///     .with_expansion_limit(4096);
/// assert_eq!(options.max_columns, 1024);
/// assert_eq!(options.max_rows, 1_048_576);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOptions {
    /// Highest addressable column (1-based)
    pub max_columns: usize,
    /// Highest addressable row (1-based)
    pub max_rows: usize,
    /// Most cell nodes a full row detach may produce
    pub expansion_limit: usize,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            max_columns: MAX_COLUMNS,
            max_rows: MAX_ROWS,
            expansion_limit: MAX_COLUMNS,
        }
    }
}

impl SheetOptions {
    /// Create a new `SheetOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the highest addressable column.
    #[inline]
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }

    /// Set the highest addressable row.
    #[inline]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Set how many cell nodes [`Row::detach`](super::Row::detach) may
    /// create before refusing.
    ///
    /// Column-targeted detachment splits at most one run per level and is
    /// not subject to this limit.
    #[inline]
    pub fn with_expansion_limit(mut self, expansion_limit: usize) -> Self {
        self.expansion_limit = expansion_limit;
        self
    }
}
