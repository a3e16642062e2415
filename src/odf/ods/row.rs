//! Row structures for ODS spreadsheets.

use super::{Cell, Worksheet};
use crate::common::Result;
use std::ops::RangeInclusive;

/// A row in an ODS spreadsheet.
///
/// A `Row` is a handle: the sheet and a 1-based index. Every query is
/// resolved against the sheet's current structure, so a row handle stays
/// valid across detachment.
#[derive(Debug, Clone)]
pub struct Row {
    sheet: Worksheet,
    index: usize,
}

impl Row {
    pub(crate) fn new(sheet: Worksheet, index: usize) -> Self {
        Self { sheet, index }
    }

    /// Get the row index (1-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the sheet this row belongs to.
    pub fn worksheet(&self) -> &Worksheet {
        &self.sheet
    }

    /// Check whether the row is part of a `table:number-rows-repeated` run.
    pub fn is_repeated(&self) -> bool {
        self.sheet.row_repeat(self.index).is_some_and(|repeat| repeat > 1)
    }

    /// Columns this row currently materializes.
    ///
    /// `1..=n` where `n` counts every column covered by the row's cell
    /// nodes, repeated ones included. A row beyond the table's last row
    /// yields the empty range `1..=0`.
    pub fn used_column_range(&self) -> RangeInclusive<usize> {
        1..=self.sheet.used_columns(self.index)
    }

    /// Check whether `column` is still outside the used range.
    pub fn still_out_of_used_range(&self, column: usize) -> bool {
        !self.used_column_range().contains(&column)
    }

    /// Cell at a 1-based column.
    pub fn cell(&self, column: usize) -> Result<Cell> {
        Cell::new(self.clone(), column)
    }

    /// All cells of the used range, in column order.
    pub fn cells(&self) -> Result<Vec<Cell>> {
        self.used_column_range().map(|column| self.cell(column)).collect()
    }

    /// Make `column` individually addressable.
    ///
    /// Splits the row's run and the cell run covering `column` into at most
    /// three nodes each, or pads the table and row with empty nodes when
    /// `column` lies beyond them. Calling it again is a no-op.
    ///
    /// Cells obtained before a detachment that changed the structure fail
    /// with [`Error::StaleCell`](crate::Error::StaleCell) afterwards.
    pub fn detach_column(&self, column: usize) -> Result<Row> {
        self.sheet.detach_column(self.index, column)?;
        Ok(self.clone())
    }

    /// Make every column of the row individually addressable.
    ///
    /// Fails with [`Error::Unsupported`](crate::Error::Unsupported) when the
    /// row covers more columns than
    /// [`SheetOptions::expansion_limit`](super::SheetOptions::expansion_limit).
    pub fn detach(&self) -> Result<Row> {
        self.sheet.detach_row(self.index)?;
        Ok(self.clone())
    }
}
