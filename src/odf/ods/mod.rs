//! OpenDocument Spreadsheet (.ods) cells.
//!
//! This module reads and writes the values of individual cells of an ODS
//! table: [`Worksheet`] owns the `table:table` element, [`Row`] and
//! [`Cell`] are handles into it. Values go through the type inference
//! engine ([`inference`]) and the value codec ([`codec`]).

mod cell;
pub mod codec;
pub mod inference;
mod options;
mod row;
mod sheet;
mod value;

pub use cell::{Cell, CellMode};
pub use options::SheetOptions;
pub use row::Row;
pub use sheet::Worksheet;
pub use value::{CellType, CellValue, ValueKind};
