//! ods-cell - typed cell access for OpenDocument spreadsheets
//!
//! This library reads and writes the values of individual cells of an
//! OpenDocument Spreadsheet (.ods) table, working directly on the
//! `table:table` XML.
//!
//! # Features
//!
//! - **Typed values**: floats, strings, dates and percentages, encoded the
//!   way office suites expect (`office:value-type`, `office:value`,
//!   `office:date-value` and a `text:p` display text)
//! - **Type inference**: the value being written decides first, the cell's
//!   declared type second, with a fallback to text
//! - **Compressed rows and cells**: repeated runs
//!   (`table:number-rows-repeated`, `table:number-columns-repeated`) are read
//!   as is and split minimally when a single position is written
//! - **Stale handle detection**: cells obtained before a structural change
//!   report [`Error::StaleCell`] instead of touching the wrong node
//!
//! # Example - Reading and writing cells
//!
//! ```
//! use ods_cell::{CellMode, CellValue, Worksheet};
//!
//! # fn main() -> Result<(), ods_cell::Error> {
//! let sheet = Worksheet::from_xml(
//!     r#"<table:table table:name="Prices">
//!         <table:table-row>
//!             <table:table-cell office:value-type="string"><text:p>Apples</text:p></table:table-cell>
//!             <table:table-cell table:number-columns-repeated="3"/>
//!         </table:table-row>
//!     </table:table>"#,
//! )?;
//!
//! let label = sheet.cell_at("A1")?;
//! assert_eq!(label.get_value()?, CellValue::from("Apples"));
//!
//! // B1 shares a node with C1 and D1; writing it splits the run
//! let price = sheet.cell_at("B1")?;
//! assert_eq!(price.mode(), CellMode::Repeated);
//! let price = price.set_value(1.25)?;
//! assert_eq!(price.mode(), CellMode::Regular);
//! assert_eq!(sheet.cell_at("C1")?.get_value()?, CellValue::Empty);
//!
//! println!("{}", sheet.to_xml_string());
//! # Ok(())
//! # }
//! ```

/// Errors and XML helpers shared across the crate
pub mod common;

/// OpenDocument elements and the spreadsheet cell layer
pub mod odf;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use odf::coordinates::CellCoord;
pub use odf::ods::{Cell, CellMode, CellType, CellValue, Row, SheetOptions, ValueKind, Worksheet};
