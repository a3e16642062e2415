//! Cell handles for ODS spreadsheets.
//!
//! A [`Cell`] is created on demand for a (row, column) position and
//! classified once into a [`CellMode`]:
//!
//! - `Regular`: the column has a node of its own and writes go straight to it.
//! - `Repeated`: the node stands for several columns (or rows); reads see the
//!   shared value, writes detach the position first.
//! - `Outbound`: the position lies beyond what the row materializes; reads
//!   are empty until the row grows, writes detach (pad) first.
//!
//! Writing through a non-regular cell never changes that cell: the write is
//! re-issued on a freshly obtained regular cell, which
//! [`Cell::set_value`] returns.

use super::inference;
use super::sheet::CellSlot;
use super::value::{CellType, CellValue, ValueKind};
use super::{Row, Worksheet, codec};
use crate::common::{Error, Result};
use crate::odf::constants::TABLE_CELL;
use crate::odf::coordinates::CellCoord;
use crate::odf::elements::element::Element;
use crate::odf::elements::namespace::{Namespace, Namespaces};
use std::fmt;

/// How a cell relates to the nodes of its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellMode {
    /// Individually stored
    Regular,
    /// Part of a compressed run sharing one node
    Repeated,
    /// Outside the row's materialized columns
    Outbound,
}

impl fmt::Display for CellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellMode::Regular => "regular",
            CellMode::Repeated => "repeated",
            CellMode::Outbound => "outbound",
        })
    }
}

enum NodeRef {
    /// Position of a node owned by the sheet
    Bound(CellSlot),
    /// Private blank node of an outbound cell
    Blank(Element),
}

/// A cell in an ODS spreadsheet.
///
/// # Examples
///
/// ```
/// use ods_cell::odf::ods::{CellMode, CellType, CellValue, Worksheet};
///
/// let sheet = Worksheet::from_xml(
///     r#"<table:table><table:table-row>
///         <table:table-cell office:value-type="float" office:value="3.5"><text:p>3.5</text:p></table:table-cell>
///     </table:table-row></table:table>"#,
/// )?;
/// let cell = sheet.cell(1, 1)?;
/// assert_eq!(cell.mode(), CellMode::Regular);
/// assert_eq!(cell.get_type()?, CellType::Float);
/// assert_eq!(cell.get_value()?, CellValue::Number(3.5));
///
/// let cell = cell.set_value("hello")?;
/// assert_eq!(cell.get_value()?, CellValue::from("hello"));
/// # Ok::<(), ods_cell::Error>(())
/// ```
pub struct Cell {
    row: Row,
    column: usize,
    mode: CellMode,
    node: NodeRef,
}

impl Cell {
    /// Create a cell for `column` (1-based) of `row`.
    ///
    /// The mode is decided here and never changes for this instance.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConstructorArgument`] for column 0 or when the node
    /// at the position is not a `table:table-cell` or
    /// `table:covered-table-cell`; [`Error::InvalidCoordinates`] beyond
    /// [`SheetOptions::max_columns`](super::SheetOptions::max_columns).
    pub fn new(row: Row, column: usize) -> Result<Self> {
        if column == 0 {
            return Err(Error::InvalidConstructorArgument(
                "Columns are numbered from 1".to_string(),
            ));
        }
        let sheet = row.worksheet();
        let max_columns = sheet.options().max_columns;
        if column > max_columns {
            return Err(Error::InvalidCoordinates(format!(
                "Column {} is outside 1..={}",
                column, max_columns
            )));
        }

        // a position without a node is exactly one outside the used range
        let (mode, node) = match sheet.resolve_cell(row.index(), column)? {
            Some(slot) if slot.repeated => (CellMode::Repeated, NodeRef::Bound(slot)),
            Some(slot) => (CellMode::Regular, NodeRef::Bound(slot)),
            None => {
                let blank = Element::new(&sheet.namespaces().qualify(Namespace::Table, TABLE_CELL));
                (CellMode::Outbound, NodeRef::Blank(blank))
            },
        };

        Ok(Self {
            row,
            column,
            mode,
            node,
        })
    }

    /// Row this cell belongs to
    pub fn row(&self) -> &Row {
        &self.row
    }

    /// Column index (1-based)
    pub fn column(&self) -> usize {
        self.column
    }

    /// Mode decided at construction
    pub fn mode(&self) -> CellMode {
        self.mode
    }

    /// Check whether the cell shares its node with other positions
    pub fn is_repeated(&self) -> bool {
        self.mode == CellMode::Repeated
    }

    /// Sheet this cell belongs to
    pub fn worksheet(&self) -> &Worksheet {
        self.row.worksheet()
    }

    /// `(row, column)`, both 1-based
    pub fn coordinates(&self) -> (usize, usize) {
        (self.row.index(), self.column)
    }

    /// A1-style address, e.g. `"B3"`
    pub fn address(&self) -> String {
        CellCoord::new(self.row.index(), self.column).to_a1()
    }

    /// Cell at an offset from this one.
    pub fn relative(&self, row_offset: isize, col_offset: isize) -> Result<Cell> {
        let target = CellCoord::new(self.row.index(), self.column).offset(row_offset, col_offset)?;
        self.worksheet().cell(target.row(), target.column())
    }

    /// Read the logical value.
    ///
    /// Percentages read back as the stored fraction.
    pub fn get_value(&self) -> Result<CellValue> {
        match self.mode {
            CellMode::Regular | CellMode::Repeated => self.with_node(|node, ns| {
                let kind = inference::infer(node, None, ns)?;
                codec::decode(node, kind, ns)
            }),
            CellMode::Outbound => match self.promoted()? {
                Some(cell) => cell.get_value(),
                None => Ok(CellValue::Empty),
            },
        }
    }

    /// Store `value`, returning the cell that now holds it.
    ///
    /// A regular cell is written in place and returned. Any other cell asks
    /// its row to detach the column and writes through the regular cell
    /// obtained afterwards; this instance is left untouched and is stale if
    /// the detachment moved nodes. [`CellValue::Empty`] clears the cell.
    ///
    /// # Errors
    ///
    /// [`Error::NotStorable`] when no encoding fits the value,
    /// [`Error::InconsistentNode`] when the node's declared type is
    /// unrecognized yet it has content, [`Error::StaleCell`] when the sheet
    /// changed structure since this cell was created.
    pub fn set_value(self, value: impl Into<CellValue>) -> Result<Cell> {
        let value = value.into();
        match (self.mode, &self.node) {
            (CellMode::Regular, NodeRef::Bound(slot)) => {
                self.ensure_fresh(slot)?;
                let address = self.address();
                self.worksheet().with_cell_node_mut(slot, |node, ns| {
                    store(node, &value, ns, &address)
                })?;
                Ok(self)
            },
            (CellMode::Repeated | CellMode::Outbound, node) => {
                if let NodeRef::Bound(slot) = node {
                    self.ensure_fresh(slot)?;
                }
                let row = self.row.detach_column(self.column)?;
                let cell = row.cell(self.column)?;
                if cell.mode != CellMode::Regular {
                    return Err(Error::UnknownMode(format!(
                        "{} is still {} after detaching",
                        cell.address(),
                        cell.mode
                    )));
                }
                cell.set_value(value)
            },
            (mode, NodeRef::Blank(_)) => Err(Error::UnknownMode(format!(
                "{} is {} without a bound node",
                self.address(),
                mode
            ))),
        }
    }

    /// Value type as seen by readers.
    ///
    /// A node whose declared type is unrecognized although it has content
    /// reports [`CellType::Unknown`] instead of failing.
    pub fn get_type(&self) -> Result<CellType> {
        if self.mode == CellMode::Outbound {
            return match self.promoted()? {
                Some(cell) => cell.get_type(),
                None => Ok(CellType::Empty),
            };
        }
        self.with_node(|node, ns| match inference::infer(node, None, ns) {
            Ok(kind) => Ok(kind.into()),
            Err(Error::InconsistentNode(_)) => Ok(CellType::Unknown),
            Err(e) => Err(e),
        })
    }

    /// The cell node serialized
    pub fn cell_xml(&self) -> Result<String> {
        self.with_node(|node, _| Ok(node.to_xml_string()))
    }

    /// Markup inside the node's first child (usually the `text:p`)
    pub fn inner_xml(&self) -> Result<Option<String>> {
        self.with_node(|node, _| Ok(node.first_element().map(Element::inner_xml)))
    }

    /// Descendants of the cell node named `tag_name`, e.g. `"text:a"`.
    pub fn find_all(&self, tag_name: &str) -> Result<Vec<Element>> {
        self.with_node(|node, _| Ok(node.find_all(tag_name).into_iter().cloned().collect()))
    }

    /// First descendant of the cell node named `tag_name`
    pub fn find_first(&self, tag_name: &str) -> Result<Option<Element>> {
        self.with_node(|node, _| Ok(node.find_first(tag_name).cloned()))
    }

    fn with_node<R>(&self, f: impl FnOnce(&Element, &Namespaces) -> Result<R>) -> Result<R> {
        match &self.node {
            NodeRef::Bound(slot) => {
                self.ensure_fresh(slot)?;
                self.worksheet().with_cell_node(slot, f)
            },
            NodeRef::Blank(node) => f(node, self.worksheet().namespaces()),
        }
    }

    fn ensure_fresh(&self, slot: &CellSlot) -> Result<()> {
        if slot.generation == self.worksheet().generation() {
            Ok(())
        } else {
            Err(Error::StaleCell {
                address: self.address(),
            })
        }
    }

    /// The regular or repeated cell an outbound cell now falls on, if the
    /// row has grown to include its column.
    fn promoted(&self) -> Result<Option<Cell>> {
        if self.row.still_out_of_used_range(self.column) {
            return Ok(None);
        }
        tracing::trace!(address = %self.address(), "outbound cell is now inside the used range");
        let cell = self.row.cell(self.column)?;
        if cell.mode == CellMode::Outbound {
            return Err(Error::UnknownMode(format!(
                "{} is inside the used range but has no node",
                cell.address()
            )));
        }
        Ok(Some(cell))
    }
}

/// Encode `value` into a regular cell's node, or clear it for `Empty`.
fn store(node: &mut Element, value: &CellValue, ns: &Namespaces, address: &str) -> Result<()> {
    if value.is_empty() {
        tracing::trace!(address, "clearing cell");
        codec::clear(node, ns);
        return Ok(());
    }

    let kind = inference::infer(node, Some(value), ns)?;
    if kind == ValueKind::Empty {
        return Err(Error::NotStorable(format!("{:?} at {}", value, address)));
    }
    tracing::trace!(address, ?kind, "encoding cell value");
    codec::encode(node, kind, value, ns)
}

impl fmt::Display for Cell {
    /// Renders the logical value; a cell whose value cannot be read renders
    /// as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_value() {
            Ok(value) => write!(f, "{}", value),
            Err(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("row", &self.row.index())
            .field("col", &self.column)
            .field("address", &self.address())
            .field("type", &self.get_type().ok())
            .field("value", &self.get_value().ok())
            .field("mode", &self.mode)
            .finish()
    }
}
