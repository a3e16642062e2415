//! Sheet structures for ODS spreadsheets.
//!
//! A [`Worksheet`] owns one `table:table` element. Rows and cells inside it
//! are handed out as lightweight handles ([`Row`], [`Cell`]) that locate
//! their nodes by position; the sheet keeps a structural generation counter
//! so that cell handles notice when detachment has moved nodes around.

use super::options::SheetOptions;
use super::{Cell, Row};
use crate::common::{Error, Result};
use crate::odf::constants::{
    COVERED_TABLE_CELL, NAME, NUMBER_COLUMNS_REPEATED, NUMBER_ROWS_REPEATED, TABLE, TABLE_CELL,
    TABLE_HEADER_ROWS, TABLE_ROW, TABLE_ROW_GROUP, TABLE_ROWS,
};
use crate::odf::coordinates::CellCoord;
use crate::odf::elements::element::{Element, ElementBase};
use crate::odf::elements::namespace::{Namespace, Namespaces};
use crate::odf::elements::table_expansion::{
    element_at, element_at_mut, expand_all, extent, locate, pad, split_run,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Where a cell's node lives inside the table, as of `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellSlot {
    pub row_position: usize,
    pub cell_position: usize,
    pub repeated: bool,
    pub generation: u64,
}

struct SheetData {
    table: RefCell<Element>,
    namespaces: Namespaces,
    options: SheetOptions,
    generation: std::cell::Cell<u64>,
}

/// A sheet (worksheet) in an ODS spreadsheet.
///
/// Cloning a `Worksheet` is cheap and yields another handle to the same
/// sheet. Access is single-threaded; the sheet is neither `Send` nor
/// `Sync`.
///
/// # Examples
///
/// ```
/// use ods_cell::odf::ods::{CellValue, Worksheet};
///
/// let sheet = Worksheet::new("Sheet1");
/// let cell = sheet.cell_at("B3")?.set_value(3.5)?;
/// assert_eq!(cell.get_value()?, CellValue::Number(3.5));
/// assert_eq!(sheet.row_count(), 3);
/// # Ok::<(), ods_cell::Error>(())
/// ```
#[derive(Clone)]
pub struct Worksheet {
    inner: Rc<SheetData>,
}

impl Worksheet {
    /// Create an empty sheet named `name`.
    pub fn new(name: &str) -> Self {
        let namespaces = Namespaces::new();
        let mut table = Element::new(&namespaces.qualify(Namespace::Table, TABLE));
        table.set_attribute(&namespaces.qualify(Namespace::Table, NAME), name);
        Self::from_parts(table, namespaces, SheetOptions::default())
    }

    /// Wrap a `table:table` element using default options.
    pub fn from_element(element: Element) -> Result<Self> {
        Self::with_options(element, SheetOptions::default())
    }

    /// Wrap a `table:table` element.
    ///
    /// Prefixes are taken from `xmlns:*` declarations on the element. Tables
    /// that group rows (`table:table-header-rows`, `table:table-row-group`,
    /// `table:table-rows`) are not supported.
    pub fn with_options(element: Element, options: SheetOptions) -> Result<Self> {
        let namespaces = Namespaces::from_declarations(declarations(&element));
        Self::validate(&element, &namespaces)?;
        Ok(Self::from_parts(element, namespaces, options))
    }

    /// Parse a sheet from XML.
    ///
    /// `xml` is either a `table:table` element or a document containing
    /// one, such as `content.xml`; the first table found is used.
    /// Namespace declarations on the document root apply to the table.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root: Element = xml.parse()?;
        let mut namespaces = Namespaces::from_declarations(declarations(&root));
        if namespaces.matches(root.tag_name(), Namespace::Table, TABLE) {
            Self::validate(&root, &namespaces)?;
            return Ok(Self::from_parts(root, namespaces, SheetOptions::default()));
        }

        let table = root
            .find_first(&namespaces.qualify(Namespace::Table, TABLE))
            .cloned()
            .ok_or_else(|| Error::InvalidFormat("No table:table element found".to_string()))?;
        for (key, uri) in declarations(&table) {
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.bind(prefix, uri);
            }
        }
        Self::validate(&table, &namespaces)?;
        Ok(Self::from_parts(table, namespaces, SheetOptions::default()))
    }

    fn from_parts(table: Element, namespaces: Namespaces, options: SheetOptions) -> Self {
        Self {
            inner: Rc::new(SheetData {
                table: RefCell::new(table),
                namespaces,
                options,
                generation: std::cell::Cell::new(0),
            }),
        }
    }

    fn validate(element: &Element, namespaces: &Namespaces) -> Result<()> {
        if !namespaces.matches(element.tag_name(), Namespace::Table, TABLE) {
            return Err(Error::InvalidFormat(format!(
                "Element {} is not a table",
                element.tag_name()
            )));
        }
        let grouped = element.elements().find(|child| {
            [TABLE_HEADER_ROWS, TABLE_ROW_GROUP, TABLE_ROWS]
                .iter()
                .any(|local| namespaces.matches(child.tag_name(), Namespace::Table, local))
        });
        match grouped {
            Some(group) => Err(Error::Unsupported(format!(
                "Row grouping with {} is not supported",
                group.tag_name()
            ))),
            None => Ok(()),
        }
    }

    /// Sheet name (`table:name`)
    pub fn name(&self) -> Option<String> {
        let name = self.inner.namespaces.qualify(Namespace::Table, NAME);
        self.inner.table.borrow().get_attribute(&name).map(str::to_string)
    }

    /// Options this sheet was created with
    pub fn options(&self) -> &SheetOptions {
        &self.inner.options
    }

    /// Prefix bindings of the underlying document
    pub fn namespaces(&self) -> &Namespaces {
        &self.inner.namespaces
    }

    /// Structural generation; bumped whenever detachment moves nodes.
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Number of rows the table materializes, repeated rows included.
    pub fn row_count(&self) -> usize {
        let attribute = self.rows_repeated();
        extent(self.inner.table.borrow().children(), &attribute, |e| self.is_row(e))
    }

    /// Row handle for a 1-based index.
    pub fn row(&self, index: usize) -> Result<Row> {
        if index == 0 || index > self.inner.options.max_rows {
            return Err(Error::InvalidCoordinates(format!(
                "Row {} is outside 1..={}",
                index, self.inner.options.max_rows
            )));
        }
        Ok(Row::new(self.clone(), index))
    }

    /// Cell at a 1-based row and column.
    pub fn cell(&self, row: usize, column: usize) -> Result<Cell> {
        self.row(row)?.cell(column)
    }

    /// Cell at an A1-style address such as `"B3"`.
    pub fn cell_at(&self, address: &str) -> Result<Cell> {
        let coord: CellCoord = address.parse()?;
        self.cell(coord.row(), coord.column())
    }

    /// Copy of the underlying `table:table` element
    pub fn to_element(&self) -> Element {
        self.inner.table.borrow().clone()
    }

    /// Serialize the underlying `table:table` element
    pub fn to_xml_string(&self) -> String {
        self.inner.table.borrow().to_xml_string()
    }

    fn rows_repeated(&self) -> String {
        self.inner.namespaces.qualify(Namespace::Table, NUMBER_ROWS_REPEATED)
    }

    fn columns_repeated(&self) -> String {
        self.inner.namespaces.qualify(Namespace::Table, NUMBER_COLUMNS_REPEATED)
    }

    fn is_row(&self, element: &Element) -> bool {
        self.inner.namespaces.matches(element.tag_name(), Namespace::Table, TABLE_ROW)
    }

    fn is_cell(&self, element: &Element) -> bool {
        let ns = &self.inner.namespaces;
        ns.matches(element.tag_name(), Namespace::Table, TABLE_CELL)
            || ns.matches(element.tag_name(), Namespace::Table, COVERED_TABLE_CELL)
    }

    fn bump_generation(&self) {
        self.inner.generation.set(self.inner.generation.get() + 1);
    }

    /// Repeat count of the row run covering `index`, if materialized.
    pub(crate) fn row_repeat(&self, index: usize) -> Option<usize> {
        let attribute = self.rows_repeated();
        let table = self.inner.table.borrow();
        locate(table.children(), &attribute, |e| self.is_row(e), index).map(|run| run.repeat)
    }

    /// Number of columns materialized by row `index`.
    pub(crate) fn used_columns(&self, index: usize) -> usize {
        let rows_attribute = self.rows_repeated();
        let columns_attribute = self.columns_repeated();
        let table = self.inner.table.borrow();
        locate(table.children(), &rows_attribute, |e| self.is_row(e), index)
            .and_then(|run| element_at(table.children(), run.position))
            .map_or(0, |row| extent(row.children(), &columns_attribute, |_| true))
    }

    /// Locate the node for (`index`, `column`), or `None` when it lies
    /// outside the materialized extent.
    pub(crate) fn resolve_cell(&self, index: usize, column: usize) -> Result<Option<CellSlot>> {
        let rows_attribute = self.rows_repeated();
        let columns_attribute = self.columns_repeated();
        let table = self.inner.table.borrow();

        let Some(row_run) = locate(table.children(), &rows_attribute, |e| self.is_row(e), index) else {
            return Ok(None);
        };
        let Some(row) = element_at(table.children(), row_run.position) else {
            return Ok(None);
        };
        let Some(cell_run) = locate(row.children(), &columns_attribute, |_| true, column) else {
            return Ok(None);
        };
        let Some(cell) = element_at(row.children(), cell_run.position) else {
            return Ok(None);
        };
        if !self.is_cell(cell) {
            return Err(Error::InvalidConstructorArgument(format!(
                "Node {} at {} is not a table cell",
                cell.tag_name(),
                CellCoord::new(index, column)
            )));
        }

        Ok(Some(CellSlot {
            row_position: row_run.position,
            cell_position: cell_run.position,
            repeated: row_run.repeat > 1 || cell_run.repeat > 1,
            generation: self.generation(),
        }))
    }

    /// Run `f` on the node at `slot`.
    pub(crate) fn with_cell_node<R>(
        &self,
        slot: &CellSlot,
        f: impl FnOnce(&Element, &Namespaces) -> Result<R>,
    ) -> Result<R> {
        let table = self.inner.table.borrow();
        let node = element_at(table.children(), slot.row_position)
            .and_then(|row| element_at(row.children(), slot.cell_position))
            .ok_or_else(|| missing_node(slot))?;
        f(node, &self.inner.namespaces)
    }

    /// Run `f` on the node at `slot`, mutably.
    pub(crate) fn with_cell_node_mut<R>(
        &self,
        slot: &CellSlot,
        f: impl FnOnce(&mut Element, &Namespaces) -> Result<R>,
    ) -> Result<R> {
        let mut table = self.inner.table.borrow_mut();
        let node = element_at_mut(table.children_mut(), slot.row_position)
            .and_then(|row| element_at_mut(row.children_mut(), slot.cell_position))
            .ok_or_else(|| missing_node(slot))?;
        f(node, &self.inner.namespaces)
    }

    /// Give row `index` an individual node, padding the table with empty
    /// rows if needed. Returns the row's position and whether the table
    /// structure changed.
    fn detach_row_node(&self, table: &mut Element, index: usize) -> Result<(usize, bool)> {
        let attribute = self.rows_repeated();
        let is_row = |e: &Element| self.is_row(e);
        let rows = table.children_mut();

        let mut changed = false;
        let run = match locate(rows, &attribute, is_row, index) {
            Some(run) => run,
            None => {
                let missing = index - extent(rows, &attribute, is_row);
                tracing::debug!(row = index, missing, "padding table with empty rows");
                changed = true;
                let blank = Element::new(&self.inner.namespaces.qualify(Namespace::Table, TABLE_ROW));
                pad(rows, &attribute, is_row, blank, missing)
            },
        };
        if run.repeat > 1 {
            tracing::debug!(row = index, repeat = run.repeat, "splitting repeated row run");
            changed = true;
        }
        let position = split_run(rows, run, &attribute, index)?;
        Ok((position, changed))
    }

    /// Make (`index`, `column`) an individual cell node, splitting or
    /// padding at most one row run and one cell run.
    pub(crate) fn detach_column(&self, index: usize, column: usize) -> Result<()> {
        let attribute = self.columns_repeated();
        let mut table = self.inner.table.borrow_mut();
        let (row_position, mut changed) = self.detach_row_node(&mut table, index)?;
        let row = element_at_mut(table.children_mut(), row_position)
            .ok_or_else(|| Error::InvalidFormat(format!("Row {} has no node", index)))?;
        let cells = row.children_mut();

        let run = match locate(cells, &attribute, |_| true, column) {
            Some(run) => run,
            None => {
                let missing = column - extent(cells, &attribute, |_| true);
                tracing::debug!(row = index, column, missing, "padding row with empty cells");
                changed = true;
                let blank = Element::new(&self.inner.namespaces.qualify(Namespace::Table, TABLE_CELL));
                pad(cells, &attribute, |_| true, blank, missing)
            },
        };
        if run.repeat > 1 {
            tracing::debug!(row = index, column, repeat = run.repeat, "splitting repeated cell run");
            changed = true;
        }
        split_run(cells, run, &attribute, column)?;

        if changed {
            self.bump_generation();
        }
        Ok(())
    }

    /// Give every column of row `index` an individual cell node.
    pub(crate) fn detach_row(&self, index: usize) -> Result<()> {
        let attribute = self.columns_repeated();
        let mut table = self.inner.table.borrow_mut();
        let limit = self.inner.options.expansion_limit;

        // check the limit before touching the row run
        let used = locate(table.children(), &self.rows_repeated(), |e| self.is_row(e), index)
            .and_then(|run| element_at(table.children(), run.position))
            .map_or(0, |row| extent(row.children(), &attribute, |_| true));
        if used > limit {
            return Err(Error::Unsupported(format!(
                "Row {} spans {} columns, more than the expansion limit of {}",
                index, used, limit
            )));
        }

        let (row_position, mut changed) = self.detach_row_node(&mut table, index)?;
        let row = element_at_mut(table.children_mut(), row_position)
            .ok_or_else(|| Error::InvalidFormat(format!("Row {} has no node", index)))?;
        if expand_all(row.children_mut(), &attribute, |_| true, limit)? {
            tracing::debug!(row = index, columns = used, "expanded repeated cells of row");
            changed = true;
        }

        if changed {
            self.bump_generation();
        }
        Ok(())
    }
}

fn declarations(element: &Element) -> impl Iterator<Item = (&str, &str)> {
    element
        .attributes()
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
}

fn missing_node(slot: &CellSlot) -> Error {
    Error::InvalidFormat(format!(
        "No cell node at row position {}, cell position {}",
        slot.row_position, slot.cell_position
    ))
}

impl FromStr for Worksheet {
    type Err = Error;

    fn from_str(xml: &str) -> Result<Self> {
        Self::from_xml(xml)
    }
}

impl fmt::Debug for Worksheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worksheet")
            .field("name", &self.name())
            .field("rows", &self.row_count())
            .field("generation", &self.generation())
            .finish()
    }
}
