//! ODF element names, attribute names and limits used by the cell layer.
//!
//! Names here are local names; they are qualified with the prefix a
//! document binds to the owning namespace through
//! [`Namespaces`](crate::odf::elements::namespace::Namespaces).

// ============================================================================
// ELEMENTS
// ============================================================================

/// `table:table`
pub const TABLE: &str = "table";

/// `table:table-row`
pub const TABLE_ROW: &str = "table-row";

/// `table:table-cell`
pub const TABLE_CELL: &str = "table-cell";

/// `table:covered-table-cell` (cell hidden under a merged span)
pub const COVERED_TABLE_CELL: &str = "covered-table-cell";

/// `table:table-header-rows`
pub const TABLE_HEADER_ROWS: &str = "table-header-rows";

/// `table:table-row-group`
pub const TABLE_ROW_GROUP: &str = "table-row-group";

/// `table:table-rows`
pub const TABLE_ROWS: &str = "table-rows";

/// `text:p`, the paragraph holding a cell's display text
pub const TEXT_P: &str = "p";

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// `table:name`
pub const NAME: &str = "name";

/// `table:number-columns-repeated`
pub const NUMBER_COLUMNS_REPEATED: &str = "number-columns-repeated";

/// `table:number-rows-repeated`
pub const NUMBER_ROWS_REPEATED: &str = "number-rows-repeated";

/// `office:value-type`
pub const VALUE_TYPE: &str = "value-type";

/// `office:value`, numeric storage for float and percentage cells
pub const VALUE: &str = "value";

/// `office:date-value`
pub const DATE_VALUE: &str = "date-value";

// ============================================================================
// VALUE TYPES
// ============================================================================

/// `office:value-type="float"`
pub const VALUE_TYPE_FLOAT: &str = "float";

/// `office:value-type="string"`
pub const VALUE_TYPE_STRING: &str = "string";

/// `office:value-type="date"`
pub const VALUE_TYPE_DATE: &str = "date";

/// `office:value-type="percentage"`
pub const VALUE_TYPE_PERCENTAGE: &str = "percentage";

/// chrono format of `office:date-value`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// LIMITS
// ============================================================================

/// Widest sheet LibreOffice Calc can address
pub const MAX_COLUMNS: usize = 16_384;

/// Tallest sheet LibreOffice Calc can address
pub const MAX_ROWS: usize = 1_048_576;
