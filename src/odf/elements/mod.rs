//! ODF XML element classes.
//!
//! A small in-memory XML tree with the namespace and run-expansion helpers
//! the spreadsheet layer needs.

/// Core element functionality
pub mod element;
/// Namespace handling utilities
pub mod namespace;
/// Repeated row and cell runs
pub mod table_expansion;
