//! Unified error types for the cell layer.
//!
//! Every fallible operation in the crate reports one of these variants. None
//! of them are retried or repaired internally; the caller decides whether to
//! skip, report or abort.
use thiserror::Error;

/// Main error type for cell operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A cell was constructed from arguments of the wrong kind
    #[error("Invalid constructor argument: {0}")]
    InvalidConstructorArgument(String),

    /// The candidate value has no viable encoding
    #[error("This value type is not storable to cell: {0}")]
    NotStorable(String),

    /// The node declares an unrecognized type but carries content
    #[error("Inconsistent cell node: {0}")]
    InconsistentNode(String),

    /// Internal state machine violation
    #[error("Unknown cell mode: {0}")]
    UnknownMode(String),

    /// The cell was obtained before its worksheet was structurally changed
    #[error("Cell {address} is stale: its row was detached after the cell was obtained")]
    StaleCell { address: String },

    /// Row or column outside the addressable sheet
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Invalid document structure
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}

/// Result type for cell operations.
pub type Result<T> = std::result::Result<T, Error>;
