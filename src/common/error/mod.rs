//! Unified error types for the cell layer.
//!
//! This module provides a single error type covering codec, inference,
//! cell-mode and XML failures, presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
