//! OpenDocument Format support.
//!
//! Only the spreadsheet cell layer is implemented: see [`ods`].

pub mod constants;
pub mod coordinates;
pub mod datatype;
pub mod elements;
pub mod ods;
