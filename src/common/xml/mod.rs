//! XML escaping utilities.

pub mod escape;

pub use escape::{escape_text, escape_xml, unescape_xml};
