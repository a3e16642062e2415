//! Namespace handling utilities for ODF XML elements.
//!
//! The cell layer touches three namespaces: `table` (cells, rows, repeat
//! counts), `office` (value type and value attributes) and `text` (the
//! paragraph that carries a cell's display text). Documents almost always
//! bind them to their canonical prefixes, but the binding is read from the
//! document whenever it is declared.

// ============================================================================
// NAMESPACE CONSTANTS
// ============================================================================

/// Office namespace
pub const OFFICENS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// Table namespace
pub const TABLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// Text namespace
pub const TEXTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

// ============================================================================
// QUALIFIED NAME
// ============================================================================

/// Qualified name split into prefix and local part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    /// Prefix, if the name has one
    pub prefix: Option<&'a str>,
    /// Local name (without prefix)
    pub local_name: &'a str,
}

impl<'a> QualifiedName<'a> {
    /// Split a `prefix:local` name.
    pub fn parse(name: &'a str) -> Self {
        match name.split_once(':') {
            Some((prefix, local_name)) => Self {
                prefix: Some(prefix),
                local_name,
            },
            None => Self {
                prefix: None,
                local_name: name,
            },
        }
    }
}

impl std::fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

// ============================================================================
// NAMESPACE RESOLUTION
// ============================================================================

/// The namespaces the cell layer reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `urn:oasis:names:tc:opendocument:xmlns:table:1.0`
    Table,
    /// `urn:oasis:names:tc:opendocument:xmlns:office:1.0`
    Office,
    /// `urn:oasis:names:tc:opendocument:xmlns:text:1.0`
    Text,
}

impl Namespace {
    /// Namespace URI
    pub const fn uri(self) -> &'static str {
        match self {
            Namespace::Table => TABLENS,
            Namespace::Office => OFFICENS,
            Namespace::Text => TEXTNS,
        }
    }

    /// Prefix used by conforming producers
    pub const fn canonical_prefix(self) -> &'static str {
        match self {
            Namespace::Table => "table",
            Namespace::Office => "office",
            Namespace::Text => "text",
        }
    }
}

/// Prefix bindings for one document.
///
/// Built from the `xmlns:*` declarations of the document (or of the
/// `table:table` element being wrapped). Undeclared namespaces fall back to
/// their canonical prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    table: Option<String>,
    office: Option<String>,
    text: Option<String>,
}

impl Namespaces {
    /// Resolver using the canonical prefixes only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect bindings from `xmlns:prefix="uri"` declarations.
    ///
    /// # Examples
    ///
    /// ```
    /// use ods_cell::odf::elements::namespace::{Namespace, Namespaces};
    ///
    /// let ns = Namespaces::from_declarations([
    ///     ("xmlns:t", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
    /// ]);
    /// assert_eq!(ns.prefix(Namespace::Table), "t");
    /// assert_eq!(ns.prefix(Namespace::Office), "office");
    /// ```
    pub fn from_declarations<'a, I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut namespaces = Self::default();
        for (key, uri) in declarations {
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.bind(prefix, uri);
            }
        }
        namespaces
    }

    /// Bind `prefix` to `uri` if the URI is one the cell layer uses.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        let slot = match uri {
            TABLENS => &mut self.table,
            OFFICENS => &mut self.office,
            TEXTNS => &mut self.text,
            _ => return,
        };
        *slot = Some(prefix.to_string());
    }

    /// Prefix bound to `namespace` in this document.
    pub fn prefix(&self, namespace: Namespace) -> &str {
        let bound = match namespace {
            Namespace::Table => self.table.as_deref(),
            Namespace::Office => self.office.as_deref(),
            Namespace::Text => self.text.as_deref(),
        };
        bound.unwrap_or(namespace.canonical_prefix())
    }

    /// Qualified name for `local` in `namespace`, e.g. `office:value-type`.
    pub fn qualify(&self, namespace: Namespace, local: &str) -> String {
        format!("{}:{}", self.prefix(namespace), local)
    }

    /// Check whether `name` is `local` in `namespace` under these bindings.
    pub fn matches(&self, name: &str, namespace: Namespace, local: &str) -> bool {
        let qname = QualifiedName::parse(name);
        qname.local_name == local && qname.prefix == Some(self.prefix(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_parse() {
        let name = QualifiedName::parse("table:table-cell");
        assert_eq!(name.prefix, Some("table"));
        assert_eq!(name.local_name, "table-cell");
        assert_eq!(name.to_string(), "table:table-cell");

        let bare = QualifiedName::parse("cell");
        assert_eq!(bare.prefix, None);
        assert_eq!(bare.local_name, "cell");
    }

    #[test]
    fn test_default_prefixes() {
        let ns = Namespaces::new();
        assert_eq!(Namespace::Table.uri(), TABLENS);
        assert_eq!(ns.qualify(Namespace::Office, "value-type"), "office:value-type");
        assert_eq!(ns.qualify(Namespace::Text, "p"), "text:p");
        assert!(ns.matches("table:table-cell", Namespace::Table, "table-cell"));
        assert!(!ns.matches("t:table-cell", Namespace::Table, "table-cell"));
    }

    #[test]
    fn test_custom_bindings() {
        let ns = Namespaces::from_declarations([
            ("xmlns:o", OFFICENS),
            ("xmlns:x", "urn:something-else"),
            ("xmlns", TEXTNS),
        ]);
        assert_eq!(ns.prefix(Namespace::Office), "o");
        // default namespace declarations are not prefix bindings
        assert_eq!(ns.prefix(Namespace::Text), "text");
        assert!(ns.matches("o:value", Namespace::Office, "value"));
    }
}
