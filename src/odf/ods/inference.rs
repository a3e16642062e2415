//! Type inference: which encoding applies to a cell node and an optional
//! candidate value.
//!
//! The candidate decides first: numbers are floats and dates are dates no
//! matter what the node declares. Text (or no candidate) falls back to the
//! node's `office:value-type`, and text that does not fit the declared type
//! is stored as a string instead.

use super::value::{CellValue, ValueKind};
use crate::common::{Error, Result};
use crate::odf::constants::VALUE_TYPE;
use crate::odf::elements::element::{Element, ElementBase};
use crate::odf::elements::namespace::{Namespace, Namespaces};
use phf::{Map, phf_map};

/// Recognized `office:value-type` values
static DECLARED_TYPES: Map<&'static str, ValueKind> = phf_map! {
    "float" => ValueKind::Float,
    "string" => ValueKind::Text,
    "date" => ValueKind::Date,
    "percentage" => ValueKind::Percentage,
};

/// Resolve the value kind for `node`, optionally about to receive `candidate`.
///
/// `Some(CellValue::Empty)` is treated like no candidate at all. An
/// `Empty` result for a text candidate means the value is not storable.
///
/// # Errors
///
/// [`Error::InconsistentNode`] when the declared type is needed, is not
/// recognized, and the node nevertheless has content.
pub fn infer(node: &Element, candidate: Option<&CellValue>, ns: &Namespaces) -> Result<ValueKind> {
    let carried = match candidate {
        Some(CellValue::Number(_)) => return Ok(ValueKind::Float),
        Some(CellValue::Date(_)) => return Ok(ValueKind::Date),
        Some(text @ CellValue::Text(_)) => Some(text),
        Some(CellValue::Empty) | None => None,
    };

    let declared = declared_kind(node, ns)?;
    Ok(match carried {
        Some(value) => reconcile(declared, value),
        None => declared,
    })
}

/// Kind declared by the node's `office:value-type` attribute.
pub fn declared_kind(node: &Element, ns: &Namespaces) -> Result<ValueKind> {
    let name = ns.qualify(Namespace::Office, VALUE_TYPE);
    let declared = node.get_attribute(&name);
    if let Some(kind) = declared.and_then(|value_type| DECLARED_TYPES.get(value_type)) {
        return Ok(*kind);
    }

    if !node.has_children() {
        return Ok(ValueKind::Empty);
    }

    tracing::warn!(
        value_type = declared.unwrap_or(""),
        children = node.children().len(),
        "cell declares an unrecognized value type but has content"
    );
    Err(Error::InconsistentNode(format!(
        "unknown type from {} / children size={} / type={}",
        node.to_xml_string(),
        node.children().len(),
        declared.unwrap_or("")
    )))
}

/// Keep the declared kind when the candidate converts to its
/// representation, otherwise fall back to text.
fn reconcile(declared: ValueKind, value: &CellValue) -> ValueKind {
    let fits = match declared {
        ValueKind::Float | ValueKind::Percentage => value.to_number().is_some(),
        ValueKind::Date => value.to_date().is_some(),
        ValueKind::Text => value.to_text().is_some(),
        ValueKind::Empty => false,
    };

    if fits {
        declared
    } else if value.to_text().is_some() {
        ValueKind::Text
    } else {
        ValueKind::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn node(value_type: Option<&str>) -> Element {
        let mut node = Element::new("table:table-cell");
        if let Some(value_type) = value_type {
            node.set_attribute("office:value-type", value_type);
            node.push_child(Element::with_text("text:p", "x"));
        }
        node
    }

    fn date() -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
    }

    #[test]
    fn test_declared_types() {
        let ns = Namespaces::new();
        assert_eq!(infer(&node(Some("float")), None, &ns).unwrap(), ValueKind::Float);
        assert_eq!(infer(&node(Some("string")), None, &ns).unwrap(), ValueKind::Text);
        assert_eq!(infer(&node(Some("date")), None, &ns).unwrap(), ValueKind::Date);
        assert_eq!(infer(&node(Some("percentage")), None, &ns).unwrap(), ValueKind::Percentage);
    }

    #[test]
    fn test_blank_node_is_empty() {
        let ns = Namespaces::new();
        assert_eq!(infer(&node(None), None, &ns).unwrap(), ValueKind::Empty);
        assert_eq!(infer(&node(None), Some(&CellValue::Empty), &ns).unwrap(), ValueKind::Empty);
    }

    #[test]
    fn test_unrecognized_type_without_content_is_empty() {
        let mut node = Element::new("table:table-cell");
        node.set_attribute("office:value-type", "boolean");
        assert_eq!(infer(&node, None, &Namespaces::new()).unwrap(), ValueKind::Empty);
    }

    #[test]
    fn test_unrecognized_type_with_content_is_inconsistent() {
        let ns = Namespaces::new();
        let unknown = node(Some("currency"));
        assert!(matches!(infer(&unknown, None, &ns), Err(Error::InconsistentNode(_))));
        assert!(matches!(
            infer(&unknown, Some(&CellValue::from("x")), &ns),
            Err(Error::InconsistentNode(_))
        ));

        let mut untyped = Element::new("table:table-cell");
        untyped.push_child(Element::with_text("text:p", "orphan"));
        assert!(infer(&untyped, None, &ns).is_err());
    }

    #[test]
    fn test_candidate_value_wins() {
        let ns = Namespaces::new();
        let inconsistent = node(Some("currency"));
        // numbers and dates never look at the node
        assert_eq!(infer(&inconsistent, Some(&CellValue::Number(1.0)), &ns).unwrap(), ValueKind::Float);
        assert_eq!(infer(&node(Some("string")), Some(&date()), &ns).unwrap(), ValueKind::Date);
        assert_eq!(infer(&node(Some("percentage")), Some(&CellValue::Number(0.5)), &ns).unwrap(), ValueKind::Float);
    }

    #[test]
    fn test_text_on_date_node_falls_back_to_text() {
        let ns = Namespaces::new();
        let date_node = node(Some("date"));
        assert_eq!(infer(&date_node, Some(&CellValue::from("hello")), &ns).unwrap(), ValueKind::Text);
        assert_eq!(infer(&date_node, Some(&CellValue::from("2024-01-31")), &ns).unwrap(), ValueKind::Text);
    }

    #[test]
    fn test_numeric_text_keeps_numeric_type() {
        let ns = Namespaces::new();
        assert_eq!(infer(&node(Some("float")), Some(&CellValue::from("2.5")), &ns).unwrap(), ValueKind::Float);
        assert_eq!(
            infer(&node(Some("percentage")), Some(&CellValue::from("0.25")), &ns).unwrap(),
            ValueKind::Percentage
        );
        assert_eq!(infer(&node(Some("float")), Some(&CellValue::from("2.5kg")), &ns).unwrap(), ValueKind::Text);
    }

    #[test]
    fn test_text_on_blank_node_is_text() {
        let ns = Namespaces::new();
        assert_eq!(infer(&node(None), Some(&CellValue::from("hello")), &ns).unwrap(), ValueKind::Text);
        assert_eq!(infer(&node(None), Some(&CellValue::from("")), &ns).unwrap(), ValueKind::Text);
    }

    #[test]
    fn test_reconcile_empty_candidate_is_not_storable() {
        assert_eq!(reconcile(ValueKind::Float, &CellValue::Empty), ValueKind::Empty);
        assert_eq!(reconcile(ValueKind::Empty, &CellValue::Empty), ValueKind::Empty);
    }
}
