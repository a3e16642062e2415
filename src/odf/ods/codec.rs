//! Value codec: typed cell values to and from their cell node encoding.
//!
//! A cell stores its value in up to three places: the numeric
//! `office:value` attribute, the `office:date-value` attribute and a
//! `text:p` child holding the display text. Encodings are mutually
//! exclusive; [`encode`] clears all three before writing the new one.

use super::value::{CellValue, ValueKind};
use crate::common::{Error, Result};
use crate::odf::constants::{
    DATE_VALUE, TEXT_P, VALUE, VALUE_TYPE, VALUE_TYPE_DATE, VALUE_TYPE_FLOAT, VALUE_TYPE_STRING,
};
use crate::odf::datatype::{Date, Float, Percentage};
use crate::odf::elements::element::{Element, ElementBase};
use crate::odf::elements::namespace::{Namespace, Namespaces};

/// Storage resolved from a candidate before the node is touched.
enum Payload {
    Number { attribute: String, display: String },
    Date(String),
    Text(String),
}

/// Write `value` into `node` using the encoding of `kind`.
///
/// The candidate is converted to the kind's representation first; if that
/// fails (or `kind` is `Empty`) the node is left untouched and
/// [`Error::NotStorable`] is returned.
pub fn encode(node: &mut Element, kind: ValueKind, value: &CellValue, ns: &Namespaces) -> Result<()> {
    let (value_type, payload) = resolve_payload(kind, value)?;

    remove_storage(node, ns);
    node.set_attribute(&ns.qualify(Namespace::Office, VALUE_TYPE), value_type);

    let display = match payload {
        Payload::Number { attribute, display } => {
            node.set_attribute(&ns.qualify(Namespace::Office, VALUE), &attribute);
            display
        },
        Payload::Date(date) => {
            node.set_attribute(&ns.qualify(Namespace::Office, DATE_VALUE), &date);
            date
        },
        Payload::Text(text) => text,
    };
    node.push_child(Element::with_text(&ns.qualify(Namespace::Text, TEXT_P), &display));
    Ok(())
}

fn resolve_payload(kind: ValueKind, value: &CellValue) -> Result<(&'static str, Payload)> {
    let not_storable = || Error::NotStorable(format!("{:?} as {:?}", value, kind));
    match kind {
        ValueKind::Float => {
            let number = value.to_number().filter(|n| n.is_finite()).ok_or_else(not_storable)?;
            let encoded = Float::encode(number);
            Ok((
                VALUE_TYPE_FLOAT,
                Payload::Number {
                    attribute: encoded.clone(),
                    display: encoded,
                },
            ))
        },
        ValueKind::Percentage => {
            let fraction = value.to_number().filter(|n| n.is_finite()).ok_or_else(not_storable)?;
            Ok((
                VALUE_TYPE_FLOAT,
                Payload::Number {
                    attribute: Float::encode(fraction),
                    display: Percentage::display(fraction),
                },
            ))
        },
        ValueKind::Date => {
            let date = value.to_date().ok_or_else(not_storable)?;
            Ok((VALUE_TYPE_DATE, Payload::Date(Date::encode(&date))))
        },
        ValueKind::Text => {
            let text = value.to_text().ok_or_else(not_storable)?;
            Ok((VALUE_TYPE_STRING, Payload::Text(text)))
        },
        ValueKind::Empty => Err(not_storable()),
    }
}

/// Read the value of `node` under the already resolved `kind`.
pub fn decode(node: &Element, kind: ValueKind, ns: &Namespaces) -> Result<CellValue> {
    match kind {
        ValueKind::Empty => Ok(CellValue::Empty),
        ValueKind::Float | ValueKind::Percentage => {
            let name = ns.qualify(Namespace::Office, VALUE);
            let raw = node.get_attribute(&name).ok_or_else(|| {
                Error::InconsistentNode(format!("{:?} cell without {}", kind, name))
            })?;
            Ok(CellValue::Number(Float::decode(raw)?))
        },
        ValueKind::Text => Ok(CellValue::Text(
            node.first_element()
                .map(Element::text_content)
                .unwrap_or_default(),
        )),
        ValueKind::Date => {
            let name = ns.qualify(Namespace::Office, DATE_VALUE);
            let raw = node.get_attribute(&name).ok_or_else(|| {
                Error::InconsistentNode(format!("date cell without {}", name))
            })?;
            Ok(CellValue::Date(Date::decode(raw)?))
        },
    }
}

/// Remove the value type and every storage location, leaving an empty cell.
pub fn clear(node: &mut Element, ns: &Namespaces) {
    remove_storage(node, ns);
    node.remove_attribute(&ns.qualify(Namespace::Office, VALUE_TYPE));
}

fn remove_storage(node: &mut Element, ns: &Namespaces) {
    node.remove_attribute(&ns.qualify(Namespace::Office, VALUE));
    node.remove_attribute(&ns.qualify(Namespace::Office, DATE_VALUE));
    node.clear_children();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::element::Node;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn blank() -> Element {
        Element::new("table:table-cell")
    }

    fn storage(node: &Element) -> (Option<&str>, Option<&str>, String) {
        (
            node.get_attribute("office:value"),
            node.get_attribute("office:date-value"),
            node.first_element().map(Element::text_content).unwrap_or_default(),
        )
    }

    #[test]
    fn test_encode_float() {
        let mut node = blank();
        encode(&mut node, ValueKind::Float, &CellValue::Number(3.5), &Namespaces::new()).unwrap();
        assert_eq!(
            node.to_xml_string(),
            r#"<table:table-cell office:value-type="float" office:value="3.5"><text:p>3.5</text:p></table:table-cell>"#
        );
    }

    #[test]
    fn test_encode_text() {
        let mut node = blank();
        encode(&mut node, ValueKind::Text, &CellValue::from("hello"), &Namespaces::new()).unwrap();
        assert_eq!(node.get_attribute("office:value-type"), Some("string"));
        assert_eq!(storage(&node), (None, None, "hello".to_string()));
    }

    #[test]
    fn test_encode_text_from_number() {
        let mut node = blank();
        encode(&mut node, ValueKind::Text, &CellValue::Number(2.0), &Namespaces::new()).unwrap();
        assert_eq!(decode(&node, ValueKind::Text, &Namespaces::new()).unwrap(), CellValue::from("2"));
    }

    #[test]
    fn test_encode_date() {
        let mut node = blank();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        encode(&mut node, ValueKind::Date, &CellValue::Date(date), &Namespaces::new()).unwrap();
        assert_eq!(node.get_attribute("office:value-type"), Some("date"));
        assert_eq!(storage(&node), (None, Some("2024-02-29"), "2024-02-29".to_string()));
        assert_eq!(decode(&node, ValueKind::Date, &Namespaces::new()).unwrap(), CellValue::Date(date));
    }

    #[test]
    fn test_encode_percentage() {
        let mut node = blank();
        encode(&mut node, ValueKind::Percentage, &CellValue::Number(0.25), &Namespaces::new()).unwrap();
        assert_eq!(node.get_attribute("office:value-type"), Some("float"));
        assert_eq!(storage(&node), (Some("0.25"), None, "25%".to_string()));
        assert_eq!(
            decode(&node, ValueKind::Percentage, &Namespaces::new()).unwrap(),
            CellValue::Number(0.25)
        );
    }

    #[test]
    fn test_encode_empty_fails() {
        let mut node = blank();
        let result = encode(&mut node, ValueKind::Empty, &CellValue::from("x"), &Namespaces::new());
        assert!(matches!(result, Err(Error::NotStorable(_))));
        assert_eq!(node, blank());
    }

    #[test]
    fn test_failed_encode_leaves_node_untouched() {
        let mut node = blank();
        let ns = Namespaces::new();
        encode(&mut node, ValueKind::Text, &CellValue::from("keep"), &ns).unwrap();
        let before = node.clone();

        assert!(encode(&mut node, ValueKind::Float, &CellValue::Number(f64::NAN), &ns).is_err());
        assert!(encode(&mut node, ValueKind::Float, &CellValue::from("abc"), &ns).is_err());
        assert!(encode(&mut node, ValueKind::Date, &CellValue::Number(1.0), &ns).is_err());
        assert_eq!(node, before);
    }

    #[test]
    fn test_encodings_are_mutually_exclusive() {
        let ns = Namespaces::new();
        let date = NaiveDate::from_ymd_opt(2020, 5, 17).unwrap();
        let mut node = blank();

        encode(&mut node, ValueKind::Date, &CellValue::Date(date), &ns).unwrap();
        encode(&mut node, ValueKind::Float, &CellValue::Number(1.25), &ns).unwrap();
        assert_eq!(storage(&node), (Some("1.25"), None, "1.25".to_string()));

        encode(&mut node, ValueKind::Text, &CellValue::from("t"), &ns).unwrap();
        assert_eq!(storage(&node), (None, None, "t".to_string()));
        assert_eq!(node.children().len(), 1);

        encode(&mut node, ValueKind::Date, &CellValue::Date(date), &ns).unwrap();
        assert_eq!(storage(&node), (None, Some("2020-05-17"), "2020-05-17".to_string()));
    }

    #[test]
    fn test_encode_keeps_unrelated_attributes() {
        let mut node = blank();
        node.set_attribute("table:style-name", "ce1");
        encode(&mut node, ValueKind::Float, &CellValue::Number(1.0), &Namespaces::new()).unwrap();
        assert_eq!(node.get_attribute("table:style-name"), Some("ce1"));
    }

    #[test]
    fn test_encode_with_custom_prefixes() {
        let ns = Namespaces::from_declarations([
            ("xmlns:o", "urn:oasis:names:tc:opendocument:xmlns:office:1.0"),
            ("xmlns:t", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
        ]);
        let mut node = blank();
        encode(&mut node, ValueKind::Float, &CellValue::Number(2.0), &ns).unwrap();
        assert_eq!(node.get_attribute("o:value"), Some("2"));
        assert_eq!(node.first_element().map(|p| p.tag_name()), Some("t:p"));
    }

    #[test]
    fn test_decode_text_without_child() {
        let node = blank();
        assert_eq!(
            decode(&node, ValueKind::Text, &Namespaces::new()).unwrap(),
            CellValue::Text(String::new())
        );
    }

    #[test]
    fn test_decode_reads_first_paragraph_only() {
        let mut node = blank();
        node.push_child(Element::with_text("text:p", "first"));
        node.push_child(Element::with_text("text:p", "second"));
        assert_eq!(
            decode(&node, ValueKind::Text, &Namespaces::new()).unwrap(),
            CellValue::from("first")
        );
    }

    #[test]
    fn test_decode_missing_numeric_attribute() {
        let mut node = blank();
        node.set_attribute("office:value-type", "float");
        assert!(matches!(
            decode(&node, ValueKind::Float, &Namespaces::new()),
            Err(Error::InconsistentNode(_))
        ));
    }

    #[test]
    fn test_clear() {
        let ns = Namespaces::new();
        let mut node = blank();
        encode(&mut node, ValueKind::Float, &CellValue::Number(9.0), &ns).unwrap();
        clear(&mut node, &ns);
        assert_eq!(node, blank());
        assert!(!node.children().iter().any(|n| matches!(n, Node::Text(_))));
    }
}
