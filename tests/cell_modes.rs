//! End-to-end cell behavior over a small ODS table.

use chrono::NaiveDate;
use ods_cell::odf::ods::codec;
use ods_cell::odf::elements::element::Element;
use ods_cell::odf::elements::namespace::Namespaces;
use ods_cell::{CellMode, CellType, CellValue, Error, SheetOptions, ValueKind, Worksheet};
use pretty_assertions::assert_eq;

const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content
    xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
    xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:body>
    <office:spreadsheet>
      <table:table table:name="Budget">
        <table:table-column table:number-columns-repeated="5"/>
        <table:table-row>
          <table:table-cell office:value-type="string"><text:p>Item</text:p></table:table-cell>
          <table:table-cell office:value-type="string"><text:p>Cost</text:p></table:table-cell>
          <table:table-cell office:value-type="string"><text:p>Due</text:p></table:table-cell>
          <table:table-cell office:value-type="string"><text:p>Share</text:p></table:table-cell>
        </table:table-row>
        <table:table-row>
          <table:table-cell office:value-type="string"><text:p>Rent</text:p></table:table-cell>
          <table:table-cell office:value-type="float" office:value="950.5"><text:p>950.5</text:p></table:table-cell>
          <table:table-cell office:value-type="date" office:date-value="2024-03-01"><text:p>2024-03-01</text:p></table:table-cell>
          <table:table-cell office:value-type="percentage" office:value="0.4"><text:p>40%</text:p></table:table-cell>
        </table:table-row>
        <table:table-row table:number-rows-repeated="3">
          <table:table-cell table:number-columns-repeated="4"/>
        </table:table-row>
      </table:table>
    </office:spreadsheet>
  </office:body>
</office:document-content>"#;

fn budget() -> Worksheet {
    Worksheet::from_xml(CONTENT).unwrap()
}

#[test]
fn test_reads_every_kind() {
    let sheet = budget();
    assert_eq!(sheet.name().as_deref(), Some("Budget"));
    assert_eq!(sheet.row_count(), 5);

    assert_eq!(sheet.cell_at("A2").unwrap().get_value().unwrap(), CellValue::from("Rent"));
    assert_eq!(sheet.cell_at("B2").unwrap().get_value().unwrap(), CellValue::Number(950.5));
    assert_eq!(
        sheet.cell_at("C2").unwrap().get_value().unwrap(),
        CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
    assert_eq!(sheet.cell_at("D2").unwrap().get_value().unwrap(), CellValue::Number(0.4));

    let types: Vec<_> = ["A2", "B2", "C2", "D2", "A3", "Z9"]
        .iter()
        .map(|address| sheet.cell_at(address).unwrap().get_type().unwrap())
        .collect();
    assert_eq!(
        types,
        vec![
            CellType::String,
            CellType::Float,
            CellType::Date,
            CellType::Percentage,
            CellType::Empty,
            CellType::Empty,
        ]
    );
}

#[test]
fn test_modes() {
    let sheet = budget();
    assert_eq!(sheet.cell(2, 2).unwrap().mode(), CellMode::Regular);
    assert_eq!(sheet.cell(4, 2).unwrap().mode(), CellMode::Repeated);
    assert_eq!(sheet.cell(2, 5).unwrap().mode(), CellMode::Outbound);
    assert_eq!(sheet.cell(40, 1).unwrap().mode(), CellMode::Outbound);
}

#[test]
fn test_write_into_repeated_block() {
    let sheet = budget();
    let before = sheet.generation();

    let cell = sheet.cell_at("C4").unwrap().set_value(12).unwrap();
    assert_eq!(cell.mode(), CellMode::Regular);
    assert_eq!(cell.address(), "C4");
    assert!(sheet.generation() > before);

    for address in ["A3", "C3", "B4", "D4", "C5"] {
        assert_eq!(
            sheet.cell_at(address).unwrap().get_value().unwrap(),
            CellValue::Empty,
            "{}",
            address
        );
    }
    assert_eq!(sheet.cell_at("C4").unwrap().get_value().unwrap(), CellValue::Number(12.0));
    assert_eq!(sheet.row_count(), 5);
    // neighbours in the same row still share a node
    assert!(sheet.cell_at("A4").unwrap().is_repeated());
}

#[test]
fn test_write_far_outside() {
    let sheet = budget();
    let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
    let cell = sheet.cell_at("H9").unwrap().set_value(date).unwrap();

    assert_eq!(cell.get_value().unwrap(), CellValue::Date(date));
    assert_eq!(sheet.row_count(), 9);
    assert_eq!(sheet.row(9).unwrap().used_column_range(), 1..=8);
    assert_eq!(sheet.row(7).unwrap().used_column_range(), 1..=0);
    assert!(sheet.to_xml_string().contains(r#"office:date-value="2025-12-24""#));
}

#[test]
fn test_type_fallback_on_write() {
    let sheet = budget();
    let due = sheet.cell_at("C2").unwrap().set_value("soon").unwrap();
    assert_eq!(due.get_type().unwrap(), CellType::String);

    let share = sheet.cell_at("D2").unwrap().set_value("0.5").unwrap();
    assert_eq!(share.inner_xml().unwrap().as_deref(), Some("50%"));

    let cost = sheet.cell_at("B2").unwrap().set_value("n/a").unwrap();
    assert_eq!(cost.get_value().unwrap(), CellValue::from("n/a"));
}

#[test]
fn test_stale_cells_are_reported() {
    let sheet = budget();
    let held = sheet.cell_at("B2").unwrap();
    sheet.cell_at("A5").unwrap().set_value("x").unwrap();

    assert!(matches!(held.get_value(), Err(Error::StaleCell { .. })));
    assert_eq!(
        sheet.cell_at("B2").unwrap().get_value().unwrap(),
        CellValue::Number(950.5)
    );
}

#[test]
fn test_outbound_read_follows_growth() {
    let sheet = budget();
    let watcher = sheet.cell_at("F2").unwrap();
    assert_eq!(watcher.get_value().unwrap(), CellValue::Empty);

    sheet.cell_at("F2").unwrap().set_value("late").unwrap();
    assert_eq!(watcher.get_value().unwrap(), CellValue::from("late"));
    assert_eq!(watcher.to_string(), "late");
}

#[test]
fn test_relative_navigation() {
    let sheet = budget();
    let cost = sheet.cell_at("B2").unwrap();
    assert_eq!(cost.relative(-1, 0).unwrap().get_value().unwrap(), CellValue::from("Cost"));
    assert_eq!(cost.relative(0, 1).unwrap().coordinates(), (2, 3));
    assert!(cost.relative(0, -2).is_err());
}

#[test]
fn test_full_row_detach_respects_limit() {
    let table: Element = r#"<table:table><table:table-row><table:table-cell table:number-columns-repeated="1024"/></table:table-row></table:table>"#
        .parse()
        .unwrap();
    let sheet = Worksheet::with_options(table, SheetOptions::new().with_expansion_limit(100)).unwrap();
    let row = sheet.row(1).unwrap();
    assert!(matches!(row.detach(), Err(Error::Unsupported(_))));

    // targeted detachment is not limited
    let cell = row.cell(600).unwrap().set_value(1).unwrap();
    assert_eq!(cell.get_value().unwrap(), CellValue::Number(1.0));
    assert_eq!(sheet.to_element().first_element().unwrap().elements().count(), 3);
}

#[test]
fn test_codec_percentage_scenario() {
    let ns = Namespaces::new();
    let mut node = Element::new("table:table-cell");
    codec::encode(&mut node, ValueKind::Percentage, &CellValue::Number(0.25), &ns).unwrap();
    assert_eq!(
        node.to_xml_string(),
        r#"<table:table-cell office:value-type="float" office:value="0.25"><text:p>25%</text:p></table:table-cell>"#
    );
    assert_eq!(
        codec::decode(&node, ValueKind::Percentage, &ns).unwrap(),
        CellValue::Number(0.25)
    );
}

#[test]
fn test_whitespace_string_under_custom_text_prefix() {
    let custom = Worksheet::from_xml(
        r#"<office:document-content
            xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
            xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
            xmlns:t="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
          <table:table table:name="Spaces">
            <table:table-row>
              <table:table-cell office:value-type="string"><t:p>  </t:p></table:table-cell>
            </table:table-row>
          </table:table>
        </office:document-content>"#,
    )
    .unwrap();
    let canonical = Worksheet::from_xml(
        r#"<table:table table:name="Spaces">
            <table:table-row>
              <table:table-cell office:value-type="string"><text:p>  </text:p></table:table-cell>
            </table:table-row>
          </table:table>"#,
    )
    .unwrap();

    let value = custom.cell_at("A1").unwrap().get_value().unwrap();
    assert_eq!(value, CellValue::from("  "));
    assert_eq!(value, canonical.cell_at("A1").unwrap().get_value().unwrap());
}

#[test]
fn test_unpadded_date_is_inconsistent() {
    let sheet = Worksheet::from_xml(
        r#"<table:table><table:table-row><table:table-cell office:value-type="date" office:date-value="2024-1-5"/></table:table-row></table:table>"#,
    )
    .unwrap();
    let cell = sheet.cell_at("A1").unwrap();
    assert!(matches!(cell.get_value(), Err(Error::InconsistentNode(_))));
    // the declared type is still readable
    assert_eq!(cell.get_type().unwrap(), CellType::Date);
}
