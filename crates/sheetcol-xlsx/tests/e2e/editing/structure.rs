//! Tests for inserting and removing columns in a saved file.

use crate::{part_text, Fixture};
use sheetcol_core::Error;
use sheetcol_xlsx::Workbook;

const SHEET: &str = "xl/worksheets/sheet1.xml";

const BODY: &str = r#"<cols><col min="1" max="3" width="15" customWidth="1"/></cols>
<sheetData>
  <row r="1" spans="1:4">
    <c r="A1"><v>1</v></c><c r="B1"><v>2</v></c><c r="C1"><v>3</v></c>
    <c r="D1"><f>SUM(A1:C1)+Other!B1</f><v>6</v></c>
  </row>
  <row r="2" spans="1:3">
    <c r="A2"><f t="shared" ref="A2:C2" si="0">A1*2</f><v>2</v></c>
    <c r="B2"><f t="shared" si="0"/><v>4</v></c>
    <c r="C2"><f t="shared" si="0"/><v>6</v></c>
  </row>
</sheetData>
<mergeCells count="1"><mergeCell ref="A3:B3"/></mergeCells>"#;

fn open() -> Workbook {
    let file = Fixture::new()
        .sheet("Data", BODY)
        .sheet("Other", "<sheetData/>")
        .write();
    Workbook::open(file.path()).unwrap()
}

#[test]
fn test_remove_col_in_saved_file() {
    let wb = open();
    wb.remove_col("Data", "B").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("removed.xlsx");
    wb.save_as(&out).unwrap();

    let xml = part_text(&out, SHEET);
    assert!(xml.contains(r#"<col min="1" max="2" width="15" customWidth="1"/>"#));
    // References on other sheets are not this sheet's columns
    assert!(xml.contains("<f>SUM(A1:B1)+Other!B1</f>"));
    assert!(xml.contains(r#"<f t="shared" ref="A2:B2" si="0">A1*2</f>"#));
    assert!(!xml.contains("spans="));
    assert!(xml.contains(r#"<mergeCell ref="A3:B3"/>"#));

    let reopened = Workbook::open(&out).unwrap();
    assert_eq!(reopened.get_cell_value("Data", "B1").unwrap(), "3");
    assert_eq!(reopened.get_cell_value("Data", "C1").unwrap(), "6");
    assert_eq!(reopened.get_cell_value("Data", "D1").unwrap(), "");
    assert_eq!(reopened.get_col_width("Data", "C").unwrap(), 10.5);
    assert_eq!(reopened.get_cols("Data").unwrap().len(), 3);
}

#[test]
fn test_insert_cols_in_saved_file() {
    let wb = open();
    wb.insert_cols("Data", "A", 2).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("inserted.xlsx");
    wb.save_as(&out).unwrap();

    let xml = part_text(&out, SHEET);
    assert!(xml.contains(r#"<col min="3" max="5" width="15" customWidth="1"/>"#));
    assert!(xml.contains(r#"<c r="F1"><f>SUM(C1:E1)+Other!B1</f><v>6</v></c>"#));
    assert!(xml.contains(r#"<f t="shared" ref="C2:E2" si="0">C1*2</f>"#));

    let reopened = Workbook::open(&out).unwrap();
    assert_eq!(reopened.get_col_width("Data", "A").unwrap(), 10.5);
    assert_eq!(reopened.get_col_width("Data", "E").unwrap(), 15.0);
    assert_eq!(reopened.get_cell_value("Data", "C1").unwrap(), "1");
}

#[test]
fn test_insert_past_last_column_changes_nothing() {
    let wb = open();
    wb.set_cell_value("Data", "XFC1", "edge").unwrap();

    let err = wb.insert_cols("Data", "A", 2).unwrap_err();
    assert_eq!(err.as_core(), Some(&Error::ColumnNumber));

    assert_eq!(wb.get_cell_value("Data", "XFC1").unwrap(), "edge");
    assert_eq!(wb.get_cell_value("Data", "A1").unwrap(), "1");
    assert_eq!(wb.get_col_width("Data", "A").unwrap(), 15.0);
}
