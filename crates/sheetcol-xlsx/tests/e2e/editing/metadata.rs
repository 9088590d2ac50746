//! Tests for changing column metadata in a saved file.

use crate::{part_text, Fixture};
use pretty_assertions::assert_eq;
use sheetcol_core::Error;
use sheetcol_xlsx::Workbook;

const SHEET: &str = "xl/worksheets/sheet1.xml";

const BODY: &str = r#"<dimension ref="A1:E2"/>
<sheetViews><sheetView workbookViewId="0"/></sheetViews>
<sheetFormatPr defaultRowHeight="15"/>
<cols><col min="2" max="5" width="20.7109375" customWidth="1"/></cols>
<sheetData>
  <row r="2"><c r="A2"><v>1</v></c><c r="C2" t="s"><v>0</v></c></row>
</sheetData>
<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#;

fn fixture() -> Fixture {
    Fixture::new()
        .sheet("Data", BODY)
        .shared_strings(&["label"])
        .cell_xfs(r#"<xf numFmtId="0"/><xf numFmtId="4" applyNumberFormat="1"/>"#)
        .part("docProps/app.xml", "<Properties><Application>host</Application></Properties>")
}

#[test]
fn test_width_inside_span_splits_it() {
    let file = fixture().write();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("split.xlsx");

    let wb = Workbook::open(file.path()).unwrap();
    wb.set_col_width("Data", "C", "C", 30.0).unwrap();
    wb.save_as(&out).unwrap();

    let xml = part_text(&out, SHEET);
    assert!(xml.contains(concat!(
        r#"<cols><col min="2" max="2" width="20.7109375" customWidth="1"/>"#,
        r#"<col min="3" max="3" width="30" customWidth="1"/>"#,
        r#"<col min="4" max="5" width="20.7109375" customWidth="1"/></cols>"#
    )));
    // Elements around the column data are written back as they were
    assert!(xml.contains(r#"<dimension ref="A1:E2"/>"#));
    assert!(xml.contains(r#"<sheetView workbookViewId="0"/>"#));
    assert!(xml.contains("<pageMargins"));
    assert_eq!(
        part_text(&out, "docProps/app.xml"),
        "<Properties><Application>host</Application></Properties>"
    );

    let reopened = Workbook::open(&out).unwrap();
    assert_eq!(reopened.get_col_width("Data", "B").unwrap(), 20.7109375);
    assert_eq!(reopened.get_col_width("Data", "C").unwrap(), 30.0);
    assert_eq!(reopened.get_cell_value("Data", "C2").unwrap(), "label");
}

#[test]
fn test_hide_then_show_restores_span() {
    let file = fixture().write();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("visibility.xlsx");

    let wb = Workbook::open(file.path()).unwrap();
    wb.set_col_visible("Data", "B:E", false).unwrap();
    wb.set_col_visible("Data", "E:B", true).unwrap();
    wb.save_as(&out).unwrap();

    let xml = part_text(&out, SHEET);
    assert!(xml.contains(r#"<cols><col min="2" max="5" width="20.7109375" customWidth="1"/></cols>"#));
}

#[test]
fn test_column_style_against_file_styles() {
    let file = fixture().write();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("style.xlsx");

    let wb = Workbook::open(file.path()).unwrap();
    let err = wb.set_col_style("Data", "B", 2).unwrap_err();
    assert_eq!(err.as_core(), Some(&Error::InvalidStyleId(2)));

    wb.set_col_style("Data", "A:B", 1).unwrap();
    wb.save_as(&out).unwrap();

    let xml = part_text(&out, SHEET);
    // A had no range and gets the sheet default width; B keeps its own
    assert!(xml.contains(r#"<col min="1" max="1" width="10.5" style="1"/>"#));
    assert!(xml.contains(r#"<col min="2" max="2" width="20.7109375" style="1" customWidth="1"/>"#));
    // Cells in existing rows pick up the style
    assert!(xml.contains(r#"<c r="A2" s="1"><v>1</v></c><c r="B2" s="1"/>"#));

    let reopened = Workbook::open(&out).unwrap();
    assert_eq!(reopened.get_col_style("Data", "A").unwrap(), 1);
    assert_eq!(reopened.get_col_style("Data", "C").unwrap(), 0);
}
