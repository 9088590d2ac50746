//! Tests for reading column metadata written as multi-column spans.

use crate::Fixture;
use sheetcol_core::{Error, GraphicOptions};
use sheetcol_xlsx::{Workbook, XlsxError};

const BODY: &str = r#"<dimension ref="A1:J2"/>
<sheetViews><sheetView tabSelected="1" workbookViewId="0"/></sheetViews>
<sheetFormatPr baseColWidth="10" defaultColWidth="12" defaultRowHeight="15"/>
<cols>
  <col min="2" max="5" width="20.7109375" customWidth="1"/>
  <col min="7" max="8" width="9" hidden="1" outlineLevel="2" collapsed="1" customWidth="1"/>
  <col min="10" max="10" width="9" style="1" customWidth="1"/>
</cols>
<sheetData>
  <row r="2" ht="30" customHeight="1"><c r="A2"><v>1</v></c></row>
</sheetData>
<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#;

fn open() -> Workbook {
    let file = Fixture::new()
        .sheet("Data", BODY)
        .cell_xfs(r#"<xf numFmtId="0"/><xf numFmtId="4"/>"#)
        .write();
    Workbook::open(file.path()).unwrap()
}

#[test]
fn test_spans_apply_to_every_column() {
    let wb = open();

    for col in ["B", "C", "D", "E"] {
        assert_eq!(wb.get_col_width("Data", col).unwrap(), 20.7109375, "column {col}");
    }
    // Columns outside every span fall back to the sheet default
    assert_eq!(wb.get_col_width("Data", "A").unwrap(), 12.0);
    assert_eq!(wb.get_col_width("Data", "F").unwrap(), 12.0);

    for col in ["G", "H"] {
        assert!(!wb.get_col_visible("Data", col).unwrap());
        assert_eq!(wb.get_col_outline_level("Data", col).unwrap(), 2);
    }
    assert!(wb.get_col_visible("Data", "I").unwrap());
    assert_eq!(wb.get_col_outline_level("Data", "I").unwrap(), 0);

    assert_eq!(wb.get_col_style("Data", "J").unwrap(), 1);
    assert_eq!(wb.get_col_style("Data", "E").unwrap(), 0);
}

#[test]
fn test_sheet_names_are_case_insensitive() {
    let wb = open();
    assert_eq!(wb.get_col_width("DATA", "C").unwrap(), 20.7109375);
    assert!(matches!(
        wb.get_col_width("Other", "C"),
        Err(XlsxError::Core(Error::SheetNotFound(_)))
    ));
}

#[test]
fn test_pixel_sizes() {
    let wb = open();
    // 12 * 8 + 0.5, floored
    assert_eq!(wb.get_col_width_pixels("Data", "A").unwrap(), 96);
    assert_eq!(wb.get_col_width_pixels("Data", "C").unwrap(), 166);
    assert_eq!(wb.get_col_width_pixels("Data", "G").unwrap(), 72);

    // Default height 15 pt and explicit 30 pt
    assert_eq!(wb.get_row_height_pixels("Data", 1).unwrap(), 18);
    assert_eq!(wb.get_row_height_pixels("Data", 2).unwrap(), 36);
    assert!(wb.get_row_height_pixels("Data", 0).is_err());
}

#[test]
fn test_anchor_over_file_widths() {
    let wb = open();
    let anchor = wb
        .position_object_pixels("Data", "A1", 300, 40, &GraphicOptions::default())
        .unwrap();
    // 300 px from A's left edge: A (96) + B (166) leaves 38 px into C
    assert_eq!((anchor.col_start, anchor.x1), (0, 0));
    assert_eq!((anchor.col_end, anchor.x2), (2, 38));
    // 40 px down: row 1 (18) leaves 22 px into row 2 (36)
    assert_eq!((anchor.row_end, anchor.y2), (1, 22));
}
