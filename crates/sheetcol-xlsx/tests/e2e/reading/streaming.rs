//! Tests for streaming columns out of a saved sheet.

use crate::Fixture;
use sheetcol_xlsx::{Options, Workbook};

const BODY: &str = r#"<dimension ref="A1:D4"/>
<sheetData>
  <row r="1" spans="1:2"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
  <row r="3" spans="2:4">
    <c r="B3"><f>SUM(B1:B2)</f><v>2.5</v></c>
    <c r="D3" t="inlineStr"><is><r><t>rich </t></r><r><rPr><b/></rPr><t>text</t></r></is></c>
  </row>
  <row><c t="b"><v>0</v></c><c/><c s="0"><v>-0.1</v></c></row>
</sheetData>"#;

fn open() -> Workbook {
    let file = Fixture::new()
        .sheet("Report", BODY)
        .shared_strings(&["Name", "Value"])
        .write();
    Workbook::open(file.path()).unwrap()
}

#[test]
fn test_stream_columns() {
    let wb = open();
    let mut cols = wb.cols("Report").unwrap();
    assert_eq!(cols.sheet(), "Report");
    // The row without `r` follows row 3; its cells without `r` count from A
    assert_eq!((cols.total_cols(), cols.total_rows()), (4, 4));

    let mut seen = Vec::new();
    while cols.next_col() {
        seen.push(cols.rows(&Options::default()).unwrap());
    }
    assert_eq!(
        seen,
        vec![
            vec!["Name", "", "", "FALSE"],
            vec!["Value", "", "2.5", ""],
            vec!["", "", "", "-0.1"],
            vec!["", "", "rich text"],
        ]
    );
}

#[test]
fn test_get_cols_matches_cell_reads() {
    let wb = open();
    let cols = wb.get_cols("Report").unwrap();
    for (c, name) in ["A", "B", "C", "D"].iter().enumerate() {
        for (r, value) in cols[c].iter().enumerate() {
            let cell = format!("{name}{}", r + 1);
            assert_eq!(&wb.get_cell_value("Report", &cell).unwrap(), value, "cell {cell}");
        }
    }
}

#[test]
fn test_raw_booleans() {
    let wb = open();
    let cols = wb.get_cols_with("Report", &Options::raw()).unwrap();
    assert_eq!(cols[0], vec!["Name", "", "", "0"]);
}
