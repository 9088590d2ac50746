//! XLSX writer
//!
//! Part templates for new workbooks and the worksheet encoder. Output is
//! built as strings, the way the parts read in a text editor.

use std::fmt::Write as _;

use quick_xml::escape::escape;
use sheetcol_core::{Cell, ColumnRange, Row, SheetFormatPr, Worksheet};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// `[Content_Types].xml` for a workbook with `sheet_count` sheets
pub fn content_types_xml(sheet_count: usize) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    for i in 0..sheet_count {
        let _ = write!(
            content,
            r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        );
    }
    content.push_str("\n</Types>");
    content
}

/// `_rels/.rels`
pub fn root_rels_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

/// `xl/workbook.xml` listing `names` in order
pub fn workbook_xml(names: &[&str]) -> String {
    let mut content = format!(
        "{XML_DECL}\n<workbook xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\">\n    <sheets>"
    );
    for (i, name) in names.iter().enumerate() {
        let _ = write!(
            content,
            r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(*name),
            i + 1,
            i + 1
        );
    }
    content.push_str("\n    </sheets>\n</workbook>");
    content
}

/// `xl/_rels/workbook.xml.rels` for `sheet_count` sheets plus styles
pub fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 0..sheet_count {
        let _ = write!(
            content,
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        );
    }
    let _ = write!(
        content,
        r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
        sheet_count + 1
    );
    content
}

/// `xl/styles.xml` with one cell format per entry of `num_fmt_ids`
pub fn styles_xml(num_fmt_ids: &[u32]) -> String {
    let mut content = format!(
        r#"{XML_DECL}
<styleSheet xmlns="{NS_MAIN}">
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="{}">"#,
        num_fmt_ids.len()
    );
    for id in num_fmt_ids {
        let apply = if *id != 0 { r#" applyNumberFormat="1""# } else { "" };
        let _ = write!(
            content,
            r#"<xf numFmtId="{id}" fontId="0" fillId="0" borderId="0" xfId="0"{apply}/>"#
        );
    }
    content.push_str(
        r#"</cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#,
    );
    content
}

/// An empty worksheet part
pub fn blank_worksheet_xml() -> String {
    format!(
        "{XML_DECL}\n<worksheet xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\"><sheetData/></worksheet>"
    )
}

/// Encode a worksheet back into its part
///
/// Columns are written sorted and with adjacent equal ranges joined; the
/// in-memory collection is not modified.
pub fn write_worksheet(sheet: &Worksheet) -> Vec<u8> {
    let mut content = String::with_capacity(4096);
    content.push_str(XML_DECL);
    content.push_str("\n<worksheet");
    if sheet.unparsed.root_attributes.is_empty() {
        let _ = write!(content, " xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\"");
    }
    for (key, value) in &sheet.unparsed.root_attributes {
        let _ = write!(content, " {}=\"{}\"", key, escape(value.as_str()));
    }
    content.push('>');

    for fragment in &sheet.unparsed.head {
        content.push_str(fragment);
    }
    if let Some(format_pr) = &sheet.sheet_format_pr {
        write_sheet_format_pr(&mut content, format_pr);
    }
    if let Some(cols) = sheet.cols.as_ref().filter(|c| !c.is_empty()) {
        content.push_str("<cols>");
        for col in cols.coalesced().iter() {
            write_col(&mut content, col);
        }
        content.push_str("</cols>");
    }

    if sheet.sheet_data.is_empty() {
        content.push_str("<sheetData/>");
    } else {
        content.push_str("<sheetData>");
        for row in &sheet.sheet_data.rows {
            write_row(&mut content, row);
        }
        content.push_str("</sheetData>");
    }

    for fragment in &sheet.unparsed.tail {
        content.push_str(fragment);
    }
    content.push_str("</worksheet>");
    content.into_bytes()
}

fn flag(content: &mut String, name: &str, value: bool) {
    if value {
        let _ = write!(content, " {name}=\"1\"");
    }
}

fn write_sheet_format_pr(content: &mut String, pr: &SheetFormatPr) {
    content.push_str("<sheetFormatPr");
    if let Some(base) = pr.base_col_width {
        let _ = write!(content, " baseColWidth=\"{base}\"");
    }
    if let Some(width) = pr.default_col_width {
        let _ = write!(content, " defaultColWidth=\"{width}\"");
    }
    let _ = write!(content, " defaultRowHeight=\"{}\"", pr.default_row_height);
    flag(content, "customHeight", pr.custom_height);
    flag(content, "zeroHeight", pr.zero_height);
    if pr.outline_level_row > 0 {
        let _ = write!(content, " outlineLevelRow=\"{}\"", pr.outline_level_row);
    }
    if pr.outline_level_col > 0 {
        let _ = write!(content, " outlineLevelCol=\"{}\"", pr.outline_level_col);
    }
    content.push_str("/>");
}

fn write_col(content: &mut String, col: &ColumnRange) {
    let _ = write!(content, "<col min=\"{}\" max=\"{}\"", col.min, col.max);
    if let Some(width) = col.width {
        let _ = write!(content, " width=\"{width}\"");
    }
    if col.style != 0 {
        let _ = write!(content, " style=\"{}\"", col.style);
    }
    flag(content, "hidden", col.hidden);
    flag(content, "bestFit", col.best_fit);
    flag(content, "customWidth", col.custom_width);
    flag(content, "phonetic", col.phonetic);
    if col.outline_level > 0 {
        let _ = write!(content, " outlineLevel=\"{}\"", col.outline_level);
    }
    flag(content, "collapsed", col.collapsed);
    content.push_str("/>");
}

fn write_row(content: &mut String, row: &Row) {
    let _ = write!(content, "<row r=\"{}\"", row.r);
    if let Some(spans) = &row.spans {
        let _ = write!(content, " spans=\"{}\"", escape(spans.as_str()));
    }
    if row.s != 0 {
        let _ = write!(content, " s=\"{}\"", row.s);
    }
    flag(content, "customFormat", row.custom_format);
    if let Some(ht) = row.ht {
        let _ = write!(content, " ht=\"{ht}\"");
    }
    flag(content, "hidden", row.hidden);
    flag(content, "customHeight", row.custom_height);
    if row.outline_level > 0 {
        let _ = write!(content, " outlineLevel=\"{}\"", row.outline_level);
    }
    flag(content, "collapsed", row.collapsed);

    if row.cells.is_empty() {
        content.push_str("/>");
        return;
    }
    content.push('>');
    for cell in &row.cells {
        write_cell(content, cell);
    }
    content.push_str("</row>");
}

fn write_cell(content: &mut String, cell: &Cell) {
    let _ = write!(content, "<c r=\"{}\"", escape(cell.r.as_str()));
    if cell.s != 0 {
        let _ = write!(content, " s=\"{}\"", cell.s);
    }
    if let Some(t) = &cell.t {
        let _ = write!(content, " t=\"{}\"", escape(t.as_str()));
    }
    if cell.is_blank() {
        content.push_str("/>");
        return;
    }
    content.push('>');

    if let Some(f) = &cell.f {
        content.push_str("<f");
        if let Some(t) = &f.t {
            let _ = write!(content, " t=\"{}\"", escape(t.as_str()));
        }
        if let Some(reference) = &f.reference {
            let _ = write!(content, " ref=\"{}\"", escape(reference.as_str()));
        }
        if let Some(si) = f.si {
            let _ = write!(content, " si=\"{si}\"");
        }
        if f.text.is_empty() {
            content.push_str("/>");
        } else {
            let _ = write!(content, ">{}</f>", escape(f.text.as_str()));
        }
    }
    if let Some(v) = &cell.v {
        let _ = write!(content, "<v>{}</v>", escape(v.as_str()));
    }
    if let Some(text) = &cell.is {
        let space = if text.trim() != text {
            r#" xml:space="preserve""#
        } else {
            ""
        };
        let _ = write!(content, "<is><t{space}>{}</t></is>", escape(text.as_str()));
    }
    content.push_str("</c>");
}
