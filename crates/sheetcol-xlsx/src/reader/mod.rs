//! XLSX reader
//!
//! Decoders for the workbook part, its relationships and worksheet parts.
//! The worksheet decoder keeps every element it does not model as raw XML so
//! the part can be written back without loss.

mod shared_strings;

pub use shared_strings::{decode_excel_escapes, SharedStringTable};

use std::collections::HashMap;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;

use sheetcol_core::{
    cell_name_to_coordinates, coordinates_to_cell_name, Cell, CellFormula, ColumnRange,
    ColumnRangeSet, Row, SheetFormatPr, Worksheet, MAX_COLS,
};

use crate::error::{XlsxError, XlsxResult};
use crate::package::{Package, WORKBOOK, WORKBOOK_RELS};

/// Attribute value as a string, unescaped
pub(crate) fn attr_value(attr: &quick_xml::events::attributes::Attribute<'_>) -> XlsxResult<String> {
    Ok(attr.unescape_value()?.into_owned())
}

/// Parse an attribute value, logging and skipping values that do not parse
pub(crate) fn parse_attr<T: FromStr>(key: &[u8], value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!(
                "ignoring unparsable attribute {}={:?}",
                String::from_utf8_lossy(key),
                value
            );
            None
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true")
}

/// Sheets listed in the workbook, as `(name, part path)` in workbook order
pub fn read_workbook_sheets(pkg: &Package) -> XlsxResult<Vec<(String, String)>> {
    let rels = read_workbook_rels(pkg.require(WORKBOOK_RELS)?)?;
    let mut sheets = Vec::new();
    for (name, r_id) in read_workbook_xml(pkg.require(WORKBOOK)?)? {
        match rels.get(&r_id) {
            Some(path) => sheets.push((name, path.clone())),
            None => log::warn!("sheet {name:?} has no worksheet relationship {r_id:?}"),
        }
    }
    Ok(sheets)
}

/// Sheet names and relationship ids from workbook.xml
fn read_workbook_xml(data: &[u8]) -> XlsxResult<Vec<(String, String)>> {
    let mut xml_reader = Reader::from_reader(data);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut r_id = None;

                for attr in e.attributes().flatten() {
                    match (attr.key.prefix().is_some(), attr.key.local_name().as_ref()) {
                        (false, b"name") => name = Some(attr_value(&attr)?),
                        (true, b"id") => r_id = Some(attr_value(&attr)?),
                        _ => {}
                    }
                }

                if let (Some(name), Some(r_id)) = (name, r_id) {
                    sheets.push((name, r_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Worksheet relationship targets from workbook.xml.rels, keyed by id
fn read_workbook_rels(data: &[u8]) -> XlsxResult<HashMap<String, String>> {
    let mut xml_reader = Reader::from_reader(data);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut rel_type = None;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr_value(&attr)?),
                        b"Target" => target = Some(attr_value(&attr)?),
                        b"Type" => rel_type = Some(attr_value(&attr)?),
                        _ => {}
                    }
                }

                // Only include worksheet relationships
                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        // Target is relative to xl/ folder
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{}", target.trim_start_matches("./")),
                        };
                        rels.insert(id, full_path);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Where text content of the current element goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Value,
    Formula,
    Inline,
}

fn read_sheet_format_pr(e: &BytesStart<'_>) -> XlsxResult<SheetFormatPr> {
    let mut pr = SheetFormatPr::default();
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr)?;
        let key = attr.key.as_ref();
        match key {
            b"baseColWidth" => pr.base_col_width = parse_attr(key, &value),
            b"defaultColWidth" => pr.default_col_width = parse_attr(key, &value),
            b"defaultRowHeight" => {
                pr.default_row_height = parse_attr(key, &value).unwrap_or_default()
            }
            b"customHeight" => pr.custom_height = parse_bool(&value),
            b"zeroHeight" => pr.zero_height = parse_bool(&value),
            b"outlineLevelRow" => pr.outline_level_row = parse_attr(key, &value).unwrap_or(0),
            b"outlineLevelCol" => pr.outline_level_col = parse_attr(key, &value).unwrap_or(0),
            _ => {}
        }
    }
    Ok(pr)
}

fn read_col(e: &BytesStart<'_>) -> XlsxResult<Option<ColumnRange>> {
    let mut min = None;
    let mut max = None;
    let mut col = ColumnRange::new(1, 1);
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr)?;
        let key = attr.key.as_ref();
        match key {
            b"min" => min = parse_attr::<u32>(key, &value),
            b"max" => max = parse_attr::<u32>(key, &value),
            b"width" => col.width = parse_attr(key, &value),
            b"style" => col.style = parse_attr(key, &value).unwrap_or(0),
            b"hidden" => col.hidden = parse_bool(&value),
            b"bestFit" => col.best_fit = parse_bool(&value),
            b"customWidth" => col.custom_width = parse_bool(&value),
            b"phonetic" => col.phonetic = parse_bool(&value),
            b"outlineLevel" => col.outline_level = parse_attr(key, &value).unwrap_or(0),
            b"collapsed" => col.collapsed = parse_bool(&value),
            _ => {}
        }
    }
    match (min, max) {
        (Some(min), Some(max)) if min >= 1 && min <= max && min <= MAX_COLS => {
            col.min = min;
            col.max = max.min(MAX_COLS);
            Ok(Some(col))
        }
        _ => {
            log::warn!("skipping <col> with invalid bounds {min:?}..{max:?}");
            Ok(None)
        }
    }
}

fn read_row(e: &BytesStart<'_>, previous: u32) -> XlsxResult<Row> {
    let mut row = Row::new(previous + 1);
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr)?;
        let key = attr.key.as_ref();
        match key {
            b"r" => {
                if let Some(r) = parse_attr(key, &value) {
                    row.r = r;
                }
            }
            b"spans" => row.spans = Some(value),
            b"ht" => row.ht = parse_attr(key, &value),
            b"customHeight" => row.custom_height = parse_bool(&value),
            b"hidden" => row.hidden = parse_bool(&value),
            b"outlineLevel" => row.outline_level = parse_attr(key, &value).unwrap_or(0),
            b"collapsed" => row.collapsed = parse_bool(&value),
            b"s" => row.s = parse_attr(key, &value).unwrap_or(0),
            b"customFormat" => row.custom_format = parse_bool(&value),
            _ => {}
        }
    }
    Ok(row)
}

/// Read a `<c>` start tag; `previous_col` is the column of the cell before it
pub(crate) fn read_cell(e: &BytesStart<'_>, row: u32, previous_col: u32) -> XlsxResult<Cell> {
    let mut cell = Cell::default();
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr)?;
        let key = attr.key.as_ref();
        match key {
            b"r" => cell.r = value,
            b"s" => cell.s = parse_attr(key, &value).unwrap_or(0),
            b"t" => cell.t = Some(value),
            _ => {}
        }
    }
    if cell.r.is_empty() {
        cell.r = coordinates_to_cell_name(previous_col + 1, row, false)?;
    }
    Ok(cell)
}

fn read_formula(e: &BytesStart<'_>) -> XlsxResult<CellFormula> {
    let mut f = CellFormula::default();
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr)?;
        let key = attr.key.as_ref();
        match key {
            b"t" => f.t = Some(value),
            b"si" => f.si = parse_attr(key, &value),
            b"ref" => f.reference = Some(value),
            _ => {}
        }
    }
    Ok(f)
}

/// Read the children of a `<c>` element whose start tag was just consumed
///
/// Stops after the matching `</c>`.
pub(crate) fn read_cell_children(xml_reader: &mut Reader<&[u8]>, cell: &mut Cell) -> XlsxResult<()> {
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut target = None;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"v" => {
                        cell.v = Some(String::new());
                        target = Some(TextTarget::Value);
                    }
                    b"f" => {
                        cell.f = Some(read_formula(&e)?);
                        target = Some(TextTarget::Formula);
                    }
                    b"is" => cell.is = Some(String::new()),
                    b"rPh" => in_phonetic = true,
                    b"t" if !in_phonetic && cell.is.is_some() => target = Some(TextTarget::Inline),
                    _ => {}
                }
            }
            Event::Empty(e) => match e.local_name().as_ref() {
                b"v" => cell.v = Some(String::new()),
                b"f" => cell.f = Some(read_formula(&e)?),
                b"is" => cell.is = Some(String::new()),
                _ => {}
            },
            Event::End(e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                match e.local_name().as_ref() {
                    b"v" | b"f" | b"t" => target = None,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some(target) = target {
                    push_text(cell, target, &t.unescape()?);
                }
            }
            Event::CData(t) => {
                if let Some(target) = target {
                    push_text(cell, target, &String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => {
                return Err(XlsxError::InvalidFormat(format!(
                    "unexpected end of worksheet inside cell {}",
                    cell.r
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(is) = cell.is.as_mut().filter(|s| s.contains("_x")) {
        *is = decode_excel_escapes(is);
    }
    Ok(())
}

fn push_text(cell: &mut Cell, target: TextTarget, text: &str) {
    let slot = match target {
        TextTarget::Value => cell.v.as_mut(),
        TextTarget::Formula => cell.f.as_mut().map(|f| &mut f.text),
        TextTarget::Inline => cell.is.as_mut(),
    };
    if let Some(slot) = slot {
        slot.push_str(text);
    }
}

/// Element to copy verbatim into the unmodelled parts
enum Raw {
    /// Self-closing, already fully read
    Empty,
    /// Start tag read; skip to the end tag with this name
    Element(Vec<u8>),
}

/// Decoder state for one worksheet part
#[derive(Default)]
struct WorksheetDecoder {
    sheet: Worksheet,
    cols: Option<Vec<ColumnRange>>,
    depth: usize,
    in_cols: bool,
    in_sheet_data: bool,
    after_sheet_data: bool,
    row: Option<Row>,
    cell: Option<Cell>,
    last_row: u32,
    last_col: u32,
    target: Option<TextTarget>,
    in_phonetic: bool,
}

impl WorksheetDecoder {
    /// Handle a start or empty tag; returns `Some` if it should be kept raw
    fn open(&mut self, e: &BytesStart<'_>, is_empty: bool) -> XlsxResult<Option<Raw>> {
        let local = e.local_name();
        let local = local.as_ref();

        if self.depth == 0 {
            if local != b"worksheet" {
                return Err(XlsxError::InvalidFormat(format!(
                    "unexpected root element <{}>",
                    String::from_utf8_lossy(local)
                )));
            }
            for attr in e.attributes().flatten() {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                self.sheet.unparsed.root_attributes.push((key, attr_value(&attr)?));
            }
        } else if self.depth == 1 {
            match local {
                b"sheetFormatPr" => self.sheet.sheet_format_pr = Some(read_sheet_format_pr(e)?),
                b"cols" => {
                    self.cols.get_or_insert_with(Vec::new);
                    self.in_cols = !is_empty;
                }
                b"sheetData" => {
                    self.in_sheet_data = !is_empty;
                    self.after_sheet_data = true;
                }
                _ if is_empty => return Ok(Some(Raw::Empty)),
                _ => return Ok(Some(Raw::Element(e.name().as_ref().to_vec()))),
            }
        } else if self.in_cols && local == b"col" {
            if let Some(col) = read_col(e)? {
                self.cols.get_or_insert_with(Vec::new).push(col);
            }
        } else if self.in_sheet_data {
            self.open_sheet_data(e, local, is_empty)?;
        }

        if !is_empty {
            self.depth += 1;
        }
        Ok(None)
    }

    fn open_sheet_data(&mut self, e: &BytesStart<'_>, local: &[u8], is_empty: bool) -> XlsxResult<()> {
        match local {
            b"row" => {
                let row = read_row(e, self.last_row)?;
                self.last_row = row.r;
                self.last_col = 0;
                if is_empty {
                    self.sheet.sheet_data.rows.push(row);
                } else {
                    self.row = Some(row);
                }
            }
            b"c" => {
                let cell = read_cell(e, self.last_row, self.last_col)?;
                self.last_col = cell_name_to_coordinates(&cell.r)?.0;
                if is_empty {
                    self.push_cell(cell);
                } else {
                    self.cell = Some(cell);
                }
            }
            b"v" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.v = Some(String::new());
                    self.target = (!is_empty).then_some(TextTarget::Value);
                }
            }
            b"f" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.f = Some(read_formula(e)?);
                    self.target = (!is_empty).then_some(TextTarget::Formula);
                }
            }
            b"is" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.is = Some(String::new());
                }
            }
            b"rPh" => self.in_phonetic = !is_empty,
            b"t" if !self.in_phonetic && !is_empty => {
                if self.cell.as_ref().is_some_and(|c| c.is.is_some()) {
                    self.target = Some(TextTarget::Inline);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn push_cell(&mut self, mut cell: Cell) {
        if let Some(is) = cell.is.as_mut().filter(|s| s.contains("_x")) {
            *is = decode_excel_escapes(is);
        }
        if let Some(row) = self.row.as_mut() {
            row.cells.push(cell);
        }
    }

    fn close(&mut self, local: &[u8]) {
        self.depth = self.depth.saturating_sub(1);
        match local {
            b"cols" if self.depth == 1 => self.in_cols = false,
            b"sheetData" if self.depth == 1 => self.in_sheet_data = false,
            b"v" | b"f" | b"t" => self.target = None,
            b"rPh" => self.in_phonetic = false,
            b"c" if self.in_sheet_data => {
                if let Some(cell) = self.cell.take() {
                    self.push_cell(cell);
                }
            }
            b"row" if self.in_sheet_data => {
                if let Some(row) = self.row.take() {
                    self.sheet.sheet_data.rows.push(row);
                }
            }
            _ => {}
        }
    }

    fn wants_text(&self) -> bool {
        self.target.is_some() && self.cell.is_some()
    }

    fn text(&mut self, text: &str) {
        if let (Some(cell), Some(target)) = (self.cell.as_mut(), self.target) {
            push_text(cell, target, text);
        }
    }

    fn fragment(&mut self, xml: String) {
        if self.after_sheet_data {
            self.sheet.unparsed.tail.push(xml);
        } else {
            self.sheet.unparsed.head.push(xml);
        }
    }

    fn finish(mut self) -> Worksheet {
        // Lookups binary-search rows and cells
        self.sheet.sheet_data.rows.sort_by_key(|r| r.r);
        for row in &mut self.sheet.sheet_data.rows {
            row.cells.sort_by_key(|c| c.col().unwrap_or(0));
        }
        self.sheet.cols = self.cols.map(ColumnRangeSet::from_ranges);
        self.sheet
    }
}

/// Decode a worksheet part
pub fn read_worksheet(data: &[u8]) -> XlsxResult<Worksheet> {
    let mut xml_reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    let mut decoder = WorksheetDecoder::default();

    loop {
        let start = xml_reader.buffer_position() as usize;
        let raw = match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => decoder.open(&e, false)?,
            Event::Empty(e) => decoder.open(&e, true)?,
            Event::End(e) => {
                decoder.close(e.local_name().as_ref());
                None
            }
            Event::Text(t) if decoder.wants_text() => {
                decoder.text(&t.unescape()?);
                None
            }
            Event::CData(t) if decoder.wants_text() => {
                decoder.text(&String::from_utf8_lossy(&t));
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(raw) = raw {
            if let Raw::Element(name) = raw {
                xml_reader.read_to_end_into(QName(&name), &mut skip_buf)?;
                skip_buf.clear();
            }
            let end = xml_reader.buffer_position() as usize;
            decoder.fragment(String::from_utf8_lossy(&data[start..end]).trim_start().to_string());
        }
        buf.clear();
    }

    let sheet = decoder.finish();
    log::debug!(
        "decoded worksheet: {} rows, {} column ranges",
        sheet.sheet_data.rows.len(),
        sheet.cols.as_ref().map_or(0, ColumnRangeSet::len)
    );
    Ok(sheet)
}
