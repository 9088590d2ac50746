//! Streaming column reader
//!
//! [`Cols`] reads a worksheet one column at a time without building the cell
//! grid. Opening it takes a byte snapshot of the worksheet part and measures
//! the sheet; every [`Cols::rows`] call then re-scans the snapshot and decodes
//! only the cells of the current column. Memory stays bounded by one column
//! at the cost of one pass over the sheet per column.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetcol_core::cell_name_to_coordinates;

use crate::error::{ScanError, XlsxError, XlsxResult};
use crate::reader::{attr_value, read_cell, read_cell_children};
use crate::value::Options;
use crate::workbook::Workbook;

/// Column iterator over a worksheet snapshot
///
/// ```no_run
/// # use sheetcol_xlsx::{Options, Workbook};
/// let wb = Workbook::open("data.xlsx")?;
/// let mut cols = wb.cols("Sheet1")?;
/// while cols.next_col() {
///     let values = cols.rows(&Options::default())?;
///     println!("{}", values.join("\t"));
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Cols<'a> {
    workbook: &'a Workbook,
    sheet: String,
    data: Vec<u8>,
    options: Options,
    total_cols: u32,
    total_rows: u32,
    cur_col: u32,
    stash_col: u32,
    last_error: Option<String>,
}

/// Unprefixed `r` attribute of a start tag
fn r_attr(e: &BytesStart<'_>) -> XlsxResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r" {
            return Ok(Some(attr_value(&attr)?));
        }
    }
    Ok(None)
}

fn row_number(e: &BytesStart<'_>) -> XlsxResult<Option<u32>> {
    match r_attr(e)? {
        Some(r) => r
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| XlsxError::Parse(format!("invalid row number {r:?}"))),
        None => Ok(None),
    }
}

/// Row and column of the element being scanned
#[derive(Debug, Default)]
struct Position {
    row: u32,
    col: u32,
}

impl Position {
    fn enter_row(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        self.row += 1;
        if let Some(r) = row_number(e)? {
            self.row = r;
        }
        self.col = 0;
        Ok(())
    }

    fn enter_cell(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        self.col += 1;
        if let Some(r) = r_attr(e)? {
            let (col, row) = cell_name_to_coordinates(&r)?;
            self.col = col;
            self.row = row;
        }
        Ok(())
    }
}

/// First pass: `(total_cols, total_rows)` of a worksheet part
fn measure(data: &[u8]) -> XlsxResult<(u32, u32)> {
    let mut xml_reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut pos = Position::default();
    let (mut total_cols, mut total_rows) = (0, 0);

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    pos.enter_row(&e)?;
                    total_rows = total_rows.max(pos.row);
                }
                b"c" => {
                    pos.enter_cell(&e)?;
                    total_cols = total_cols.max(pos.col);
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"sheetData" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((total_cols, total_rows))
}

impl<'a> Cols<'a> {
    pub(crate) fn open(workbook: &'a Workbook, sheet: &str) -> XlsxResult<Self> {
        let data = workbook.worksheet_snapshot(sheet)?;
        let (total_cols, total_rows) = measure(&data)?;
        log::debug!("column reader on {sheet:?}: {total_cols} columns, {total_rows} rows");
        Ok(Self {
            workbook,
            sheet: sheet.to_string(),
            data,
            options: workbook.options(),
            total_cols,
            total_rows,
            cur_col: 0,
            stash_col: 0,
            last_error: None,
        })
    }

    /// Name of the sheet being read
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Highest column number holding a cell
    pub fn total_cols(&self) -> u32 {
        self.total_cols
    }

    /// Highest row number in the sheet
    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    /// Advance to the next column; false once every column has been visited
    pub fn next_col(&mut self) -> bool {
        self.cur_col = self.cur_col.saturating_add(1);
        self.cur_col <= self.total_cols
    }

    /// Values of the current column, one per row
    ///
    /// Rows without a cell in this column read as empty strings, up to the
    /// last row that has one. Each column is returned once: calling this
    /// again without [`next_col`](Self::next_col) gives an empty vector.
    pub fn rows(&mut self, options: &Options) -> Result<Vec<String>, ScanError> {
        if self.stash_col >= self.cur_col {
            return Ok(Vec::new());
        }

        let mut values = Vec::new();
        match self.scan_column(self.cur_col, options, &mut values) {
            Ok(()) => {
                self.stash_col = self.cur_col;
                self.last_error = None;
                Ok(values)
            }
            Err(source) => {
                self.last_error = Some(source.to_string());
                Err(ScanError {
                    col: self.cur_col,
                    values,
                    source,
                })
            }
        }
    }

    /// Message of the last failed [`rows`](Self::rows) call
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Second pass: decode the cells of column `target` into `values`
    fn scan_column(&self, target: u32, options: &Options, values: &mut Vec<String>) -> XlsxResult<()> {
        log::trace!("scanning column {target} of {:?}", self.sheet);
        let mut xml_reader = Reader::from_reader(self.data.as_slice());
        let mut buf = Vec::new();
        let mut pos = Position::default();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"row" => pos.enter_row(&e)?,
                Event::Empty(e) if e.local_name().as_ref() == b"row" => pos.enter_row(&e)?,
                Event::Start(e) if e.local_name().as_ref() == b"c" => {
                    pos.enter_cell(&e)?;
                    if pos.col == target {
                        let mut cell = read_cell(&e, pos.row, pos.col - 1)?;
                        read_cell_children(&mut xml_reader, &mut cell)?;
                        self.push_value(values, pos.row, self.workbook.cell_value(&cell, options)?);
                    }
                }
                Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                    pos.enter_cell(&e)?;
                    if pos.col == target {
                        let cell = read_cell(&e, pos.row, pos.col - 1)?;
                        self.push_value(values, pos.row, self.workbook.cell_value(&cell, options)?);
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"sheetData" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    fn push_value(&self, values: &mut Vec<String>, row: u32, value: String) {
        let row = row as usize;
        if values.len() + 1 < row {
            values.resize(row - 1, String::new());
        }
        values.push(value);
    }
}

impl Iterator for Cols<'_> {
    type Item = Result<Vec<String>, ScanError>;

    /// Advance and read the next column with the workbook's default options
    fn next(&mut self) -> Option<Self::Item> {
        if !self.next_col() {
            return None;
        }
        let options = self.options;
        Some(self.rows(&options))
    }
}

impl Workbook {
    /// Open a streaming column reader on `sheet`
    ///
    /// The reader works on a snapshot: edits made after this call are not
    /// visible to it.
    pub fn cols(&self, sheet: &str) -> XlsxResult<Cols<'_>> {
        Cols::open(self, sheet)
    }

    /// Values of every column of `sheet`, read with the default options
    pub fn get_cols(&self, sheet: &str) -> XlsxResult<Vec<Vec<String>>> {
        self.get_cols_with(sheet, &self.options())
    }

    /// Values of every column of `sheet`
    pub fn get_cols_with(&self, sheet: &str, options: &Options) -> XlsxResult<Vec<Vec<String>>> {
        let mut cols = self.cols(sheet)?;
        let mut result = Vec::with_capacity(cols.total_cols() as usize);
        while cols.next_col() {
            result.push(cols.rows(options)?);
        }
        Ok(result)
    }
}
