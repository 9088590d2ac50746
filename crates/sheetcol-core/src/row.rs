//! Row and cell types
//!
//! These mirror the `<sheetData>` part of a worksheet: only the attributes the
//! column subsystem reads or rewrites are modelled as fields.

use crate::cell::{cell_name_to_coordinates, coordinates_to_cell_name};
use crate::error::Result;

/// A `<f>` formula element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFormula {
    /// Formula text (without the leading `=`)
    pub text: String,
    /// Formula type (`shared`, `array`, ...), None for normal formulas
    pub t: Option<String>,
    /// Shared formula group index
    pub si: Option<u32>,
    /// Range the formula applies to (`ref` attribute)
    pub reference: Option<String>,
}

impl CellFormula {
    /// Create a plain formula
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A `<c>` cell element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Cell reference, e.g. `B3`
    pub r: String,
    /// Style index into `cellXfs`
    pub s: u32,
    /// Value type (`s`, `b`, `str`, `inlineStr`, `d`, `e`), None for numbers
    pub t: Option<String>,
    /// Raw value
    pub v: Option<String>,
    /// Formula
    pub f: Option<CellFormula>,
    /// Inline string text (`<is>`)
    pub is: Option<String>,
}

impl Cell {
    /// Create an empty cell at `r`
    pub fn new(r: impl Into<String>) -> Self {
        Self {
            r: r.into(),
            ..Default::default()
        }
    }

    /// Column number of this cell
    pub fn col(&self) -> Result<u32> {
        cell_name_to_coordinates(&self.r).map(|(col, _)| col)
    }

    /// Replace the value, dropping any formula
    pub fn set_value(&mut self, value: CellValue) {
        self.f = None;
        self.is = None;
        match value {
            CellValue::Empty => {
                self.t = None;
                self.v = None;
            }
            CellValue::Number(n) => {
                self.t = None;
                self.v = Some(n.to_string());
            }
            CellValue::String(s) => {
                self.t = Some("inlineStr".into());
                self.v = None;
                self.is = Some(s);
            }
            CellValue::Bool(b) => {
                self.t = Some("b".into());
                self.v = Some(if b { "1" } else { "0" }.into());
            }
        }
    }

    /// Check if the cell holds neither a value nor a formula
    pub fn is_blank(&self) -> bool {
        self.v.is_none() && self.f.is_none() && self.is.is_none()
    }
}

/// A value written into a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Clear the value, keeping the style
    Empty,
    /// Numeric value
    Number(f64),
    /// Text, stored inline
    String(String),
    /// Boolean
    Bool(bool),
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::String(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::String(v)
    }
}

/// A `<row>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Row number (1-based)
    pub r: u32,
    /// `spans` hint, kept as written
    pub spans: Option<String>,
    /// Height in points
    pub ht: Option<f64>,
    /// Height was set explicitly
    pub custom_height: bool,
    /// Row is hidden
    pub hidden: bool,
    /// Outline/grouping level
    pub outline_level: u8,
    /// Row is collapsed (in outline)
    pub collapsed: bool,
    /// Row-level style index
    pub s: u32,
    /// Row style applies to empty cells
    pub custom_format: bool,
    /// Cells, ordered by column
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create an empty row
    pub fn new(r: u32) -> Self {
        Self {
            r,
            ..Default::default()
        }
    }

    /// Position of the cell at `col`, or the position it would be inserted at
    ///
    /// Cells with unparsable references are treated as sitting before every
    /// valid column, matching the order they were read in.
    fn search(&self, col: u32) -> std::result::Result<usize, usize> {
        self.cells
            .binary_search_by_key(&col, |c| c.col().unwrap_or(0))
    }

    /// Get the cell at `col`
    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.search(col).ok().map(|idx| &self.cells[idx])
    }

    /// Get the cell at `col`, inserting an empty one in column order if absent
    pub fn cell_mut(&mut self, col: u32) -> Result<&mut Cell> {
        let idx = match self.search(col) {
            Ok(idx) => idx,
            Err(idx) => {
                let r = coordinates_to_cell_name(col, self.r, false)?;
                self.cells.insert(idx, Cell::new(r));
                idx
            }
        };
        Ok(&mut self.cells[idx])
    }
}

/// The `<sheetData>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    /// Rows, ordered by row number
    pub rows: Vec<Row>,
}

impl SheetData {
    /// Get the row numbered `r`
    pub fn row(&self, r: u32) -> Option<&Row> {
        self.rows
            .binary_search_by_key(&r, |row| row.r)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Get the row numbered `r`, inserting an empty one in order if absent
    pub fn row_mut(&mut self, r: u32) -> &mut Row {
        let idx = match self.rows.binary_search_by_key(&r, |row| row.r) {
            Ok(idx) => idx,
            Err(idx) => {
                self.rows.insert(idx, Row::new(r));
                idx
            }
        };
        &mut self.rows[idx]
    }

    /// Check if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
