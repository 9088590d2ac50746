//! Worksheet type
//!
//! [`Worksheet`] is the in-memory mirror of one worksheet part. The column
//! collection, the sheet format defaults and the cell grid are modelled;
//! everything else in the part is carried through as raw XML.

use crate::column::{AttrOwner, ColumnRange, ColumnRangeSet};
use crate::error::{Error, Result};
use crate::row::{Cell, SheetData};
use crate::{DEFAULT_COL_WIDTH, MAX_SHEET_NAME_LEN};

/// The `<sheetFormatPr>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetFormatPr {
    /// Base column width in characters
    pub base_col_width: Option<u8>,
    /// Default column width in characters
    pub default_col_width: Option<f64>,
    /// Default row height in points
    pub default_row_height: f64,
    /// Default row height was set explicitly
    pub custom_height: bool,
    /// Rows are hidden by default
    pub zero_height: bool,
    /// Highest row outline level
    pub outline_level_row: u8,
    /// Highest column outline level
    pub outline_level_col: u8,
}

/// Parts of the worksheet XML that are not modelled
///
/// Fragments are stored as complete, already-escaped XML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnparsedXml {
    /// Attributes of the `<worksheet>` root, including namespace declarations
    pub root_attributes: Vec<(String, String)>,
    /// Child elements before `<sheetData>` (other than `sheetFormatPr` and `cols`)
    pub head: Vec<String>,
    /// Child elements after `<sheetData>`
    pub tail: Vec<String>,
}

/// A worksheet
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    /// Sheet-wide format defaults
    pub sheet_format_pr: Option<SheetFormatPr>,
    /// Column metadata, None when the part has no `<cols>`
    pub cols: Option<ColumnRangeSet>,
    /// Rows and cells
    pub sheet_data: SheetData,
    /// Everything else in the part
    pub unparsed: UnparsedXml,
}

impl Worksheet {
    /// Create an empty worksheet
    pub fn new() -> Self {
        Self::default()
    }

    // === Columns ===

    /// Merge `range` into the column collection
    ///
    /// Only the attributes owned by `owner` are taken from `range` for columns
    /// that already carry metadata.
    pub fn apply_column_range(&mut self, range: ColumnRange, owner: AttrOwner) {
        self.cols
            .get_or_insert_with(ColumnRangeSet::new)
            .apply(&range, owner);
    }

    /// Default column width of the sheet
    pub fn default_col_width(&self) -> f64 {
        match self.sheet_format_pr.as_ref().and_then(|f| f.default_col_width) {
            Some(w) if w > 0.0 => w,
            _ => DEFAULT_COL_WIDTH,
        }
    }

    /// Width of column `col` in characters
    pub fn col_width(&self, col: u32) -> f64 {
        match self.cols.as_ref().and_then(|c| c.width(col)) {
            Some(w) if w != 0.0 => w,
            _ => self.default_col_width(),
        }
    }

    /// Check if column `col` is visible
    pub fn col_visible(&self, col: u32) -> bool {
        self.last_col_range(col).map_or(true, |r| !r.hidden)
    }

    /// Outline level of column `col`
    pub fn col_outline_level(&self, col: u32) -> u8 {
        self.last_col_range(col).map_or(0, |r| r.outline_level)
    }

    /// Column-level style of column `col`
    pub fn col_style(&self, col: u32) -> u32 {
        self.last_col_range(col).map_or(0, |r| r.style)
    }

    fn last_col_range(&self, col: u32) -> Option<&ColumnRange> {
        self.cols.as_ref().and_then(|c| c.last_covering(col))
    }

    // === Cells ===

    /// Get the cell at 1-based `(col, row)`
    pub fn cell(&self, col: u32, row: u32) -> Option<&Cell> {
        self.sheet_data.row(row).and_then(|r| r.cell(col))
    }

    /// Get the cell at 1-based `(col, row)`, creating the row and cell if needed
    pub fn cell_mut(&mut self, col: u32, row: u32) -> Result<&mut Cell> {
        self.sheet_data.row_mut(row).cell_mut(col)
    }

    /// Set the style of the cell at `(col, row)`
    pub fn set_cell_style(&mut self, col: u32, row: u32, style: u32) -> Result<()> {
        self.cell_mut(col, row)?.s = style;
        Ok(())
    }
}

/// Check that `name` is usable as a sheet name
pub fn check_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "sheet name cannot contain '{}'",
            c
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::InvalidSheetName(
            "sheet name cannot start or end with an apostrophe".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_cols() {
        let sheet = Worksheet::new();
        assert_eq!(sheet.col_width(1), DEFAULT_COL_WIDTH);
        assert!(sheet.col_visible(5));
        assert_eq!(sheet.col_outline_level(5), 0);
        assert_eq!(sheet.col_style(5), 0);
    }

    #[test]
    fn test_sheet_default_col_width() {
        let mut sheet = Worksheet::new();
        sheet.sheet_format_pr = Some(SheetFormatPr {
            default_col_width: Some(14.0),
            ..Default::default()
        });
        assert_eq!(sheet.col_width(2), 14.0);

        // Zero width falls back to the sheet default
        sheet.apply_column_range(ColumnRange::single(2).with_width(0.0), AttrOwner::Width);
        assert_eq!(sheet.col_width(2), 14.0);

        sheet.sheet_format_pr = Some(SheetFormatPr {
            default_col_width: Some(0.0),
            ..Default::default()
        });
        assert_eq!(sheet.col_width(3), DEFAULT_COL_WIDTH);
    }

    #[test]
    fn test_column_attributes() {
        let mut sheet = Worksheet::new();
        sheet.apply_column_range(ColumnRange::new(1, 3).with_hidden(true), AttrOwner::Visibility);
        sheet.apply_column_range(ColumnRange::single(2).with_outline_level(3), AttrOwner::OutlineLevel);
        sheet.apply_column_range(ColumnRange::single(3).with_style(4), AttrOwner::Style);

        assert!(!sheet.col_visible(1));
        assert!(!sheet.col_visible(2));
        assert_eq!(sheet.col_outline_level(2), 3);
        assert_eq!(sheet.col_style(3), 4);
        assert!(!sheet.col_visible(3));
        assert!(sheet.col_visible(4));
    }

    #[test]
    fn test_set_cell_style_creates_cell() {
        let mut sheet = Worksheet::new();
        sheet.set_cell_style(2, 3, 5).unwrap();
        assert_eq!(sheet.cell(2, 3).map(|c| (c.r.as_str(), c.s)), Some(("B3", 5)));
    }

    #[test]
    fn test_check_sheet_name() {
        assert!(check_sheet_name("Sheet1").is_ok());
        assert!(check_sheet_name("Q1 'budget'x").is_ok());
        assert!(check_sheet_name("").is_err());
        assert!(check_sheet_name(&"x".repeat(32)).is_err());
        assert!(check_sheet_name("a/b").is_err());
        assert!(check_sheet_name("[x]").is_err());
        assert!(check_sheet_name("'quoted").is_err());
    }
}
