//! Pixel geometry for columns, rows and anchored objects
//!
//! Widths are stored in character units and heights in points; drawings are
//! placed in pixels. The conversions here reproduce the host application's
//! rounding so that objects land on the same cells it would put them in.

use crate::worksheet::Worksheet;
use crate::{
    DEFAULT_COL_WIDTH_PIXELS, DEFAULT_ROW_HEIGHT_PIXELS, MAX_COLS, MAX_ROWS,
};

/// Maximum digit width of the default font, in pixels
const MAX_DIGIT_WIDTH: f64 = 8.0;

/// Padding applied to widths below one character
const NARROW_PADDING: f64 = 12.0;

/// Convert a column width in characters to pixels
///
/// # Examples
/// ```
/// use sheetcol_core::convert_col_width_to_pixels;
///
/// assert_eq!(convert_col_width_to_pixels(0.0), 0.0);
/// assert_eq!(convert_col_width_to_pixels(0.5), 6.0);
/// assert_eq!(convert_col_width_to_pixels(10.5), 84.0);
/// ```
pub fn convert_col_width_to_pixels(width: f64) -> f64 {
    if width == 0.0 {
        return 0.0;
    }
    let padding = if width < 1.0 { NARROW_PADDING } else { MAX_DIGIT_WIDTH };
    (width * padding + 0.5).floor()
}

/// Convert a row height in points to pixels
pub fn convert_row_height_to_pixels(height: f64) -> f64 {
    if height == 0.0 {
        return 0.0;
    }
    (4.0 / 3.4 * height).ceil()
}

/// Column and row extents of a sheet, in pixels
///
/// Columns and rows are 1-based.
pub trait SheetMetrics {
    /// Width of column `col`
    fn col_width_pixels(&self, col: u32) -> u32;

    /// Height of row `row`
    fn row_height_pixels(&self, row: u32) -> u32;
}

impl SheetMetrics for Worksheet {
    fn col_width_pixels(&self, col: u32) -> u32 {
        if let Some(width) = self.cols.as_ref().and_then(|c| c.width(col)) {
            return convert_col_width_to_pixels(width) as u32;
        }
        match self.sheet_format_pr.as_ref().and_then(|f| f.default_col_width) {
            Some(w) if w > 0.0 => convert_col_width_to_pixels(w) as u32,
            _ => DEFAULT_COL_WIDTH_PIXELS,
        }
    }

    fn row_height_pixels(&self, row: u32) -> u32 {
        if let Some(ht) = self.sheet_data.row(row).and_then(|r| r.ht) {
            return convert_row_height_to_pixels(ht) as u32;
        }
        match self.sheet_format_pr.as_ref().map(|f| f.default_row_height) {
            Some(h) if h > 0.0 => convert_row_height_to_pixels(h) as u32,
            _ => DEFAULT_ROW_HEIGHT_PIXELS as u32,
        }
    }
}

/// How an object follows the cells beneath it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Positioning {
    /// Both corners are cell-relative (`twoCellAnchor`)
    #[default]
    TwoCell,
    /// Only the top-left corner is cell-relative (`oneCellAnchor`)
    OneCell,
    /// Fixed position (`absoluteAnchor`)
    Absolute,
}

impl Positioning {
    /// Value used for the `editAs` attribute of a drawing anchor
    pub fn as_str(&self) -> &'static str {
        match self {
            Positioning::TwoCell => "twoCell",
            Positioning::OneCell => "oneCell",
            Positioning::Absolute => "absolute",
        }
    }
}

impl std::str::FromStr for Positioning {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "" | "twoCell" => Ok(Positioning::TwoCell),
            "oneCell" => Ok(Positioning::OneCell),
            "absolute" => Ok(Positioning::Absolute),
            _ => Err(crate::Error::other(format!("unknown positioning {s:?}"))),
        }
    }
}

/// Placement options for an embedded object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphicOptions {
    /// Horizontal offset from the anchor cell, in pixels
    pub offset_x: i32,
    /// Vertical offset from the anchor cell, in pixels
    pub offset_y: i32,
    /// Anchoring mode
    pub positioning: Positioning,
}

/// Resolved two-corner placement of an object
///
/// Cell indices are 0-based, offsets are pixels relative to the top-left of
/// the corresponding cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectAnchor {
    pub col_start: u32,
    pub row_start: u32,
    pub col_end: u32,
    pub row_end: u32,
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

/// Place an object of `width` x `height` pixels anchored at 1-based `(col, row)`
///
/// For [`Positioning::TwoCell`] the start offsets are clamped to the anchor
/// cell and the end corner is found by walking forward over the column widths
/// and row heights. Other modes pass the offsets and size through untouched.
pub fn position_object_pixels<M: SheetMetrics + ?Sized>(
    metrics: &M,
    col: u32,
    row: u32,
    width: i64,
    height: i64,
    opts: &GraphicOptions,
) -> ObjectAnchor {
    let col_start = col.saturating_sub(1);
    let row_start = row.saturating_sub(1);
    let mut anchor = ObjectAnchor {
        col_start,
        row_start,
        col_end: col_start,
        row_end: row_start,
        x1: opts.offset_x as i64,
        y1: opts.offset_y as i64,
        x2: width,
        y2: height,
    };

    if opts.positioning != Positioning::TwoCell {
        return anchor;
    }

    anchor.x1 = anchor.x1.min(metrics.col_width_pixels(col) as i64);
    anchor.y1 = anchor.y1.min(metrics.row_height_pixels(row) as i64);
    anchor.x2 += anchor.x1;
    anchor.y2 += anchor.y1;

    // col_end is 0-based, so col_end + 1 is the column the corner is in
    while anchor.col_end + 1 < MAX_COLS
        && anchor.x2 >= metrics.col_width_pixels(anchor.col_end + 1) as i64
    {
        anchor.col_end += 1;
        anchor.x2 -= metrics.col_width_pixels(anchor.col_end) as i64;
    }
    while anchor.row_end + 1 < MAX_ROWS
        && anchor.y2 >= metrics.row_height_pixels(anchor.row_end + 1) as i64
    {
        anchor.row_end += 1;
        anchor.y2 -= metrics.row_height_pixels(anchor.row_end) as i64;
    }

    log::trace!(
        "object at ({col}, {row}) spans to ({}, {})",
        anchor.col_end,
        anchor.row_end
    );
    anchor
}
