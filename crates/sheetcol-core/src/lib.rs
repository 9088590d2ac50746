//! # sheetcol-core
//!
//! Core data structures for the sheetcol spreadsheet library.
//!
//! This crate provides the pieces of the column subsystem that do not touch
//! any file format:
//! - [`ColumnRange`] and [`ColumnRangeSet`] - per-column metadata and the
//!   merge algebra used whenever an overlapping range is restyled, hidden or
//!   widened
//! - [`CellAddress`] and the column-name helpers - 1-based A1 coordinates
//! - [`Worksheet`] - the in-memory mirror of a worksheet part
//! - [`geometry`] - column width to pixel conversion and object anchoring
//!
//! ## Example
//!
//! ```rust
//! use sheetcol_core::{AttrOwner, ColumnRange, Worksheet};
//!
//! let mut sheet = Worksheet::new();
//! sheet.apply_column_range(ColumnRange::new(2, 4).with_width(20.0), AttrOwner::Width);
//!
//! assert_eq!(sheet.col_width(3), 20.0);
//! assert_eq!(sheet.col_width(1), sheetcol_core::DEFAULT_COL_WIDTH);
//! ```

pub mod adjust;
pub mod cell;
pub mod column;
pub mod error;
pub mod geometry;
pub mod row;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    cell_name_to_coordinates, column_name_to_number, column_number_to_name,
    coordinates_to_cell_name, parse_col_range, split_cell_name, CellAddress,
};
pub use column::{apply_range, AttrOwner, ColumnRange, ColumnRangeSet};
pub use error::{Error, Result};
pub use geometry::{
    convert_col_width_to_pixels, convert_row_height_to_pixels, position_object_pixels,
    GraphicOptions, ObjectAnchor, Positioning, SheetMetrics,
};
pub use row::{Cell, CellFormula, CellValue, Row, SheetData};
pub use worksheet::{check_sheet_name, SheetFormatPr, UnparsedXml, Worksheet};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum column width in character units
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Highest outline (grouping) level a column can carry
pub const MAX_OUTLINE_LEVEL: u8 = 7;

/// Column width used when neither the column nor the sheet defines one
pub const DEFAULT_COL_WIDTH: f64 = 10.5;

/// [`DEFAULT_COL_WIDTH`] in pixels
pub const DEFAULT_COL_WIDTH_PIXELS: u32 = 84;

/// Row height used when neither the row nor the sheet defines one
pub const DEFAULT_ROW_HEIGHT: f64 = 15.6;

/// [`DEFAULT_ROW_HEIGHT`] in pixels, truncated when used as an integer extent
pub const DEFAULT_ROW_HEIGHT_PIXELS: f64 = 20.8;
