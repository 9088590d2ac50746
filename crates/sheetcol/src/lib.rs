//! # sheetcol
//!
//! Column metadata, streaming column reads and object anchor geometry for
//! XLSX worksheets.
//!
//! ## Features
//!
//! - Get and set column width, visibility, outline level and style
//! - Insert and remove columns, moving cells, formulas and column ranges
//! - Read a worksheet column by column without loading the cell grid
//! - Convert column widths to pixels and place objects over variable-width
//!   columns the way the host application does
//!
//! ## Example
//!
//! ```rust
//! use sheetcol::prelude::*;
//!
//! let wb = Workbook::new();
//! wb.set_col_width("Sheet1", "A", "A", 8.0)?;
//! wb.set_col_width("Sheet1", "B", "B", 12.0)?;
//! wb.set_col_width("Sheet1", "C", "C", 16.0)?;
//!
//! wb.remove_col("Sheet1", "B")?;
//! assert_eq!(wb.get_col_width("Sheet1", "B")?, 16.0);
//!
//! // Save to file
//! // wb.save_as("output.xlsx")?;
//! # Ok::<(), XlsxError>(())
//! ```

pub mod prelude;

// Re-export core types
pub use sheetcol_core::{
    // Columns
    apply_range,
    // Coordinates
    cell_name_to_coordinates,
    column_name_to_number,
    column_number_to_name,
    // Geometry
    convert_col_width_to_pixels,
    convert_row_height_to_pixels,
    coordinates_to_cell_name,
    parse_col_range,
    position_object_pixels,
    split_cell_name,
    AttrOwner,
    CellAddress,
    CellValue,
    ColumnRange,
    ColumnRangeSet,
    // Error types
    Error,
    GraphicOptions,
    ObjectAnchor,
    Positioning,
    Result,
    SheetMetrics,
    Worksheet,
    DEFAULT_COL_WIDTH,
    // Constants
    MAX_COLS,
    MAX_COLUMN_WIDTH,
    MAX_OUTLINE_LEVEL,
    MAX_ROWS,
};

// Re-export XLSX types
pub use sheetcol_xlsx::{
    CellContext, CellValueFormatter, Cols, GeneralFormatter, Options, Package, ScanError,
    Workbook, XlsxError, XlsxResult,
};
