//! Prelude module - common imports for sheetcol users
//!
//! ```rust
//! use sheetcol::prelude::*;
//! ```

pub use crate::{
    CellValue,
    Cols,
    ColumnRange,
    // Error types
    Error,
    // Geometry
    GraphicOptions,
    ObjectAnchor,
    Options,
    Positioning,
    Result,
    // Main types
    Workbook,
    XlsxError,
    XlsxResult,
};
