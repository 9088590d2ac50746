//! # sheetcol-xlsx
//!
//! Column access for XLSX (Office Open XML) workbooks.
//!
//! [`Workbook`] keeps the package in memory and decodes worksheets on first
//! use. On top of it sit the column accessors (width, visibility, outline
//! level, style, insert and remove), cell access, pixel geometry and the
//! streaming column reader [`Cols`].
//!
//! ## Example
//!
//! ```rust
//! use sheetcol_xlsx::Workbook;
//!
//! let wb = Workbook::new();
//! wb.set_col_width("Sheet1", "A", "C", 16.0)?;
//! wb.set_col_visible("Sheet1", "B", false)?;
//! wb.set_cell_value("Sheet1", "C2", "hello")?;
//!
//! assert_eq!(wb.get_col_width("Sheet1", "B")?, 16.0);
//! assert_eq!(wb.get_cols("Sheet1")?[2], vec!["", "hello"]);
//! # Ok::<(), sheetcol_xlsx::XlsxError>(())
//! ```

pub mod error;
pub mod package;
pub mod reader;
pub mod styles;
pub mod value;
pub mod writer;

mod cells;
mod cols;
mod iter;
mod workbook;

pub use error::{ScanError, XlsxError, XlsxResult};
pub use iter::Cols;
pub use package::Package;
pub use reader::SharedStringTable;
pub use styles::StyleTable;
pub use value::{CellContext, CellValueFormatter, GeneralFormatter, Options};
pub use workbook::Workbook;
