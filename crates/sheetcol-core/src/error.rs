//! Error types for sheetcol-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetcol-core
///
/// Every variant is an input validation or lookup failure: they are raised
/// before any worksheet state is touched, so a failed call never leaves a
/// partial mutation behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Column letters could not be parsed
    #[error("invalid column name {0:?}")]
    InvalidColumnName(String),

    /// A cell reference could not be parsed
    #[error("invalid cell name {0:?}")]
    InvalidCellName(String),

    /// Coordinates are outside the grid
    #[error("invalid cell coordinates [{col}, {row}]")]
    InvalidCoordinates { col: u32, row: u32 },

    /// Column width above the format maximum
    #[error("the width of the column must be less than or equal to 255 characters")]
    ColumnWidth,

    /// Outline level outside 1..=7
    #[error("invalid outline level")]
    OutlineLevel,

    /// Column number or column count outside 1..=16384
    #[error("the column number must be greater than or equal to 1 and less than or equal to 16384")]
    ColumnNumber,

    /// Style ID not present in the style table
    #[error("invalid style ID {0}")]
    InvalidStyleId(u32),

    /// Sheet not found by name
    #[error("sheet {0} does not exist")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
