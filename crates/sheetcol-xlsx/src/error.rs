//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while opening, querying or saving a workbook
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML in a package part
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation or lookup error from the sheet model
    #[error(transparent)]
    Core(#[from] sheetcol_core::Error),
}

impl XlsxError {
    /// The sheet-model error, if this is one
    pub fn as_core(&self) -> Option<&sheetcol_core::Error> {
        match self {
            XlsxError::Core(e) => Some(e),
            _ => None,
        }
    }
}

/// A column scan that stopped early
///
/// `values` holds the cells read before the failure.
#[derive(Debug, Error)]
#[error("reading column {col} failed: {source}")]
pub struct ScanError {
    /// Column being read
    pub col: u32,
    /// Values read before the failure
    pub values: Vec<String>,
    /// What went wrong
    pub source: XlsxError,
}

impl From<ScanError> for XlsxError {
    fn from(err: ScanError) -> Self {
        err.source
    }
}
