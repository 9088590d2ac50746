//! End-to-end tests for sheetcol-xlsx.
//!
//! Each test writes the package it needs to a temp file, laid out the way
//! the host application saves workbooks (multi-column `<col>` spans, shared
//! strings, shared formulas, elements this crate does not model), then opens
//! it with [`Workbook`](sheetcol_xlsx::Workbook) and asserts on what comes
//! back.

mod common;
mod editing;
mod reading;

// Re-export common utilities for submodules
pub use common::*;
