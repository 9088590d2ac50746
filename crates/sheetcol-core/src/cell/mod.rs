//! Cell coordinates
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - conversions between column letters and 1-based column numbers
//! - the `"A"` / `"A:C"` column span parser

mod address;

pub use address::{
    cell_name_to_coordinates, column_name_to_number, column_number_to_name,
    coordinates_to_cell_name, parse_col_range, split_cell_name, CellAddress,
};
