//! Cell address and column-name helpers
//!
//! All coordinates here are 1-based, the way they appear in worksheet XML:
//! column `A` is 1, row `1` is 1.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Cell addresses in Excel use a combination of column letters (A-XFD) and row numbers (1-1048576).
/// The optional `$` prefix makes a reference absolute (doesn't change when copied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Column number (1-based, A=1, ..., XFD=16384)
    pub col: u32,
    /// Row number (1-based)
    pub row: u32,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            col_absolute: false,
            row_absolute: false,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use sheetcol_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.col, addr.row), (1, 1));
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.col, addr.row), (2, 2));
    /// assert!(addr.row_absolute);
    /// assert!(addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidCellName(s.into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let col_absolute = bytes.first() == Some(&b'$');
        if col_absolute {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidCellName(s.into()));
        }
        let col = column_name_to_number(&s[col_start..pos])
            .map_err(|_| Error::InvalidCellName(s.into()))?;

        let row_absolute = bytes.get(pos) == Some(&b'$');
        if row_absolute {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCellName(s.into()));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidCellName(s.into()))?;
        if row == 0 || row > MAX_ROWS {
            return Err(Error::InvalidCellName(s.into()));
        }

        Ok(Self {
            col,
            row,
            col_absolute,
            row_absolute,
        })
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = String::new();
        if self.col_absolute {
            result.push('$');
        }
        result.push_str(&letters(self.col));
        if self.row_absolute {
            result.push('$');
        }
        result.push_str(&self.row.to_string());
        result
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27)
///
/// Letters are case-insensitive. Fails on empty input, on anything that is not
/// an ASCII letter, and on columns past `XFD`.
pub fn column_name_to_number(name: &str) -> Result<u32> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidColumnName(name.into()));
    }

    let mut col: u32 = 0;
    for c in name.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidColumnName(name.into()));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS {
            return Err(Error::ColumnNumber);
        }
    }

    Ok(col)
}

/// Convert a 1-based column number to letters (1 = A, 27 = AA)
pub fn column_number_to_name(num: u32) -> Result<String> {
    if num == 0 || num > MAX_COLS {
        return Err(Error::ColumnNumber);
    }
    Ok(letters(num))
}

fn letters(num: u32) -> String {
    let mut result = Vec::new();
    let mut n = num;
    while n > 0 {
        n -= 1;
        result.push((n % 26) as u8 + b'A');
        n /= 26;
    }
    result.reverse();
    String::from_utf8_lossy(&result).into_owned()
}

/// Split a cell name into its column letters and row number
///
/// `$` markers are accepted and dropped: `"$B$3"` splits into `("B", 3)`.
pub fn split_cell_name(cell: &str) -> Result<(String, u32)> {
    let addr = CellAddress::parse(cell)?;
    Ok((letters(addr.col), addr.row))
}

/// Convert a cell name to 1-based `(col, row)` coordinates
pub fn cell_name_to_coordinates(cell: &str) -> Result<(u32, u32)> {
    let addr = CellAddress::parse(cell)?;
    Ok((addr.col, addr.row))
}

/// Convert 1-based coordinates to a cell name, optionally absolute (`$A$1`)
pub fn coordinates_to_cell_name(col: u32, row: u32, absolute: bool) -> Result<String> {
    if col == 0 || col > MAX_COLS || row == 0 || row > MAX_ROWS {
        return Err(Error::InvalidCoordinates { col, row });
    }
    let addr = CellAddress {
        col,
        row,
        col_absolute: absolute,
        row_absolute: absolute,
    };
    Ok(addr.to_a1_string())
}

/// Parse a column span of the form `"A"` or `"A:C"` into `(min, max)`
///
/// An inverted span such as `"D:B"` is swapped, so `min <= max` always holds.
pub fn parse_col_range(columns: &str) -> Result<(u32, u32)> {
    let mut parts = columns.split(':');
    let first = parts.next().unwrap_or_default();
    let min = column_name_to_number(first)?;
    let max = match parts.next() {
        Some(second) => column_name_to_number(second)?,
        None => min,
    };
    if parts.next().is_some() {
        return Err(Error::InvalidColumnName(columns.into()));
    }
    Ok(if max < min { (max, min) } else { (min, max) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_number_to_name() {
        assert_eq!(column_number_to_name(1).unwrap(), "A");
        assert_eq!(column_number_to_name(2).unwrap(), "B");
        assert_eq!(column_number_to_name(26).unwrap(), "Z");
        assert_eq!(column_number_to_name(27).unwrap(), "AA");
        assert_eq!(column_number_to_name(28).unwrap(), "AB");
        assert_eq!(column_number_to_name(702).unwrap(), "ZZ");
        assert_eq!(column_number_to_name(703).unwrap(), "AAA");
        assert_eq!(column_number_to_name(16384).unwrap(), "XFD");

        assert_eq!(column_number_to_name(0), Err(Error::ColumnNumber));
        assert_eq!(column_number_to_name(16385), Err(Error::ColumnNumber));
    }

    #[test]
    fn test_column_name_to_number() {
        assert_eq!(column_name_to_number("A").unwrap(), 1);
        assert_eq!(column_name_to_number("Z").unwrap(), 26);
        assert_eq!(column_name_to_number("AA").unwrap(), 27);
        assert_eq!(column_name_to_number("ZZ").unwrap(), 702);
        assert_eq!(column_name_to_number("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(column_name_to_number("a").unwrap(), 1);
        assert_eq!(column_name_to_number("xfd").unwrap(), 16384);
    }

    #[test]
    fn test_column_name_to_number_errors() {
        assert!(matches!(
            column_name_to_number(""),
            Err(Error::InvalidColumnName(_))
        ));
        assert!(matches!(
            column_name_to_number("A1"),
            Err(Error::InvalidColumnName(_))
        ));
        assert!(matches!(
            column_name_to_number("-"),
            Err(Error::InvalidColumnName(_))
        ));
        assert_eq!(column_name_to_number("XFE"), Err(Error::ColumnNumber));
        assert_eq!(column_name_to_number("ZZZZZZZZ"), Err(Error::ColumnNumber));
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!((addr.col, addr.row), (1, 1));
        assert!(!addr.row_absolute);
        assert!(!addr.col_absolute);

        let addr = CellAddress::parse("$A1").unwrap();
        assert!(addr.col_absolute);
        assert!(!addr.row_absolute);

        let addr = CellAddress::parse("A$1").unwrap();
        assert!(!addr.col_absolute);
        assert!(addr.row_absolute);

        let addr = CellAddress::parse("XFD1048576").unwrap();
        assert_eq!((addr.col, addr.row), (16384, 1_048_576));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1048577").is_err());
        assert!(CellAddress::parse("XFE1").is_err());
        assert!(CellAddress::parse("A1B").is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(1, 1).to_string(), "A1");
        assert_eq!(CellAddress::new(3, 100).to_string(), "C100");
        assert_eq!(coordinates_to_cell_name(1, 1, true).unwrap(), "$A$1");
        assert_eq!(
            coordinates_to_cell_name(0, 1, false),
            Err(Error::InvalidCoordinates { col: 0, row: 1 })
        );
    }

    #[test]
    fn test_split_and_coordinates() {
        assert_eq!(split_cell_name("$AB$12").unwrap(), ("AB".to_string(), 12));
        assert_eq!(cell_name_to_coordinates("C7").unwrap(), (3, 7));
    }

    #[test]
    fn test_parse_col_range() {
        assert_eq!(parse_col_range("C").unwrap(), (3, 3));
        assert_eq!(parse_col_range("B:D").unwrap(), (2, 4));
        assert_eq!(parse_col_range("D:B").unwrap(), (2, 4));
        assert_eq!(parse_col_range("b:d").unwrap(), (2, 4));
        assert!(parse_col_range("A:B:C").is_err());
        assert!(parse_col_range("*").is_err());
        assert!(parse_col_range("A:").is_err());
    }
}
