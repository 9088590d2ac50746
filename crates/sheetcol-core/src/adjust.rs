//! Column insertion and removal
//!
//! Inserting or removing columns moves every cell, formula reference and
//! column range at or after the insertion point. The new state is built aside
//! and swapped in only once every reference has been shifted, so a failed
//! adjustment leaves the worksheet unchanged.

use crate::cell::{column_name_to_number, column_number_to_name, CellAddress};
use crate::column::ColumnRangeSet;
use crate::error::{Error, Result};
use crate::row::SheetData;
use crate::worksheet::Worksheet;
use crate::MAX_COLS;

/// Placeholder for a reference into a deleted column
const REF_ERROR: &str = "#REF!";

/// A reference found in a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefToken {
    /// `B3`, `$B$3`
    Cell(CellAddress),
    /// `B`, `$B` (only as half of a whole-column range)
    Column { col: u32, absolute: bool },
}

impl RefToken {
    fn parse(s: &str) -> Option<Self> {
        if s.bytes().any(|b| b.is_ascii_digit()) {
            return CellAddress::parse(s).ok().map(RefToken::Cell);
        }
        let (absolute, letters) = match s.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        column_name_to_number(letters)
            .ok()
            .map(|col| RefToken::Column { col, absolute })
    }

    fn col(&self) -> u32 {
        match self {
            RefToken::Cell(addr) => addr.col,
            RefToken::Column { col, .. } => *col,
        }
    }

    fn with_col(self, col: u32) -> Self {
        match self {
            RefToken::Cell(addr) => RefToken::Cell(CellAddress { col, ..addr }),
            RefToken::Column { absolute, .. } => RefToken::Column { col, absolute },
        }
    }

    fn render(&self) -> Result<String> {
        match self {
            RefToken::Cell(addr) => Ok(addr.to_a1_string()),
            RefToken::Column { col, absolute } => {
                let name = column_number_to_name(*col)?;
                Ok(if *absolute { format!("${name}") } else { name })
            }
        }
    }
}

/// Column shift applied at `col`
#[derive(Debug, Clone, Copy)]
enum Shift {
    /// `n` columns inserted before `col`
    Insert { col: u32, n: u32 },
    /// `n` columns deleted starting at `col`
    Remove { col: u32, n: u32 },
}

impl Shift {
    fn new(col: u32, offset: i32) -> Self {
        if offset < 0 {
            Shift::Remove { col, n: offset.unsigned_abs() }
        } else {
            Shift::Insert { col, n: offset as u32 }
        }
    }

    /// New position of a single column, None if it was deleted
    fn single(self, c: u32) -> Result<Option<u32>> {
        match self {
            Shift::Insert { col, n } => {
                if c < col {
                    return Ok(Some(c));
                }
                let moved = c + n;
                if moved > MAX_COLS {
                    return Err(Error::ColumnNumber);
                }
                Ok(Some(moved))
            }
            Shift::Remove { col, n } => Ok(if c < col {
                Some(c)
            } else if c >= col + n {
                Some(c - n)
            } else {
                None
            }),
        }
    }

    /// New bounds of an inclusive span, None if the whole span was deleted
    fn span(self, first: u32, last: u32) -> Result<Option<(u32, u32)>> {
        match self {
            Shift::Insert { .. } => {
                let first = self.single(first)?.unwrap_or(first);
                let last = self.single(last)?.unwrap_or(last);
                Ok(Some((first, last)))
            }
            Shift::Remove { col, n } => {
                let first = if first >= col + n {
                    first - n
                } else if first >= col {
                    col
                } else {
                    first
                };
                let last = if last >= col + n {
                    last - n
                } else if last >= col {
                    col - 1
                } else {
                    last
                };
                Ok(if last < first || last == 0 {
                    None
                } else {
                    Some((first, last))
                })
            }
        }
    }
}

fn is_ref_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'$' | b'_' | b'.')
}

fn scan_ref(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_ref_byte(bytes[i]) {
        i += 1;
    }
    i
}

/// End of a quoted run starting at `i`, with doubled quotes as escapes
fn scan_quoted(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    i += 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    i
}

/// End of a bracketed structured reference starting at `i`
fn scan_bracketed(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    i
}

/// End of a sheet-qualified reference after the `!` at `i`
fn scan_qualified(bytes: &[u8], mut i: usize) -> usize {
    i += 1;
    loop {
        i = scan_ref(bytes, i);
        if bytes.get(i) == Some(&b':') && bytes.get(i + 1).copied().is_some_and(is_ref_byte) {
            i += 1;
        } else {
            return i;
        }
    }
}

fn shift_token(token: RefToken, shift: Shift) -> Result<Option<String>> {
    match shift.single(token.col())? {
        Some(col) => token.with_col(col).render().map(Some),
        None => Ok(None),
    }
}

fn shift_range(a: RefToken, b: RefToken, shift: Shift) -> Result<Option<String>> {
    let (first, last) = if a.col() <= b.col() { (a, b) } else { (b, a) };
    match shift.span(first.col(), last.col())? {
        Some((c1, c2)) => Ok(Some(format!(
            "{}:{}",
            first.with_col(c1).render()?,
            last.with_col(c2).render()?
        ))),
        None => Ok(None),
    }
}

fn shift_formula(formula: &str, shift: Shift) -> Result<String> {
    let bytes = formula.as_bytes();
    let mut out = String::with_capacity(formula.len() + 8);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = scan_quoted(bytes, i, b'"'),
            b'\'' => {
                i = scan_quoted(bytes, i, b'\'');
                if bytes.get(i) == Some(&b'!') {
                    i = scan_qualified(bytes, i);
                }
            }
            b'[' => i = scan_bracketed(bytes, i),
            b if is_ref_byte(b) => {
                let start = i;
                let end = scan_ref(bytes, i);
                let next = bytes.get(end).copied();
                i = end;

                if next == Some(b'(') || next == Some(b'[') {
                    continue;
                }
                if next == Some(b'!') {
                    i = scan_qualified(bytes, end);
                    continue;
                }
                let Some(first) = RefToken::parse(&formula[start..end]) else {
                    continue;
                };

                let mut replaced = None;
                if next == Some(b':') {
                    let second_end = scan_ref(bytes, end + 1);
                    let second = RefToken::parse(&formula[end + 1..second_end]);
                    match (first, second) {
                        (RefToken::Cell(_), Some(second @ RefToken::Cell(_)))
                        | (RefToken::Column { .. }, Some(second @ RefToken::Column { .. })) => {
                            replaced = Some(shift_range(first, second, shift)?);
                            i = second_end;
                        }
                        _ => {}
                    }
                }
                let replaced = match replaced {
                    Some(r) => r,
                    None => match first {
                        RefToken::Cell(_) => shift_token(first, shift)?,
                        // A lone column name is a defined name or constant
                        RefToken::Column { .. } => continue,
                    },
                };

                out.push_str(&formula[copied..start]);
                out.push_str(replaced.as_deref().unwrap_or(REF_ERROR));
                copied = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&formula[copied..]);
    Ok(out)
}

/// Shift the A1 references in `formula` for an insertion (`offset > 0`) or
/// removal (`offset < 0`) of columns at `col`
///
/// References into deleted columns become `#REF!`. String literals,
/// structured references and references qualified with a sheet name are left
/// alone.
///
/// # Examples
/// ```
/// use sheetcol_core::adjust::shift_formula_columns;
///
/// assert_eq!(shift_formula_columns("SUM(A1:C1)*B2", 2, 1).unwrap(), "SUM(A1:D1)*C2");
/// assert_eq!(shift_formula_columns("B1+C1", 2, -1).unwrap(), "#REF!+B1");
/// ```
pub fn shift_formula_columns(formula: &str, col: u32, offset: i32) -> Result<String> {
    if offset == 0 {
        return Ok(formula.to_string());
    }
    shift_formula(formula, Shift::new(col, offset))
}

fn shift_sheet_data(data: &SheetData, shift: Shift) -> Result<SheetData> {
    let mut shifted = data.clone();
    for row in &mut shifted.rows {
        row.spans = None;
        for cell in &mut row.cells {
            let addr = CellAddress::parse(&cell.r)?;
            // Cells in removed columns are spliced out before shifting
            let col = shift.single(addr.col)?.unwrap_or(addr.col);
            cell.r = CellAddress::new(col, addr.row).to_a1_string();

            if let Some(f) = cell.f.as_mut() {
                if !f.text.is_empty() {
                    f.text = shift_formula(&f.text, shift)?;
                }
                if let Some(reference) = f.reference.as_mut() {
                    *reference = shift_formula(reference, shift)?;
                }
            }
        }
    }
    Ok(shifted)
}

fn shift_cols(cols: &ColumnRangeSet, shift: Shift) -> Option<ColumnRangeSet> {
    let mut ranges = Vec::with_capacity(cols.len());
    for range in cols.iter() {
        let mut range = range.clone();
        match shift {
            Shift::Insert { col, n } => {
                if range.min >= col {
                    range.min = range.min.saturating_add(n);
                    if range.min > MAX_COLS {
                        continue;
                    }
                }
                if range.max >= col || range.max.saturating_add(1) == col {
                    range.max = range.max.saturating_add(n).min(MAX_COLS);
                }
            }
            Shift::Remove { col, n } => {
                let last = col + n - 1;
                if range.min >= col && range.max <= last {
                    continue;
                }
                if range.min > last {
                    range.min -= n;
                } else if range.min > col {
                    range.min = col;
                }
                if range.max > last {
                    range.max -= n;
                } else if range.max >= col {
                    range.max = col - 1;
                }
            }
        }
        ranges.push(range);
    }
    if ranges.is_empty() {
        None
    } else {
        Some(ColumnRangeSet::from_ranges(ranges))
    }
}

impl Worksheet {
    /// Move cells, formulas and column ranges for `offset` columns inserted
    /// (positive) or removed (negative) at `col`
    ///
    /// Fails with [`Error::ColumnNumber`] if anything would move past the last
    /// column; the worksheet is unchanged in that case.
    pub fn shift_columns(&mut self, col: u32, offset: i32) -> Result<()> {
        if offset == 0 {
            return Ok(());
        }
        let shift = Shift::new(col, offset);
        let sheet_data = shift_sheet_data(&self.sheet_data, shift)?;
        let cols = self.cols.as_ref().and_then(|c| shift_cols(c, shift));

        self.sheet_data = sheet_data;
        self.cols = cols;
        Ok(())
    }

    /// Insert `n` empty columns before column `col`
    pub fn insert_cols(&mut self, col: u32, n: u32) -> Result<()> {
        if col == 0 || col > MAX_COLS || n < 1 || n > MAX_COLS {
            return Err(Error::ColumnNumber);
        }
        log::debug!("inserting {n} column(s) at {col}");
        self.shift_columns(col, n as i32)
    }

    /// Delete column `col`, shifting later columns left
    pub fn remove_col(&mut self, col: u32) -> Result<()> {
        if col == 0 || col > MAX_COLS {
            return Err(Error::ColumnNumber);
        }
        log::debug!("removing column {col}");

        let mut sheet_data = self.sheet_data.clone();
        for row in &mut sheet_data.rows {
            row.cells.retain(|cell| cell.col().map_or(true, |c| c != col));
        }
        let shift = Shift::new(col, -1);
        let sheet_data = shift_sheet_data(&sheet_data, shift)?;
        let cols = self.cols.as_ref().and_then(|c| shift_cols(c, shift));

        self.sheet_data = sheet_data;
        self.cols = cols;
        Ok(())
    }
}
