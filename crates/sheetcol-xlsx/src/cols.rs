//! Column accessors
//!
//! Columns are addressed by letters (`"B"`) or letter spans (`"A:C"`), both
//! case-insensitive. Every setter validates its input before the worksheet is
//! locked, so a failed call leaves the sheet untouched.

use sheetcol_core::{
    cell_name_to_coordinates, column_name_to_number, parse_col_range, position_object_pixels,
    AttrOwner, ColumnRange, Error, GraphicOptions, ObjectAnchor, SheetMetrics, Worksheet,
    DEFAULT_COL_WIDTH, MAX_COLUMN_WIDTH, MAX_OUTLINE_LEVEL,
};

use crate::error::XlsxResult;
use crate::workbook::{lock, Workbook};

impl Workbook {
    /// Run `f` with worksheet `sheet` locked
    pub(crate) fn with_worksheet<T>(
        &self,
        sheet: &str,
        f: impl FnOnce(&mut Worksheet) -> XlsxResult<T>,
    ) -> XlsxResult<T> {
        let ws = self.worksheet(sheet)?;
        let mut guard = lock(&ws);
        f(&mut guard)
    }

    // === Width ===

    /// Width of column `col` in characters
    ///
    /// Falls back to the sheet's default column width, then to 10.5.
    pub fn get_col_width(&self, sheet: &str, col: &str) -> XlsxResult<f64> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.col_width(col)))
    }

    /// Set the width of columns `start_col` through `end_col`
    ///
    /// ```no_run
    /// # use sheetcol_xlsx::Workbook;
    /// let wb = Workbook::new();
    /// wb.set_col_width("Sheet1", "A", "D", 20.0)?;
    /// # Ok::<(), sheetcol_xlsx::XlsxError>(())
    /// ```
    pub fn set_col_width(&self, sheet: &str, start_col: &str, end_col: &str, width: f64) -> XlsxResult<()> {
        if !(0.0..=MAX_COLUMN_WIDTH).contains(&width) {
            return Err(Error::ColumnWidth.into());
        }
        let mut min = column_name_to_number(start_col)?;
        let mut max = column_name_to_number(end_col)?;
        if max < min {
            std::mem::swap(&mut min, &mut max);
        }

        let range = ColumnRange::new(min, max)
            .with_width(width)
            .with_custom_width(true);
        self.with_worksheet(sheet, |ws| {
            ws.apply_column_range(range, AttrOwner::Width);
            Ok(())
        })
    }

    // === Visibility ===

    /// Check if column `col` is visible
    pub fn get_col_visible(&self, sheet: &str, col: &str) -> XlsxResult<bool> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.col_visible(col)))
    }

    /// Show or hide `columns` (`"D"` or `"D:F"`)
    pub fn set_col_visible(&self, sheet: &str, columns: &str, visible: bool) -> XlsxResult<()> {
        let (min, max) = parse_col_range(columns)?;
        let range = ColumnRange::new(min, max)
            .with_width(DEFAULT_COL_WIDTH)
            .with_hidden(!visible)
            .with_custom_width(true);
        self.with_worksheet(sheet, |ws| {
            ws.apply_column_range(range, AttrOwner::Visibility);
            Ok(())
        })
    }

    // === Outline ===

    /// Outline level of column `col`
    pub fn get_col_outline_level(&self, sheet: &str, col: &str) -> XlsxResult<u8> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.col_outline_level(col)))
    }

    /// Set the outline level of column `col`, between 1 and 7
    pub fn set_col_outline_level(&self, sheet: &str, col: &str, level: u8) -> XlsxResult<()> {
        if level < 1 || level > MAX_OUTLINE_LEVEL {
            return Err(Error::OutlineLevel.into());
        }
        let col = column_name_to_number(col)?;
        let range = ColumnRange::single(col)
            .with_outline_level(level)
            .with_custom_width(true);
        self.with_worksheet(sheet, |ws| {
            ws.apply_column_range(range, AttrOwner::OutlineLevel);
            Ok(())
        })
    }

    // === Style ===

    /// Column-level style of column `col`
    pub fn get_col_style(&self, sheet: &str, col: &str) -> XlsxResult<u32> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.col_style(col)))
    }

    /// Set the style of `columns` (`"D"` or `"D:F"`)
    ///
    /// Cells in rows that already exist are restyled too. That part is
    /// best effort: every row is attempted and the last error is returned.
    pub fn set_col_style(&self, sheet: &str, columns: &str, style: u32) -> XlsxResult<()> {
        let (min, max) = parse_col_range(columns)?;
        lock(self.styles()?).check_style_id(style)?;

        let ws = self.worksheet(sheet)?;
        let mut ws = lock(&ws);
        let width = ws.default_col_width();
        ws.apply_column_range(
            ColumnRange::new(min, max).with_width(width).with_style(style),
            AttrOwner::Style,
        );

        let rows: Vec<u32> = ws.sheet_data.rows.iter().map(|row| row.r).collect();
        let mut result = Ok(());
        for col in min..=max {
            for &row in &rows {
                if let Err(e) = ws.set_cell_style(col, row, style) {
                    result = Err(e.into());
                }
            }
        }
        result
    }

    // === Structure ===

    /// Insert `n` empty columns before column `col`
    pub fn insert_cols(&self, sheet: &str, col: &str, n: u32) -> XlsxResult<()> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.insert_cols(col, n)?))
    }

    /// Delete column `col`, shifting the columns after it left
    pub fn remove_col(&self, sheet: &str, col: &str) -> XlsxResult<()> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.remove_col(col)?))
    }

    // === Geometry ===

    /// Width of column `col` in pixels
    pub fn get_col_width_pixels(&self, sheet: &str, col: &str) -> XlsxResult<u32> {
        let col = column_name_to_number(col)?;
        self.with_worksheet(sheet, |ws| Ok(ws.col_width_pixels(col)))
    }

    /// Height of row `row` (1-based) in pixels
    pub fn get_row_height_pixels(&self, sheet: &str, row: u32) -> XlsxResult<u32> {
        if row == 0 || row > sheetcol_core::MAX_ROWS {
            return Err(Error::InvalidCoordinates { col: 1, row }.into());
        }
        self.with_worksheet(sheet, |ws| Ok(ws.row_height_pixels(row)))
    }

    /// Place an object of `width` x `height` pixels anchored at `cell`
    pub fn position_object_pixels(
        &self,
        sheet: &str,
        cell: &str,
        width: i64,
        height: i64,
        opts: &GraphicOptions,
    ) -> XlsxResult<ObjectAnchor> {
        let (col, row) = cell_name_to_coordinates(cell)?;
        self.with_worksheet(sheet, |ws| {
            Ok(position_object_pixels(&*ws, col, row, width, height, opts))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XlsxError;
    use crate::package::{Package, STYLES};
    use crate::writer;
    use sheetcol_core::{CellValue, DEFAULT_COL_WIDTH_PIXELS};

    fn core_err<T: std::fmt::Debug>(result: XlsxResult<T>) -> Error {
        match result {
            Err(XlsxError::Core(e)) => e,
            other => panic!("expected a core error, got {other:?}"),
        }
    }

    fn styled_workbook() -> Workbook {
        let mut pkg = Package::blank(&["Sheet1"]).unwrap();
        pkg.insert(STYLES, writer::styles_xml(&[0, 14, 2]));
        Workbook::from_package(pkg).unwrap()
    }

    #[test]
    fn test_col_width() {
        let wb = Workbook::new();
        assert_eq!(wb.get_col_width("Sheet1", "A").unwrap(), DEFAULT_COL_WIDTH);

        wb.set_col_width("Sheet1", "D", "b", 20.0).unwrap();
        for col in ["B", "C", "D"] {
            assert_eq!(wb.get_col_width("Sheet1", col).unwrap(), 20.0);
        }
        assert_eq!(wb.get_col_width("Sheet1", "E").unwrap(), DEFAULT_COL_WIDTH);
    }

    #[test]
    fn test_col_width_errors() {
        let wb = Workbook::new();
        assert_eq!(core_err(wb.set_col_width("Sheet1", "A", "B", 255.5)), Error::ColumnWidth);
        assert_eq!(core_err(wb.set_col_width("Sheet1", "A", "B", -3.0)), Error::ColumnWidth);
        assert_eq!(core_err(wb.set_col_width("Sheet1", "A", "B", f64::NAN)), Error::ColumnWidth);
        assert_eq!(wb.get_col_width("Sheet1", "A").unwrap(), DEFAULT_COL_WIDTH);
        assert!(matches!(
            core_err(wb.set_col_width("Sheet1", "A", "1", 10.0)),
            Error::InvalidColumnName(_)
        ));
        assert!(matches!(
            core_err(wb.get_col_width("Nope", "A")),
            Error::SheetNotFound(_)
        ));
        // Nothing was written
        let ws = wb.worksheet("Sheet1").unwrap();
        assert!(lock(&ws).cols.is_none());
    }

    #[test]
    fn test_col_visible() {
        let wb = Workbook::new();
        assert!(wb.get_col_visible("Sheet1", "C").unwrap());

        wb.set_col_width("Sheet1", "D", "D", 30.0).unwrap();
        wb.set_col_visible("Sheet1", "F:D", false).unwrap();
        assert!(!wb.get_col_visible("Sheet1", "D").unwrap());
        assert!(!wb.get_col_visible("Sheet1", "f").unwrap());
        assert!(wb.get_col_visible("Sheet1", "G").unwrap());
        // Width set earlier survives hiding
        assert_eq!(wb.get_col_width("Sheet1", "D").unwrap(), 30.0);
        // Hiding an unset column gives it the default width
        assert_eq!(wb.get_col_width("Sheet1", "E").unwrap(), DEFAULT_COL_WIDTH);

        wb.set_col_visible("Sheet1", "E", true).unwrap();
        assert!(wb.get_col_visible("Sheet1", "E").unwrap());
        assert!(matches!(
            core_err(wb.set_col_visible("Sheet1", "A:B:C", true)),
            Error::InvalidColumnName(_)
        ));
    }

    #[test]
    fn test_col_outline_level() {
        let wb = Workbook::new();
        assert_eq!(wb.get_col_outline_level("Sheet1", "D").unwrap(), 0);
        assert_eq!(core_err(wb.set_col_outline_level("Sheet1", "D", 0)), Error::OutlineLevel);
        assert_eq!(core_err(wb.set_col_outline_level("Sheet1", "D", 8)), Error::OutlineLevel);

        wb.set_col_width("Sheet1", "D", "D", 15.0).unwrap();
        wb.set_col_outline_level("Sheet1", "D", 7).unwrap();
        assert_eq!(wb.get_col_outline_level("Sheet1", "D").unwrap(), 7);
        assert_eq!(wb.get_col_width("Sheet1", "D").unwrap(), 15.0);
    }

    #[test]
    fn test_col_style() {
        let wb = styled_workbook();
        wb.set_cell_value("Sheet1", "B1", CellValue::from(1.0)).unwrap();
        wb.set_cell_value("Sheet1", "A3", CellValue::from(2.0)).unwrap();

        wb.set_col_style("Sheet1", "B:C", 2).unwrap();
        assert_eq!(wb.get_col_style("Sheet1", "B").unwrap(), 2);
        assert_eq!(wb.get_col_style("Sheet1", "C").unwrap(), 2);
        assert_eq!(wb.get_col_style("Sheet1", "A").unwrap(), 0);

        let ws = wb.worksheet("Sheet1").unwrap();
        let ws = lock(&ws);
        // Existing rows get the style in every styled column
        for (col, row) in [(2, 1), (3, 1), (2, 3), (3, 3)] {
            assert_eq!(ws.cell(col, row).map(|c| c.s), Some(2), "({col}, {row})");
        }
        assert_eq!(ws.cell(1, 3).map(|c| c.s), Some(0));
        assert!(ws.sheet_data.row(2).is_none());
    }

    #[test]
    fn test_col_style_rejects_unknown_id() {
        let wb = styled_workbook();
        assert_eq!(core_err(wb.set_col_style("Sheet1", "A", 3)), Error::InvalidStyleId(3));
        assert_eq!(wb.get_col_style("Sheet1", "A").unwrap(), 0);
    }

    #[test]
    fn test_insert_and_remove_cols() {
        let wb = Workbook::new();
        wb.set_col_width("Sheet1", "A", "A", 8.0).unwrap();
        wb.set_col_width("Sheet1", "B", "B", 12.0).unwrap();
        wb.set_col_width("Sheet1", "C", "C", 16.0).unwrap();

        wb.insert_cols("Sheet1", "B", 2).unwrap();
        assert_eq!(wb.get_col_width("Sheet1", "A").unwrap(), 8.0);
        assert_eq!(wb.get_col_width("Sheet1", "D").unwrap(), 12.0);
        assert_eq!(wb.get_col_width("Sheet1", "E").unwrap(), 16.0);

        wb.remove_col("Sheet1", "B").unwrap();
        wb.remove_col("Sheet1", "B").unwrap();
        assert_eq!(wb.get_col_width("Sheet1", "B").unwrap(), 12.0);

        assert_eq!(core_err(wb.insert_cols("Sheet1", "A", 0)), Error::ColumnNumber);
        assert_eq!(core_err(wb.insert_cols("Sheet1", "A", 16_385)), Error::ColumnNumber);
    }

    #[test]
    fn test_pixels() {
        let wb = Workbook::new();
        assert_eq!(wb.get_col_width_pixels("Sheet1", "A").unwrap(), DEFAULT_COL_WIDTH_PIXELS);
        wb.set_col_width("Sheet1", "B", "B", 0.5).unwrap();
        assert_eq!(wb.get_col_width_pixels("Sheet1", "B").unwrap(), 6);
        assert_eq!(wb.get_row_height_pixels("Sheet1", 1).unwrap(), 20);
        assert!(wb.get_row_height_pixels("Sheet1", 0).is_err());
    }

    #[test]
    fn test_position_object() {
        let wb = Workbook::new();
        wb.set_col_width("Sheet1", "B", "B", 5.0).unwrap();

        // 84 px in A, then 40 px in B
        let anchor = wb
            .position_object_pixels("Sheet1", "A1", 130, 10, &GraphicOptions::default())
            .unwrap();
        assert_eq!((anchor.col_start, anchor.col_end, anchor.x2), (0, 2, 6));
        assert_eq!((anchor.row_start, anchor.row_end, anchor.y2), (0, 0, 10));
    }
}
