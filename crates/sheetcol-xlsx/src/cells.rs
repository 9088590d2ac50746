//! Cell access

use sheetcol_core::{cell_name_to_coordinates, CellValue};

use crate::error::XlsxResult;
use crate::value::Options;
use crate::workbook::{lock, Workbook};

impl Workbook {
    /// Display value of `cell`, read with the default options
    pub fn get_cell_value(&self, sheet: &str, cell: &str) -> XlsxResult<String> {
        self.get_cell_value_with(sheet, cell, &self.options())
    }

    /// Value of `cell`; empty for cells that do not exist
    pub fn get_cell_value_with(&self, sheet: &str, cell: &str, options: &Options) -> XlsxResult<String> {
        let (col, row) = cell_name_to_coordinates(cell)?;
        // Formatting may lock the style table, so the worksheet is released first
        let found = self.with_worksheet(sheet, |ws| Ok(ws.cell(col, row).cloned()))?;
        match found {
            Some(c) => self.cell_value(&c, options),
            None => Ok(String::new()),
        }
    }

    /// Store `value` in `cell`, replacing any formula
    pub fn set_cell_value(&self, sheet: &str, cell: &str, value: impl Into<CellValue>) -> XlsxResult<()> {
        let (col, row) = cell_name_to_coordinates(cell)?;
        let value = value.into();
        self.with_worksheet(sheet, |ws| {
            ws.cell_mut(col, row)?.set_value(value);
            Ok(())
        })
    }

    /// Apply style `style` to every cell in the rectangle `from`:`to`
    pub fn set_cell_style(&self, sheet: &str, from: &str, to: &str, style: u32) -> XlsxResult<()> {
        let (c1, r1) = cell_name_to_coordinates(from)?;
        let (c2, r2) = cell_name_to_coordinates(to)?;
        let (c1, c2) = (c1.min(c2), c1.max(c2));
        let (r1, r2) = (r1.min(r2), r1.max(r2));
        lock(self.styles()?).check_style_id(style)?;

        self.with_worksheet(sheet, |ws| {
            for row in r1..=r2 {
                for col in c1..=c2 {
                    ws.set_cell_style(col, row, style)?;
                }
            }
            Ok(())
        })
    }
}
