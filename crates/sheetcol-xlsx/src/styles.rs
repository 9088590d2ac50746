//! Style table
//!
//! Only the cell formats (`cellXfs`) and custom number formats are read: they
//! are what style-ID validation and value formatting need. The styles part
//! itself is never rewritten.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetcol_core::Error;

use crate::error::XlsxResult;
use crate::reader::{attr_value, parse_attr, parse_bool};

/// One entry of `cellXfs`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellXf {
    /// Number format ID
    pub num_fmt_id: u32,
    /// Number format applies
    pub apply_number_format: bool,
}

/// Format code of a built-in number format
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    Some(match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    })
}

/// Cell formats of a workbook
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    cell_xfs: Vec<CellXf>,
    num_fmts: HashMap<u32, String>,
}

impl Default for StyleTable {
    /// A table with the single default format
    fn default() -> Self {
        Self {
            cell_xfs: vec![CellXf::default()],
            num_fmts: HashMap::new(),
        }
    }
}

fn read_xf(e: &BytesStart<'_>) -> XlsxResult<CellXf> {
    let mut xf = CellXf::default();
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr)?;
        let key = attr.key.as_ref();
        match key {
            b"numFmtId" => xf.num_fmt_id = parse_attr(key, &value).unwrap_or(0),
            b"applyNumberFormat" => xf.apply_number_format = parse_bool(&value),
            _ => {}
        }
    }
    Ok(xf)
}

impl StyleTable {
    /// Parse `xl/styles.xml`
    pub fn parse(data: &[u8]) -> XlsxResult<Self> {
        let mut xml_reader = Reader::from_reader(data);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut cell_xfs = Vec::new();
        let mut num_fmts = HashMap::new();
        let mut in_cell_xfs = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = true,
                Event::End(e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"xf" if in_cell_xfs => cell_xfs.push(read_xf(&e)?),
                    b"numFmt" => {
                        let mut id = None;
                        let mut code = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"numFmtId" => id = parse_attr::<u32>(b"numFmtId", &attr_value(&attr)?),
                                b"formatCode" => code = Some(attr_value(&attr)?),
                                _ => {}
                            }
                        }
                        if let (Some(id), Some(code)) = (id, code) {
                            num_fmts.insert(id, code);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "read {} cell formats, {} custom number formats",
            cell_xfs.len(),
            num_fmts.len()
        );
        Ok(Self { cell_xfs, num_fmts })
    }

    /// Number of cell formats
    pub fn cell_xfs_count(&self) -> usize {
        self.cell_xfs.len()
    }

    /// Cell format `id`
    pub fn cell_xf(&self, id: u32) -> Option<&CellXf> {
        self.cell_xfs.get(id as usize)
    }

    /// Fail with [`Error::InvalidStyleId`] unless `id` names a cell format
    pub fn check_style_id(&self, id: u32) -> Result<(), Error> {
        if (id as usize) < self.cell_xfs.len() {
            Ok(())
        } else {
            Err(Error::InvalidStyleId(id))
        }
    }

    /// Number format `(id, code)` used by cell format `style`
    pub fn number_format(&self, style: u32) -> Option<(u32, &str)> {
        let id = self.cell_xf(style)?.num_fmt_id;
        let code = self
            .num_fmts
            .get(&id)
            .map(String::as_str)
            .or_else(|| builtin_format_code(id))?;
        Some((id, code))
    }
}
