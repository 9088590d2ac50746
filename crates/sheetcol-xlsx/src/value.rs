//! Cell value decoding
//!
//! A cell's stored value is turned into text in two steps: the type-specific
//! decode (shared-string lookup, booleans, numeric normalisation) and, unless
//! raw values are requested, a [`CellValueFormatter`] pass that can apply the
//! cell's number format.

use sheetcol_core::Cell;

use crate::reader::SharedStringTable;

/// Significant digits kept when a stored number is longer than a double shows
const NUMBER_PRECISION: usize = 15;

/// Options for reading cell values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Return stored values without number normalisation or formatting
    pub raw_cell_value: bool,
}

impl Options {
    /// Options returning raw cell values
    pub fn raw() -> Self {
        Self {
            raw_cell_value: true,
        }
    }
}

/// What a formatter knows about the cell it formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContext<'a> {
    /// Cell reference
    pub cell_ref: &'a str,
    /// Value type attribute
    pub cell_type: Option<&'a str>,
    /// Style index
    pub style: u32,
    /// Number format ID of the style
    pub num_fmt_id: u32,
    /// Number format code of the style, if known
    pub num_fmt: Option<&'a str>,
}

/// Turns a decoded cell value into its display text
pub trait CellValueFormatter {
    /// Format `value`
    fn format(&self, value: &str, cell: &CellContext<'_>) -> String;
}

/// Formatter for the General number format: values are shown as decoded
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralFormatter;

impl CellValueFormatter for GeneralFormatter {
    fn format(&self, value: &str, _cell: &CellContext<'_>) -> String {
        value.to_string()
    }
}

impl<F> CellValueFormatter for F
where
    F: Fn(&str, &CellContext<'_>) -> String,
{
    fn format(&self, value: &str, cell: &CellContext<'_>) -> String {
        self(value, cell)
    }
}

/// Number of digits in the shortest decimal form of `s`, if it is a number
fn numeric_precision(s: &str) -> Option<(usize, f64)> {
    let s = s.trim();
    if s.is_empty()
        || !s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
    {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let digits = value
        .abs()
        .to_string()
        .bytes()
        .filter(u8::is_ascii_digit)
        .count();
    Some((digits, value))
}

/// Format `value` with `precision` significant digits, shortest of
/// fixed and scientific notation, without trailing zeros
fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{:.*e}", precision - 1, value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    if exp < -4 || exp >= precision as i32 {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('E');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.abs()));
    } else if exp < 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat((-exp - 1) as usize));
        out.push_str(digits);
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            out.push_str(digits);
            out.push_str(&"0".repeat(int_len - digits.len()));
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
    out
}

/// Shorten a stored number that carries more digits than a double holds
///
/// `0.30000000000000004` reads as `0.3`; anything else is returned as is.
pub fn normalize_number(value: &str) -> String {
    match numeric_precision(value) {
        Some((digits, number)) if digits > NUMBER_PRECISION => {
            format_general(number, NUMBER_PRECISION)
        }
        _ => value.to_string(),
    }
}

/// Decode the stored value of `cell`
///
/// Shared strings are always resolved; booleans and numbers are only
/// rewritten when `raw` is false.
pub fn decode_cell_value(cell: &Cell, sst: &SharedStringTable, raw: bool) -> String {
    let v = cell.v.as_deref().unwrap_or_default();
    match cell.t.as_deref() {
        Some("b") if !raw => match v.trim() {
            "1" => "TRUE".to_string(),
            "0" => "FALSE".to_string(),
            _ => v.to_string(),
        },
        Some("s") => {
            let resolved = v
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| sst.get(idx));
            match resolved {
                Some(s) => s.to_string(),
                None => {
                    log::warn!("cell {} refers to missing shared string {:?}", cell.r, v);
                    v.to_string()
                }
            }
        }
        Some("inlineStr") => cell.is.clone().unwrap_or_else(|| v.to_string()),
        None | Some("n") if !raw => normalize_number(v),
        _ => v.to_string(),
    }
}
