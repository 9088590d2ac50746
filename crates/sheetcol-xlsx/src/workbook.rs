//! Workbook type - a package plus its lazily decoded parts
//!
//! Worksheets are decoded on first access and kept in a registry, each behind
//! its own mutex. Locks are always taken in the order registry, worksheet,
//! package, and the registry lock is only held long enough to look up or
//! insert an entry.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::OnceCell;
use sheetcol_core::{check_sheet_name, Cell, Error, Worksheet};

use crate::error::XlsxResult;
use crate::package::{Package, SHARED_STRINGS, STYLES};
use crate::reader::{read_workbook_sheets, read_worksheet, SharedStringTable};
use crate::styles::StyleTable;
use crate::value::{decode_cell_value, CellContext, CellValueFormatter, GeneralFormatter, Options};
use crate::writer::write_worksheet;

/// Lock a mutex, taking over the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A workbook
///
/// All methods take `&self`; a `Workbook` can be shared between threads.
pub struct Workbook {
    /// Raw package parts
    package: Mutex<Package>,
    /// Sheet names and worksheet part paths, in workbook order
    sheets: Vec<(String, String)>,
    /// Decoded worksheets keyed by part path
    worksheets: Mutex<HashMap<String, Arc<Mutex<Worksheet>>>>,
    shared_strings: OnceCell<SharedStringTable>,
    styles: OnceCell<Mutex<StyleTable>>,
    /// Read options used when none are given
    options: Options,
    formatter: Box<dyn CellValueFormatter + Send + Sync>,
}

impl fmt::Debug for Workbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workbook")
            .field("sheets", &self.sheets)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// Create a new workbook with one empty sheet named `Sheet1`
    pub fn new() -> Self {
        Self::from_parts(
            Package::blank_unchecked(&["Sheet1"]),
            vec![("Sheet1".into(), "xl/worksheets/sheet1.xml".into())],
        )
    }

    /// Create a new workbook with empty sheets named `names`
    pub fn with_sheets(names: &[&str]) -> XlsxResult<Self> {
        Self::from_package(Package::blank(names)?)
    }

    /// Open an `.xlsx` file
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Self::open_with_options(path, Options::default())
    }

    /// Open an `.xlsx` file with default read options
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: Options) -> XlsxResult<Self> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file))?.with_options(options))
    }

    /// Read a workbook from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        Self::from_package(Package::read(reader)?)
    }

    /// Wrap an already loaded package
    pub fn from_package(package: Package) -> XlsxResult<Self> {
        let sheets = read_workbook_sheets(&package)?;
        log::debug!("workbook has {} sheet(s)", sheets.len());
        Ok(Self::from_parts(package, sheets))
    }

    fn from_parts(package: Package, sheets: Vec<(String, String)>) -> Self {
        Self {
            package: Mutex::new(package),
            sheets,
            worksheets: Mutex::new(HashMap::new()),
            shared_strings: OnceCell::new(),
            styles: OnceCell::new(),
            options: Options::default(),
            formatter: Box::new(GeneralFormatter),
        }
    }

    /// Set the read options used when none are given
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replace the cell value formatter
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: CellValueFormatter + Send + Sync + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    /// Read options used when none are given
    pub fn options(&self) -> Options {
        self.options
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    // === Saving ===

    /// Save the workbook to `path`
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    /// Write the workbook as an `.xlsx` archive
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        self.flush_worksheets();
        lock(&self.package).write(writer)
    }

    /// Encode every decoded worksheet back into the package
    fn flush_worksheets(&self) {
        let decoded: Vec<(String, Arc<Mutex<Worksheet>>)> = lock(&self.worksheets)
            .iter()
            .map(|(path, ws)| (path.clone(), Arc::clone(ws)))
            .collect();
        for (path, ws) in decoded {
            let data = write_worksheet(&lock(&ws));
            lock(&self.package).insert(path, data);
        }
    }

    // === Registry ===

    /// Part path of sheet `name`
    ///
    /// Names compare case-insensitively, as in the host application.
    pub(crate) fn sheet_path(&self, name: &str) -> XlsxResult<&str> {
        check_sheet_name(name)?;
        let lower = name.to_lowercase();
        self.sheets
            .iter()
            .find(|(n, _)| n.to_lowercase() == lower)
            .map(|(_, path)| path.as_str())
            .ok_or_else(|| Error::SheetNotFound(name.to_string()).into())
    }

    /// The decoded worksheet `name`, decoding it on first use
    pub(crate) fn worksheet(&self, name: &str) -> XlsxResult<Arc<Mutex<Worksheet>>> {
        let path = self.sheet_path(name)?;
        let mut registry = lock(&self.worksheets);
        if let Some(ws) = registry.get(path) {
            return Ok(Arc::clone(ws));
        }

        let sheet = {
            let package = lock(&self.package);
            read_worksheet(package.require(path)?)?
        };
        log::debug!("decoded worksheet {name:?} from {path}");
        let ws = Arc::new(Mutex::new(sheet));
        registry.insert(path.to_string(), Arc::clone(&ws));
        Ok(ws)
    }

    /// Bytes of the worksheet part for `name`, including unsaved edits
    pub(crate) fn worksheet_snapshot(&self, name: &str) -> XlsxResult<Vec<u8>> {
        let path = self.sheet_path(name)?;
        let decoded = lock(&self.worksheets).get(path).cloned();
        if let Some(ws) = decoded {
            let data = write_worksheet(&lock(&ws));
            log::debug!("flushed worksheet {name:?} for snapshot");
            lock(&self.package).insert(path, data.clone());
            return Ok(data);
        }
        Ok(lock(&self.package).require(path)?.to_vec())
    }

    // === Shared parts ===

    /// The shared string table, read on first use
    pub(crate) fn shared_strings(&self) -> XlsxResult<&SharedStringTable> {
        self.shared_strings.get_or_try_init(|| {
            let package = lock(&self.package);
            match package.get(SHARED_STRINGS) {
                Some(data) => SharedStringTable::parse(data),
                None => Ok(SharedStringTable::default()),
            }
        })
    }

    /// The style table, read on first use
    pub(crate) fn styles(&self) -> XlsxResult<&Mutex<StyleTable>> {
        self.styles.get_or_try_init(|| {
            let package = lock(&self.package);
            let table = match package.get(STYLES) {
                Some(data) => StyleTable::parse(data)?,
                None => StyleTable::default(),
            };
            Ok(Mutex::new(table))
        })
    }

    /// Display value of `cell`
    pub(crate) fn cell_value(&self, cell: &Cell, options: &Options) -> XlsxResult<String> {
        let value = decode_cell_value(cell, self.shared_strings()?, options.raw_cell_value);
        if options.raw_cell_value {
            return Ok(value);
        }

        let num_fmt = lock(self.styles()?)
            .number_format(cell.s)
            .map(|(id, code)| (id, code.to_string()));
        let ctx = CellContext {
            cell_ref: &cell.r,
            cell_type: cell.t.as_deref(),
            style: cell.s,
            num_fmt_id: num_fmt.as_ref().map_or(0, |(id, _)| *id),
            num_fmt: num_fmt.as_ref().map(|(_, code)| code.as_str()),
        };
        Ok(self.formatter.format(&value, &ctx))
    }
}
