//! In-memory OPC package
//!
//! An `.xlsx` file is a zip archive of XML parts. [`Package`] holds every
//! part as raw bytes keyed by its name inside the archive, so parts this
//! crate never looks at are written back unchanged.

use std::collections::BTreeMap;
use std::io::{Read, Seek, Write};

use sheetcol_core::{check_sheet_name, Error};

use crate::error::{XlsxError, XlsxResult};
use crate::writer;

/// Name of the content types part
pub const CONTENT_TYPES: &str = "[Content_Types].xml";

/// Name of the workbook part
pub const WORKBOOK: &str = "xl/workbook.xml";

/// Name of the workbook relationships part
pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";

/// Name of the shared strings part
pub const SHARED_STRINGS: &str = "xl/sharedStrings.xml";

/// Name of the styles part
pub const STYLES: &str = "xl/styles.xml";

/// Raw parts of a package
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    /// Read every part of a zip archive
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.insert(name, data);
        }

        if !parts.contains_key(CONTENT_TYPES) {
            return Err(XlsxError::InvalidFormat(format!("Missing {CONTENT_TYPES}")));
        }
        log::debug!("read package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Write every part into a new zip archive
    pub fn write<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }

        zip.finish()?;
        log::debug!("wrote package with {} parts", self.parts.len());
        Ok(())
    }

    /// Build a minimal workbook containing empty sheets named `sheet_names`
    pub fn blank(sheet_names: &[&str]) -> XlsxResult<Self> {
        if sheet_names.is_empty() {
            return Err(Error::other("a workbook needs at least one sheet").into());
        }
        for (i, name) in sheet_names.iter().enumerate() {
            check_sheet_name(name)?;
            let lower = name.to_lowercase();
            if sheet_names[..i].iter().any(|n| n.to_lowercase() == lower) {
                return Err(Error::InvalidSheetName(format!("duplicate sheet name {name:?}")).into());
            }
        }

        Ok(Self::blank_unchecked(sheet_names))
    }

    /// [`Package::blank`] without name validation
    pub(crate) fn blank_unchecked(sheet_names: &[&str]) -> Self {
        let mut pkg = Self::default();
        pkg.insert(CONTENT_TYPES, writer::content_types_xml(sheet_names.len()));
        pkg.insert("_rels/.rels", writer::root_rels_xml());
        pkg.insert(WORKBOOK, writer::workbook_xml(sheet_names));
        pkg.insert(WORKBOOK_RELS, writer::workbook_rels_xml(sheet_names.len()));
        pkg.insert(STYLES, writer::styles_xml(&[0]));
        for i in 0..sheet_names.len() {
            pkg.insert(
                format!("xl/worksheets/sheet{}.xml", i + 1),
                writer::blank_worksheet_xml(),
            );
        }
        pkg
    }

    /// Bytes of part `name`
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Bytes of part `name`, failing if it is absent
    pub fn require(&self, name: &str) -> XlsxResult<&[u8]> {
        self.get(name)
            .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
    }

    /// Add or replace part `name`
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.parts.insert(name.into(), data.into());
    }

    /// Check if part `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Names of all parts
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }
}
