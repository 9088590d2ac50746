//! Common utilities for E2E tests.

use std::fmt::Write as _;
use std::io::Write;

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Builder for a workbook file on disk
///
/// # Example
///
/// ```rust,ignore
/// let file = Fixture::new()
///     .sheet("Data", "<sheetData><row r=\"1\"><c r=\"A1\"><v>1</v></c></row></sheetData>")
///     .write();
/// let wb = Workbook::open(file.path()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Fixture {
    /// Sheet name and the children of its `<worksheet>` element
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    /// Children of `<cellXfs>`
    cell_xfs: Option<String>,
    extra: Vec<(String, String)>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet; `body` is the content of its `<worksheet>` element
    pub fn sheet(mut self, name: &str, body: &str) -> Self {
        self.sheets.push((name.to_string(), body.to_string()));
        self
    }

    /// Add a shared string table
    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a style table whose `<cellXfs>` holds `xfs`
    pub fn cell_xfs(mut self, xfs: &str) -> Self {
        self.cell_xfs = Some(xfs.to_string());
        self
    }

    /// Add a part this crate does not model
    pub fn part(mut self, name: &str, content: &str) -> Self {
        self.extra.push((name.to_string(), content.to_string()));
        self
    }

    fn parts(&self) -> Vec<(String, String)> {
        let mut parts = Vec::new();

        let mut types = String::from(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#
        );
        for i in 1..=self.sheets.len() {
            let _ = write!(
                types,
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            );
        }
        types.push_str("</Types>");
        parts.push(("[Content_Types].xml".to_string(), types));

        parts.push((
            "_rels/.rels".to_string(),
            format!(
                r#"<Relationships xmlns="{NS_PKG_REL}"><Relationship Id="rId1" Type="{NS_REL}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            ),
        ));

        let mut workbook = format!(r#"<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheets>"#);
        let mut rels = format!(r#"<Relationships xmlns="{NS_PKG_REL}">"#);
        for (i, (name, body)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            let _ = write!(
                workbook,
                r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#
            );
            let _ = write!(
                rels,
                r#"<Relationship Id="rId{n}" Type="{NS_REL}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            );
            parts.push((
                format!("xl/worksheets/sheet{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{NS_MAIN}" xmlns:r="{NS_REL}">{body}</worksheet>"#
                ),
            ));
        }
        workbook.push_str("</sheets></workbook>");
        rels.push_str("</Relationships>");
        parts.push(("xl/workbook.xml".to_string(), workbook));
        parts.push(("xl/_rels/workbook.xml.rels".to_string(), rels));

        if !self.shared_strings.is_empty() {
            let mut sst = format!(
                r#"<sst xmlns="{NS_MAIN}" count="{0}" uniqueCount="{0}">"#,
                self.shared_strings.len()
            );
            for s in &self.shared_strings {
                let _ = write!(sst, "<si><t>{s}</t></si>");
            }
            sst.push_str("</sst>");
            parts.push(("xl/sharedStrings.xml".to_string(), sst));
        }

        if let Some(xfs) = &self.cell_xfs {
            parts.push((
                "xl/styles.xml".to_string(),
                format!(r#"<styleSheet xmlns="{NS_MAIN}"><cellXfs>{xfs}</cellXfs></styleSheet>"#),
            ));
        }

        parts.extend(self.extra.iter().cloned());
        parts
    }

    /// Write the package to a new temp file
    pub fn write(&self) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .unwrap();
        {
            let mut zip = ZipWriter::new(file.as_file_mut());
            let options = SimpleFileOptions::default();
            for (name, content) in self.parts() {
                zip.start_file(name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        file
    }
}

/// Text of part `name` inside the archive at `path`
pub fn part_text(path: &std::path::Path, name: &str) -> String {
    let pkg = sheetcol_xlsx::Package::read(std::fs::File::open(path).unwrap()).unwrap();
    String::from_utf8(pkg.get(name).unwrap().to_vec()).unwrap()
}
