//! Document reader: opens a PDF and extracts its structure page by page.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Instant;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use super::content::{decode_text_simple, get_number, inherited, interpret_page, resolve_dict, PageContent};
use super::images::extract_page_images;
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ExtractOptions};
use super::table_detector::TableDetector;
use crate::compose::compose_page;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::model::{
    DocumentStructure, ExtractionStats, ImageElement, PageStructure, Table, TextBlock,
    DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH,
};

/// PDF structure reader.
pub struct PdfReader {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl PdfReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        let version = header_version(data)?;
        log::debug!("PDF header declares version {}", version);
        let doc = LopdfDocument::load_mem(data).map_err(load_error)?;
        Self::from_document(doc, options)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R, options: ExtractOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn from_document(doc: LopdfDocument, options: ExtractOptions) -> Result<Self> {
        // Decryption is not supported.
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        if doc.catalog().is_err() {
            return Err(Error::Corrupted("missing document catalog".to_string()));
        }
        Ok(Self { doc, options })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Extract the document structure.
    ///
    /// In lenient mode a failing page step is recorded as a warning and a
    /// failing page is recorded as an error with an empty placeholder page.
    pub fn extract(&self) -> Result<DocumentStructure> {
        let start = Instant::now();
        let pages = self.doc.get_pages();
        log::info!("Extracting {} pages (PDF {})", pages.len(), self.doc.version);

        let mut structure = DocumentStructure {
            total_pages: pages.len() as u32,
            metadata: self.metadata(),
            ..Default::default()
        };

        for (&page_num, &page_id) in pages.iter() {
            if !self.options.pages.includes(page_num) {
                continue;
            }

            match self.extract_page(page_num, page_id, &mut structure.stats) {
                Ok(page) => {
                    structure.stats.record_page(&page);
                    structure.pages.push(page);
                }
                Err(e) => {
                    let message = format!("Page {}: {}", page_num, e);
                    log::error!("{}", message);
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::Extraction(message));
                    }
                    structure.stats.push_error(message.clone());
                    structure.pages.push(PageStructure::failed(page_num, message));
                }
            }
        }

        structure.extraction_time = start.elapsed().as_secs_f64();
        log::info!(
            "Extracted {} pages: {} text blocks, {} images, {} tables in {:.3}s ({} warnings, {} errors)",
            structure.stats.pages_extracted,
            structure.stats.text_blocks,
            structure.stats.images_extracted,
            structure.stats.tables_detected,
            structure.extraction_time,
            structure.stats.warnings.len(),
            structure.stats.errors.len()
        );

        Ok(structure)
    }

    /// Extract one page, isolating the text, image and table steps.
    fn extract_page(
        &self,
        page_num: u32,
        page_id: ObjectId,
        stats: &mut ExtractionStats,
    ) -> Result<PageStructure> {
        log::debug!("Extracting page {}", page_num);
        self.doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let media_box = self.media_box(page_id);
        let mut page = PageStructure::new(page_num, media_box.width(), media_box.height());

        let content = interpret_page(&self.doc, page_id, media_box);

        match text_step(&content) {
            Ok(blocks) => page.text_blocks = blocks,
            Err(e) => self.step_failed(stats, page_num, "text", e)?,
        }

        if self.options.extract_images {
            match self.image_step(page_num, page_id, content.as_ref().ok()) {
                Ok(images) => page.images = images,
                Err(e) => self.step_failed(stats, page_num, "image", e)?,
            }
        }

        if self.options.detect_tables {
            match self.table_step(&content) {
                Ok(tables) => page.tables = tables,
                Err(e) => self.step_failed(stats, page_num, "table", e)?,
            }
        }

        compose_page(&mut page);
        Ok(page)
    }

    fn image_step(
        &self,
        page_num: u32,
        page_id: ObjectId,
        content: Option<&PageContent>,
    ) -> Result<Vec<ImageElement>> {
        extract_page_images(&self.doc, page_id, page_num, content)
    }

    fn table_step(&self, content: &Result<PageContent>) -> Result<Vec<Table>> {
        match content {
            Ok(c) => {
                let detector = TableDetector::with_config(self.options.table.clone());
                Ok(detector.detect(&c.segments, &c.spans))
            }
            Err(e) => Err(Error::TableDetect(e.to_string())),
        }
    }

    /// Record a failed step, or propagate it in strict mode.
    fn step_failed(
        &self,
        stats: &mut ExtractionStats,
        page_num: u32,
        step: &str,
        error: Error,
    ) -> Result<()> {
        if self.options.error_mode == ErrorMode::Strict {
            return Err(error);
        }
        log::warn!("Page {}: {} step failed: {}", page_num, step, error);
        stats.push_warning(format!("Page {}: {} extraction failed", page_num, step));
        Ok(())
    }

    /// MediaBox of a page (inherited), defaulting to A4.
    fn media_box(&self, page_id: ObjectId) -> BoundingBox {
        inherited(&self.doc, page_id, b"MediaBox")
            .and_then(|obj| match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| arr.iter().filter_map(get_number).collect::<Vec<_>>())
            .filter(|v| v.len() >= 4)
            .map(|v| BoundingBox::new(v[0], v[1], v[2], v[3]).normalized())
            .filter(|b| b.width() > 0.0 && b.height() > 0.0)
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT))
    }

    /// Extract document metadata.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("format".to_string(), format!("PDF {}", self.doc.version));

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| resolve_dict(&self.doc, obj));

        if let Some(info) = info {
            let fields: [(&[u8], &str); 9] = [
                (b"Title", "title"),
                (b"Author", "author"),
                (b"Subject", "subject"),
                (b"Keywords", "keywords"),
                (b"Creator", "creator"),
                (b"Producer", "producer"),
                (b"CreationDate", "creationDate"),
                (b"ModDate", "modDate"),
                (b"Trapped", "trapped"),
            ];
            for (key, name) in fields {
                let Some(value) = get_string_from_dict(info, key) else {
                    continue;
                };
                let value = if key.ends_with(b"Date") {
                    parse_pdf_date(&value)
                        .map(|d| d.to_rfc3339())
                        .unwrap_or(value)
                } else {
                    value
                };
                if !value.trim().is_empty() {
                    metadata.insert(name.to_string(), value);
                }
            }
        }

        if let Ok(encrypt) = self.doc.trailer.get(b"Encrypt") {
            let filter = resolve_dict(&self.doc, encrypt)
                .and_then(|d| get_string_from_dict(d, b"Filter"))
                .unwrap_or_else(|| "Standard".to_string());
            metadata.insert("encryption".to_string(), filter);
        }

        metadata
    }
}

fn text_step(content: &Result<PageContent>) -> Result<Vec<TextBlock>> {
    match content {
        Ok(c) => Ok(LayoutAnalyzer::new().analyze(c.spans.clone())),
        Err(e) => Err(Error::TextExtract(e.to_string())),
    }
}

/// Map a load failure onto the extraction error family.
/// Version from the leading `%PDF-x.y` header.
///
/// Data without the signature is [`Error::Corrupted`]; a signature followed
/// by anything but `digit.digit` is [`Error::UnsupportedVersion`].
pub fn header_version(data: &[u8]) -> Result<String> {
    let rest = data
        .strip_prefix(b"%PDF-")
        .ok_or_else(|| Error::Corrupted("missing %PDF- signature".to_string()))?;
    match rest {
        [major, b'.', minor, ..] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(format!("{}.{}", *major as char, *minor as char))
        }
        _ => {
            let declared = rest.split(|b| b.is_ascii_whitespace()).next().unwrap_or_default();
            Err(Error::UnsupportedVersion(
                String::from_utf8_lossy(declared).into_owned(),
            ))
        }
    }
}

/// Whether the file at `path` starts with a PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    let mut header = Vec::with_capacity(16);
    File::open(path)
        .and_then(|f| f.take(16).read_to_end(&mut header))
        .is_ok()
        && header_version(&header).is_ok()
}

fn load_error(err: lopdf::Error) -> Error {
    match err {
        lopdf::Error::IO(e) => Error::Io(e),
        lopdf::Error::Decryption(_) => Error::Encrypted,
        other => Error::Corrupted(other.to_string()),
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(
            decode_text_simple(bytes)
                .trim_end_matches('\0')
                .to_string(),
        ),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        Object::Boolean(b) => Some(if *b { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
