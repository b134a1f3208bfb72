//! # repdf
//!
//! PDF structural extraction and re-synthesis.
//!
//! This library reads a PDF into a page-level structure (styled text spans,
//! images, detected tables, reading-order elements), converts that structure
//! into two editable models (rich-text ops and positioned canvas objects),
//! and writes new PDFs from plain content, from a modified structure, or
//! from an edited model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use repdf::{extract_file, render};
//!
//! fn main() -> repdf::Result<()> {
//!     let doc = extract_file("document.pdf")?;
//!     println!("{} pages, {} tables", doc.total_pages, doc.stats.tables_detected);
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structural extraction**: spans with font, size, weight and color
//! - **Table detection**: ruled grids and whitespace-aligned columns
//! - **Editable models**: rich-text ops and canvas objects, both JSON
//! - **Re-synthesis**: find/replace over the original structure
//! - **Partial failure**: a failing page step becomes a warning, not an error

pub mod compose;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod render;
pub mod synth;

// Re-export commonly used types
pub use convert::{
    CanvasConverter, CanvasOptions, EditableConverter, RichTextConverter, RichTextOptions,
};
pub use error::{Error, Result};
pub use geometry::{BoundingBox, Color};
pub use model::{
    CanvasModel, CanvasObject, DocumentStructure, Element, ExtractionStats, ImageElement,
    PageStructure, RichTextModel, RichTextOp, Table, TableKind, TextBlock, TextLine, TextSpan,
};
pub use parser::{
    is_pdf, ErrorMode, ExtractOptions, PageSelection, PdfReader, TableDetectorConfig,
};
pub use render::JsonFormat;
pub use synth::{Modifications, SynthOptions};

use std::io::Read;
use std::path::Path;

/// Extract the structure of a PDF file.
///
/// # Example
///
/// ```no_run
/// use repdf::extract_file;
///
/// let doc = extract_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.total_pages);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentStructure> {
    PdfReader::open(path)?.extract()
}

/// Extract a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use repdf::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().text_only();
/// let doc = extract_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<DocumentStructure> {
    PdfReader::open_with_options(path, options)?.extract()
}

/// Extract a PDF held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<DocumentStructure> {
    PdfReader::from_bytes(data)?.extract()
}

/// Extract a PDF held in memory with custom options.
pub fn extract_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<DocumentStructure> {
    PdfReader::from_bytes_with_options(data, options)?.extract()
}

/// Extract a PDF from any reader.
///
/// # Example
///
/// ```no_run
/// use repdf::extract_reader;
/// use std::fs::File;
///
/// let file = File::open("document.pdf").unwrap();
/// let doc = extract_reader(file).unwrap();
/// ```
pub fn extract_reader<R: Read>(reader: R) -> Result<DocumentStructure> {
    PdfReader::from_reader(reader, ExtractOptions::default())?.extract()
}

/// Extract plain text from a PDF file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(extract_file(path)?.plain_text())
}

/// Convert a PDF file to the rich-text model.
pub fn to_rich_text<P: AsRef<Path>>(path: P) -> Result<RichTextModel> {
    Ok(convert::to_rich_text(&extract_file(path)?))
}

/// Convert a PDF file to the canvas model.
pub fn to_canvas<P: AsRef<Path>>(path: P) -> Result<CanvasModel> {
    Ok(convert::to_canvas(&extract_file(path)?))
}

/// Builder for extracting, converting and re-synthesizing PDF documents.
///
/// # Example
///
/// ```no_run
/// use repdf::{Modifications, Repdf};
///
/// let pdf = Repdf::new()
///     .without_images()
///     .extract("document.pdf")?
///     .resynthesize("Updated", &Modifications::new().with("2023", "2024"))?;
/// std::fs::write("updated.pdf", pdf)?;
/// # Ok::<(), repdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Repdf {
    extract_options: ExtractOptions,
    rich_text_options: RichTextOptions,
    canvas_options: CanvasOptions,
    synth_options: SynthOptions,
}

impl Repdf {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the first page-step error.
    pub fn strict(mut self) -> Self {
        self.extract_options = self.extract_options.strict();
        self
    }

    /// Skip image extraction.
    pub fn without_images(mut self) -> Self {
        self.extract_options = self.extract_options.with_images(false);
        self
    }

    /// Skip table detection.
    pub fn without_tables(mut self) -> Self {
        self.extract_options = self.extract_options.with_tables(false);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract_options = self.extract_options.with_pages(pages);
        self
    }

    /// Set table detector tunables.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.extract_options = self.extract_options.with_table_config(config);
        self
    }

    pub fn with_rich_text_options(mut self, options: RichTextOptions) -> Self {
        self.rich_text_options = options;
        self
    }

    pub fn with_canvas_options(mut self, options: CanvasOptions) -> Self {
        self.synth_options = self.synth_options.with_canvas(options.clone());
        self.canvas_options = options;
        self
    }

    pub fn with_synth_options(mut self, options: SynthOptions) -> Self {
        self.synth_options = options;
        self
    }

    fn wrap(self, document: DocumentStructure) -> RepdfResult {
        RepdfResult {
            document,
            rich_text_options: self.rich_text_options,
            canvas_options: self.canvas_options,
            synth_options: self.synth_options,
        }
    }

    /// Extract a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<RepdfResult> {
        let document = PdfReader::open_with_options(path, self.extract_options.clone())?.extract()?;
        Ok(self.wrap(document))
    }

    /// Extract a PDF held in memory.
    pub fn extract_bytes(self, data: &[u8]) -> Result<RepdfResult> {
        let document =
            PdfReader::from_bytes_with_options(data, self.extract_options.clone())?.extract()?;
        Ok(self.wrap(document))
    }
}

/// An extracted document together with conversion settings.
#[derive(Debug, Clone)]
pub struct RepdfResult {
    /// The extracted document
    pub document: DocumentStructure,
    rich_text_options: RichTextOptions,
    canvas_options: CanvasOptions,
    synth_options: SynthOptions,
}

impl RepdfResult {
    /// Convert to the rich-text model.
    pub fn to_rich_text(&self) -> RichTextModel {
        RichTextConverter::new(self.rich_text_options.clone()).convert(&self.document)
    }

    /// Convert to the canvas model.
    pub fn to_canvas(&self) -> CanvasModel {
        CanvasConverter::new(self.canvas_options.clone()).convert(&self.document)
    }

    /// Serialize the extraction.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Standalone HTML export.
    pub fn to_html(&self) -> String {
        render::to_html(&self.document)
    }

    /// Plain text export.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Write a new PDF from the extracted structure with `modifications` applied.
    pub fn resynthesize(&self, title: &str, modifications: &Modifications) -> Result<Vec<u8>> {
        synth::synthesize_structure(title, &self.document, modifications, &self.synth_options)
    }

    /// Get the document.
    pub fn document(&self) -> &DocumentStructure {
        &self.document
    }
}
