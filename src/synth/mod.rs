//! PDF synthesis.
//!
//! Builds new PDF documents from plain marked-up content, from an extracted
//! [`DocumentStructure`] with literal text modifications, or from an edited
//! rich-text or canvas model.
//!
//! Rendering is best-effort: a paragraph, table or image that cannot be laid
//! out is logged and skipped, and the rest of the document is still produced.
//!
//! # Example
//!
//! ```no_run
//! use repdf::synth::{synthesize_structure, Modifications, SynthOptions};
//!
//! fn main() -> repdf::Result<()> {
//!     let doc = repdf::extract_file("contract.pdf")?;
//!     let mods = Modifications::new().with("30 jours", "45 jours");
//!     let pdf = synthesize_structure("Contract", &doc, &mods, &SynthOptions::default())?;
//!     std::fs::write("contract-updated.pdf", pdf)?;
//!     Ok(())
//! }
//! ```

mod editable;
mod flow;
mod image;
mod markup;
mod modifications;
mod structure;
mod writer;

pub use editable::parse_css_color;
pub use flow::{Align, CellStyle, FlowLayout, ParagraphStyle, Run, TableStyle};
pub use image::{rgb_to_png, EmbeddedImage};
pub use markup::{looks_like_table_row, parse_markup, parse_runs, Block};
pub use modifications::Modifications;
pub use structure::column_widths;
pub use writer::{encode_win_ansi, PdfWriter};

use crate::convert::CanvasOptions;
use crate::error::Result;
use crate::geometry::Color;
use crate::metrics::StandardFont;
use crate::model::{CanvasModel, DocumentStructure, RichTextModel};

const INCH: f32 = 72.0;

/// Page geometry and table widths used by the synthesizer.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Width shared by the columns of structure-mode tables
    pub structure_table_width: f32,
    /// Width of tables found in plain content
    pub plain_table_width: f32,
    /// Geometry of canvas models being re-synthesized
    pub canvas: CanvasOptions,
    /// Drop non-selectable canvas objects (page backgrounds, badges, table chrome)
    pub skip_chrome: bool,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: INCH,
            structure_table_width: 7.0 * INCH,
            plain_table_width: 6.5 * INCH,
            canvas: CanvasOptions::default(),
            skip_chrome: true,
        }
    }
}

impl SynthOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_canvas(mut self, canvas: CanvasOptions) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_skip_chrome(mut self, skip: bool) -> Self {
        self.skip_chrome = skip;
        self
    }

    fn layout(&self, title: &str) -> FlowLayout {
        let writer = PdfWriter::new(self.page_width, self.page_height).with_title(title);
        FlowLayout::new(writer, self.margin)
    }
}

fn title_page(flow: &mut FlowLayout, title: &str) -> Result<()> {
    flow.page_break()?;
    if let Err(e) = flow.text(title, &markup::title_style()) {
        log::warn!("Skipping title: {}", e);
    }
    flow.spacer(0.3 * INCH);
    Ok(())
}

/// Synthesize a PDF from a title and plain marked-up content.
pub fn synthesize_plain(title: &str, content: &str, options: &SynthOptions) -> Result<Vec<u8>> {
    let mut flow = options.layout(title);
    title_page(&mut flow, title)?;
    let blocks = parse_markup(content);
    log::debug!("Plain content: {} blocks", blocks.len());
    markup::render_blocks(&mut flow, &blocks, options);
    flow.finish()
}

/// Like [`synthesize_plain`], with a generation date line under the title.
pub fn synthesize_document(title: &str, content: &str, options: &SynthOptions) -> Result<Vec<u8>> {
    let mut flow = options.layout(title);
    title_page(&mut flow, title)?;

    let generated = chrono::Local::now().format("%d/%m/%Y à %H:%M");
    let date_style = ParagraphStyle::new(StandardFont::HELVETICA, 9.0)
        .with_color(Color(0x808080))
        .centered();
    if let Err(e) = flow.text(&format!("Document mis à jour - Généré le {}", generated), &date_style) {
        log::warn!("Skipping date line: {}", e);
    }
    flow.spacer(0.2 * INCH);

    markup::render_blocks(&mut flow, &parse_markup(content), options);
    flow.finish()
}

/// Re-synthesize an extracted document after applying `modifications`.
///
/// Pages with tables keep their first two text lines as a caption followed
/// by the tables; other pages go through the plain-content parser.
pub fn synthesize_structure(
    title: &str,
    doc: &DocumentStructure,
    modifications: &Modifications,
    options: &SynthOptions,
) -> Result<Vec<u8>> {
    log::info!(
        "Synthesizing {} pages with {} modifications",
        doc.pages.len(),
        modifications.len()
    );
    let mut flow = options.layout(title);
    title_page(&mut flow, title)?;
    structure::render_pages(&mut flow, doc, modifications, options)?;
    flow.finish()
}

/// Draw an edited rich-text model.
pub fn synthesize_rich_text(model: &RichTextModel, options: &SynthOptions) -> Result<Vec<u8>> {
    log::info!("Synthesizing rich text: {} ops", model.len());
    editable::render_rich_text(model, options)
}

/// Draw an edited canvas model.
pub fn synthesize_canvas(model: &CanvasModel, options: &SynthOptions) -> Result<Vec<u8>> {
    log::info!("Synthesizing canvas: {} objects", model.objects.len());
    editable::render_canvas(model, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_count(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_empty_content_gives_title_page() {
        let pdf = synthesize_plain("Only a title", "", &SynthOptions::default()).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(page_count(&pdf), 1);

        let empty = DocumentStructure::default();
        let pdf = synthesize_structure("T", &empty, &Modifications::new(), &SynthOptions::default()).unwrap();
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_document_mode_renders() {
        let pdf = synthesize_document(
            "Report",
            "# Summary\nSome **bold** text\n- item\n\nName      Qty      Price\nApples    3        1.20",
            &SynthOptions::default(),
        )
        .unwrap();
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_rich_text_pages() {
        let mut model = RichTextModel::new();
        for i in 0..60 {
            model.push(crate::model::RichTextOp::text(format!("Line {}\n", i)));
        }
        let pdf = synthesize_rich_text(&model, &SynthOptions::default()).unwrap();
        assert!(page_count(&pdf) >= 2);
    }
}
