//! Rich-text ("Delta") conversion.

use super::{clean_font_name, EditableConverter};
use crate::model::{
    needs_space_between, Attributes, DocumentStructure, ImageElement, PageStructure,
    RichTextModel, RichTextOp, Table, TextBlock, TextSpan,
};

/// Options for rich-text conversion.
#[derive(Debug, Clone)]
pub struct RichTextOptions {
    /// Images wider than this are scaled down proportionally
    pub max_image_width: u32,
    pub header_color: String,
    pub header_size: String,
    pub table_label: String,
    pub table_label_color: String,
    /// Character repeated to draw the divider between pages
    pub divider_char: char,
    pub divider_len: usize,
}

impl Default for RichTextOptions {
    fn default() -> Self {
        Self {
            max_image_width: 600,
            header_color: "#667eea".to_string(),
            header_size: "16px".to_string(),
            table_label: "Tableau détecté:".to_string(),
            table_label_color: "#4a5568".to_string(),
            divider_char: '─',
            divider_len: 50,
        }
    }
}

impl RichTextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_image_width(mut self, width: u32) -> Self {
        self.max_image_width = width;
        self
    }

    pub fn with_table_label(mut self, label: impl Into<String>) -> Self {
        self.table_label = label.into();
        self
    }

    fn divider(&self) -> String {
        let line: String = std::iter::repeat(self.divider_char)
            .take(self.divider_len)
            .collect();
        format!("\n{}\n\n", line)
    }
}

/// Converts extracted structure into an ordered list of insert operations.
#[derive(Debug, Clone, Default)]
pub struct RichTextConverter {
    options: RichTextOptions,
}

impl RichTextConverter {
    pub fn new(options: RichTextOptions) -> Self {
        Self { options }
    }

    fn push_page(&self, model: &mut RichTextModel, page: &PageStructure) {
        let header = Attributes::default()
            .bold()
            .with_color(&self.options.header_color)
            .with_size(&self.options.header_size);
        model.push(RichTextOp::styled(format!("Page {}", page.page_number), header));
        model.push(RichTextOp::styled("\n", Attributes::default().with_align("center")));
        model.newline();

        for block in &page.text_blocks {
            self.push_block(model, block);
        }
        for image in &page.images {
            self.push_image(model, image);
        }
        for table in &page.tables {
            self.push_table(model, table);
        }
    }

    fn push_block(&self, model: &mut RichTextModel, block: &TextBlock) {
        for line in &block.lines {
            let mut prev: Option<&TextSpan> = None;
            for span in line.spans.iter().filter(|s| !s.text.is_empty()) {
                // Style changes split runs; the word gap between them has no glyph.
                let text = match prev {
                    Some(p) if needs_space_between(p, span) => format!(" {}", span.text),
                    _ => span.text.clone(),
                };
                model.push(RichTextOp::styled(text, span_attributes(span)));
                prev = Some(span);
            }
            if prev.is_some() {
                model.newline();
            }
        }
        if !block.lines.is_empty() {
            model.newline();
        }
    }

    fn push_image(&self, model: &mut RichTextModel, image: &ImageElement) {
        let (width, height) = display_size(image.width, image.height, self.options.max_image_width);
        model.push(RichTextOp::image(
            image.data.clone(),
            Attributes::default().with_dimensions(width, height),
        ));
        model.newline();
    }

    fn push_table(&self, model: &mut RichTextModel, table: &Table) {
        let label = Attributes::default()
            .bold()
            .with_color(&self.options.table_label_color);
        model.push(RichTextOp::styled(self.options.table_label.clone(), label));
        model.newline();
        for row in &table.rows {
            model.push(RichTextOp::text(row.join(" | ")));
            model.newline();
        }
        model.newline();
    }
}

impl EditableConverter for RichTextConverter {
    type Output = RichTextModel;

    fn name(&self) -> &str {
        "rich-text"
    }

    fn convert(&self, doc: &DocumentStructure) -> RichTextModel {
        let mut model = RichTextModel::new();
        let last = doc.pages.len().saturating_sub(1);
        for (index, page) in doc.pages.iter().enumerate() {
            self.push_page(&mut model, page);
            if index < last {
                model.push(RichTextOp::text(self.options.divider()));
            }
        }
        log::debug!("Converted {} pages into {} rich-text ops", doc.pages.len(), model.len());
        model
    }
}

/// Non-default attributes of a span.
fn span_attributes(span: &TextSpan) -> Attributes {
    let mut attrs = Attributes::default();
    if span.bold {
        attrs = attrs.bold();
    }
    if span.italic {
        attrs = attrs.italic();
    }
    if !span.color.is_black() {
        attrs = attrs.with_color(span.color.to_hex());
    }
    if span.size.is_finite() && span.size > 0.0 {
        attrs = attrs.with_size(format!("{}px", span.size.round() as i64));
    }
    let font = clean_font_name(&span.font);
    if !font.is_empty() {
        attrs = attrs.with_font(font);
    }
    attrs
}

/// Scale down to `max_width`, keeping the aspect ratio.
fn display_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width > max_width && width > 0 {
        let ratio = max_width as f64 / width as f64;
        (max_width, (height as f64 * ratio) as u32)
    } else {
        (width, height)
    }
}
