//! Positioned-object ("canvas") conversion.

use super::{web_font_family, EditableConverter};
use crate::model::{
    CanvasModel, CanvasObject, DocumentStructure, ImageObject, LineObject, PageStructure,
    RectObject, Shadow, Table, TextLine, TextObject, DEFAULT_PAGE_HEIGHT,
};

const DARK_STROKE: &str = "#2d3748";
const LIGHT_STROKE: &str = "#cbd5e0";

/// Options for canvas conversion.
#[derive(Debug, Clone)]
pub struct CanvasOptions {
    /// Magnification applied to every coordinate
    pub scale: f32,
    /// Vertical gap between pages
    pub page_spacing: f32,
    pub bottom_margin: f32,
    pub min_width: f32,
    /// Canvas height when the document has no pages
    pub empty_height: f32,
    pub version: String,
    pub background: String,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            scale: 1.5,
            page_spacing: 50.0,
            bottom_margin: 50.0,
            min_width: 900.0,
            empty_height: 1200.0,
            version: "5.3.0".to_string(),
            background: "#e2e8f0".to_string(),
        }
    }
}

impl CanvasOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_page_spacing(mut self, spacing: f32) -> Self {
        self.page_spacing = spacing;
        self
    }

    /// Distance between the tops of consecutive pages of the given height.
    pub fn page_stride(&self, page_height: f32) -> f32 {
        page_height * self.scale + self.page_spacing
    }
}

/// Converts extracted structure into absolutely positioned objects.
#[derive(Debug, Clone, Default)]
pub struct CanvasConverter {
    options: CanvasOptions,
}

impl CanvasConverter {
    pub fn new(options: CanvasOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    fn push_page(&self, objects: &mut Vec<CanvasObject>, page: &PageStructure, offset: f32) {
        let scale = self.options.scale;
        let page_width = page.width * scale;
        let page_height = page.height * scale;

        objects.push(CanvasObject::Rect(RectObject {
            left: 0.0,
            top: offset,
            width: page_width,
            height: page_height,
            fill: "#ffffff".to_string(),
            stroke: LIGHT_STROKE.to_string(),
            stroke_width: 1.0,
            selectable: false,
            evented: false,
            shadow: Some(Shadow {
                color: "rgba(0,0,0,0.1)".to_string(),
                blur: 10.0,
                offset_x: 0.0,
                offset_y: 2.0,
            }),
        }));

        objects.push(CanvasObject::Text(TextObject {
            text: page.page_number.to_string(),
            left: page_width - 45.0,
            top: offset + 15.0,
            font_size: 12.0,
            font_weight: "bold".to_string(),
            fill: "#a0aec0".to_string(),
            font_family: "Arial".to_string(),
            origin_x: "center".to_string(),
            origin_y: "top".to_string(),
            selectable: false,
            evented: Some(false),
            ..Default::default()
        }));

        // Tables go beneath the text drawn afterwards.
        for table in page.tables.iter().filter(|t| !t.rows.is_empty()) {
            self.push_table(objects, table, offset);
        }

        for line in page.text_blocks.iter().flat_map(|b| b.lines.iter()) {
            if let Some(text) = self.line_object(line, offset) {
                objects.push(CanvasObject::Text(text));
            }
        }

        for image in &page.images {
            let bbox = image.bbox.scaled(scale);
            objects.push(CanvasObject::Image(ImageObject {
                src: image.data.clone(),
                left: bbox.x0,
                top: offset + bbox.y0,
                width: bbox.width(),
                height: bbox.height(),
                selectable: true,
                has_controls: true,
                has_borders: true,
                origin_x: "left".to_string(),
                origin_y: "top".to_string(),
                cross_origin: "anonymous".to_string(),
            }));
        }
    }

    /// Overlay rect, grid lines and header tint; cell text is left to the
    /// page's own text objects.
    fn push_table(&self, objects: &mut Vec<CanvasObject>, table: &Table, offset: f32) {
        let bbox = table.bbox.scaled(self.options.scale);
        let left = bbox.x0;
        let top = offset + bbox.y0;
        let width = bbox.width();
        let height = bbox.height();

        let num_rows = if table.num_rows > 0 { table.num_rows } else { table.rows.len() };
        let num_cols = if table.num_cols > 0 {
            table.num_cols
        } else {
            table.column_count()
        };
        let cell_height = if num_rows > 0 { height / num_rows as f32 } else { 20.0 };
        let cell_width = if num_cols > 0 { width / num_cols as f32 } else { 100.0 };

        objects.push(CanvasObject::Rect(RectObject {
            left,
            top,
            width,
            height,
            fill: "rgba(255, 255, 255, 0.05)".to_string(),
            stroke: DARK_STROKE.to_string(),
            stroke_width: 2.0,
            ..Default::default()
        }));

        for i in 0..=num_rows {
            let y = top + i as f32 * cell_height;
            objects.push(CanvasObject::Line(LineObject {
                x1: left,
                y1: y,
                x2: left + width,
                y2: y,
                stroke: if i <= 1 { DARK_STROKE } else { LIGHT_STROKE }.to_string(),
                stroke_width: if i == 1 { 2.0 } else { 1.0 },
                ..Default::default()
            }));
        }

        for j in 0..=num_cols {
            let x = left + j as f32 * cell_width;
            objects.push(CanvasObject::Line(LineObject {
                x1: x,
                y1: top,
                x2: x,
                y2: top + height,
                stroke: if j == 0 || j == num_cols { DARK_STROKE } else { LIGHT_STROKE }
                    .to_string(),
                stroke_width: 1.0,
                ..Default::default()
            }));
        }

        for col in 0..num_cols {
            objects.push(CanvasObject::Rect(RectObject {
                left: left + col as f32 * cell_width + 1.0,
                top: top + 1.0,
                width: cell_width - 2.0,
                height: cell_height - 2.0,
                fill: "rgba(237, 242, 247, 0.2)".to_string(),
                stroke: "transparent".to_string(),
                stroke_width: 0.0,
                ..Default::default()
            }));
        }
    }

    /// One text object per line, styled after its first span.
    fn line_object(&self, line: &TextLine, offset: f32) -> Option<TextObject> {
        let first = line.spans.first()?;
        let text = line.text();
        if text.trim().is_empty() {
            return None;
        }

        let scale = self.options.scale;
        Some(TextObject {
            text,
            left: line.bbox.x0 * scale,
            top: offset + line.bbox.y0 * scale,
            font_size: first.size * scale,
            font_weight: if first.bold { "bold" } else { "normal" }.to_string(),
            font_style: Some(if first.italic { "italic" } else { "normal" }.to_string()),
            fill: first.color.to_hex(),
            font_family: web_font_family(&first.font),
            origin_x: "left".to_string(),
            origin_y: "top".to_string(),
            selectable: true,
            evented: None,
            editable: Some(true),
            line_height: Some(1.2),
            char_spacing: Some(0.0),
        })
    }
}

impl EditableConverter for CanvasConverter {
    type Output = CanvasModel;

    fn name(&self) -> &str {
        "canvas"
    }

    fn convert(&self, doc: &DocumentStructure) -> CanvasModel {
        let opts = &self.options;
        let mut objects = Vec::new();

        for (index, page) in doc.pages.iter().enumerate() {
            let offset = index as f32 * opts.page_stride(page.height);
            self.push_page(&mut objects, page, offset);
        }

        let canvas_height = match doc.pages.first() {
            Some(first) => {
                let scaled = first.height * opts.scale;
                (doc.pages.len() - 1) as f32 * (scaled + opts.page_spacing)
                    + scaled
                    + opts.bottom_margin
            }
            None => opts.empty_height,
        };

        let canvas_width = doc
            .pages
            .iter()
            .map(|p| p.width)
            .fold(None, |acc: Option<f32>, w| Some(acc.map_or(w, |a| a.max(w))))
            .map(|w| (w * opts.scale).floor().max(opts.min_width))
            .unwrap_or(opts.min_width);

        log::debug!(
            "Converted {} pages into {} canvas objects",
            doc.pages.len(),
            objects.len()
        );

        CanvasModel {
            version: opts.version.clone(),
            objects,
            background: opts.background.clone(),
            canvas_height,
            canvas_width,
        }
    }
}

/// Page index and page-local position of a canvas y coordinate.
pub(crate) fn locate_page(options: &CanvasOptions, page_height: f32, y: f32) -> (usize, f32) {
    let height = if page_height > 0.0 { page_height } else { DEFAULT_PAGE_HEIGHT };
    let stride = options.page_stride(height);
    let index = (y / stride).floor().max(0.0);
    (index as usize, (y - index * stride) / options.scale)
}
