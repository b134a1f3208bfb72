//! Re-synthesis of edited rich-text and canvas models.

use super::image::EmbeddedImage;
use super::writer::PdfWriter;
use super::SynthOptions;
use crate::convert::locate_page;
use crate::error::Result;
use crate::geometry::Color;
use crate::metrics::{FontFamily, StandardFont};
use crate::model::{
    parse_data_uri, CanvasModel, CanvasObject, ImageObject, Insert, LineObject, RectObject,
    RichTextModel, TextObject,
};

/// Left edge and top/bottom limits of rich-text output.
const RICH_TEXT_MARGIN: f32 = 50.0;
/// Vertical advance per rich-text line.
const RICH_TEXT_LINE_STEP: f32 = 20.0;
const RICH_TEXT_DEFAULT_SIZE: f32 = 12.0;
/// Canvas text lines below this baseline are dropped.
const CANVAS_MIN_BASELINE: f32 = 20.0;

/// Parse `#rrggbb`, `#rgb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.starts_with('#') {
        return Color::from_hex(value);
    }
    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<f32>().ok());
    let mut channel = || -> Option<u8> { Some(parts.next()??.round().clamp(0.0, 255.0) as u8) };
    Some(Color::from_rgb(channel()?, channel()?, channel()?))
}

struct RichTextCursor {
    writer: PdfWriter,
    height: f32,
    y: f32,
}

impl RichTextCursor {
    fn advance(&mut self, step: f32) -> Result<()> {
        self.y -= step;
        if self.y < RICH_TEXT_MARGIN {
            self.writer.new_page()?;
            self.y = self.height - RICH_TEXT_MARGIN;
        }
        Ok(())
    }

    fn at_top(&self) -> bool {
        self.y >= self.height - RICH_TEXT_MARGIN
    }
}

/// Draw a rich-text model top to bottom.
///
/// Each `\n`-separated piece of a text insert takes one line step; blank
/// pieces only advance. Image inserts are scaled to the usable width.
pub fn render_rich_text(model: &RichTextModel, options: &SynthOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.page_width, options.page_height);
    let mut cursor = RichTextCursor {
        writer: PdfWriter::new(width, height),
        height,
        y: height - RICH_TEXT_MARGIN,
    };
    cursor.writer.new_page()?;

    for op in &model.ops {
        let attrs = &op.attributes;
        match &op.insert {
            Insert::Text(text) => {
                let size = attrs
                    .size_px()
                    .filter(|s| s.is_finite() && *s > 0.0)
                    .unwrap_or(RICH_TEXT_DEFAULT_SIZE);
                let font = StandardFont::new(FontFamily::Helvetica, attrs.is_bold(), attrs.is_italic());
                let color = attrs
                    .color
                    .as_deref()
                    .and_then(Color::from_hex)
                    .unwrap_or(Color::BLACK);

                for piece in text.split('\n') {
                    if !piece.trim().is_empty() {
                        cursor
                            .writer
                            .text(RICH_TEXT_MARGIN, cursor.y, piece, font, size, color);
                    }
                    cursor.advance(RICH_TEXT_LINE_STEP)?;
                }
            }
            Insert::Image { image } => {
                let embedded = match parse_data_uri(image).and_then(|(_, b)| EmbeddedImage::from_bytes(&b)) {
                    Ok(embedded) => embedded,
                    Err(e) => {
                        log::warn!("Skipping rich-text image: {}", e);
                        continue;
                    }
                };
                let max_width = width - 2.0 * RICH_TEXT_MARGIN;
                let mut w = embedded.width as f32;
                let mut h = embedded.height as f32;
                if w > max_width {
                    h = (h * max_width / w).floor();
                    w = max_width;
                }
                if cursor.y - h < RICH_TEXT_MARGIN && !cursor.at_top() {
                    cursor.writer.new_page()?;
                    cursor.y = height - RICH_TEXT_MARGIN;
                }
                cursor
                    .writer
                    .image(embedded, RICH_TEXT_MARGIN, cursor.y - h, w, h);
                cursor.advance(h + RICH_TEXT_LINE_STEP)?;
            }
        }
    }

    cursor.writer.finish()
}

/// Page size of a canvas, read from its page background rectangles.
fn canvas_page_size(model: &CanvasModel, options: &SynthOptions) -> (f32, f32) {
    let scale = options.canvas.scale;
    model
        .objects
        .iter()
        .find_map(|o| match o {
            CanvasObject::Rect(r) if r.shadow.is_some() && !r.selectable && r.height > 0.0 => {
                Some((r.width / scale, r.height / scale))
            }
            _ => None,
        })
        .unwrap_or((options.page_width, options.page_height))
}

struct CanvasPainter<'a> {
    writer: PdfWriter,
    options: &'a SynthOptions,
    page_width: f32,
    page_height: f32,
    current_page: usize,
}

impl CanvasPainter<'_> {
    /// Move to the page holding canvas `y`; returns the page-local top in points.
    fn seek(&mut self, y: f32) -> Result<f32> {
        let (index, local) = locate_page(&self.options.canvas, self.page_height, y);
        while self.current_page < index {
            self.writer.new_page()?;
            self.current_page += 1;
        }
        Ok(local)
    }

    fn scale(&self) -> f32 {
        self.options.canvas.scale
    }

    fn text(&mut self, text: &TextObject) -> Result<()> {
        let top = self.seek(text.top)?;
        let size = text.font_size / self.scale();
        if !size.is_finite() || size <= 0.0 {
            return Ok(());
        }
        let family = StandardFont::from_name(&text.font_family).family;
        let font = StandardFont::new(family, text.is_bold(), text.is_italic());
        let color = parse_css_color(&text.fill).unwrap_or(Color::BLACK);
        let x = text.left / self.scale();

        let mut baseline = self.page_height - top - size;
        for line in text.text.split('\n') {
            if baseline <= CANVAS_MIN_BASELINE {
                break;
            }
            self.writer.text(x, baseline, line, font, size, color);
            baseline -= size + 2.0;
        }
        Ok(())
    }

    fn rect(&mut self, rect: &RectObject) -> Result<()> {
        let top = self.seek(rect.top)?;
        let scale = self.scale();
        let (w, h) = (rect.width / scale, rect.height / scale);
        let fill = if rect.fill.is_empty() || rect.fill == "transparent" || rect.fill.starts_with("rgba(") {
            None
        } else {
            parse_css_color(&rect.fill)
        };
        let stroke = parse_css_color(&rect.stroke).map(|c| (c, rect.stroke_width / scale));
        self.writer.rect(
            rect.left / scale,
            self.page_height - top - h,
            w,
            h,
            fill,
            stroke,
        );
        Ok(())
    }

    fn line(&mut self, line: &LineObject) -> Result<()> {
        let top = self.seek(line.y1.min(line.y2))?;
        let scale = self.scale();
        let base = line.y1.min(line.y2);
        let y1 = self.page_height - (top + (line.y1 - base) / scale);
        let y2 = self.page_height - (top + (line.y2 - base) / scale);
        let color = parse_css_color(&line.stroke).unwrap_or(Color::BLACK);
        self.writer.line(
            line.x1 / scale,
            y1,
            line.x2 / scale,
            y2,
            color,
            line.stroke_width / scale,
        );
        Ok(())
    }

    fn image(&mut self, image: &ImageObject) -> Result<()> {
        let embedded = parse_data_uri(&image.src).and_then(|(_, b)| EmbeddedImage::from_bytes(&b))?;
        let top = self.seek(image.top)?;
        let scale = self.scale();
        let (w, h) = (image.width / scale, image.height / scale);
        self.writer
            .image(embedded, image.left / scale, self.page_height - top - h, w, h);
        Ok(())
    }
}

/// Draw a canvas model, mapping each object back onto the page it sits on.
pub fn render_canvas(model: &CanvasModel, options: &SynthOptions) -> Result<Vec<u8>> {
    let (page_width, page_height) = canvas_page_size(model, options);
    let mut painter = CanvasPainter {
        writer: PdfWriter::new(page_width, page_height),
        options,
        page_width,
        page_height,
        current_page: 0,
    };
    painter.writer.new_page()?;

    let mut objects: Vec<&CanvasObject> = model
        .objects
        .iter()
        .filter(|o| !options.skip_chrome || o.is_selectable())
        .collect();
    objects.sort_by(|a, b| a.top().total_cmp(&b.top()));

    for object in objects {
        let result = match object {
            CanvasObject::Text(t) => painter.text(t),
            CanvasObject::Rect(r) => painter.rect(r),
            CanvasObject::Line(l) => painter.line(l),
            CanvasObject::Image(i) => painter.image(i),
        };
        if let Err(e) = result {
            log::warn!("Skipping canvas {} object: {}", object.kind(), e);
        }
    }

    log::debug!(
        "Canvas re-synthesized on {} pages of {}x{}",
        painter.writer.page_count(),
        painter.page_width,
        painter.page_height
    );
    painter.writer.finish()
}
