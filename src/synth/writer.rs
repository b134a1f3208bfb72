//! Low-level PDF writer on top of lopdf.
//!
//! Coordinates are PDF user space: origin at the bottom-left of the page.
//! Text uses the standard-14 fonts with `WinAnsiEncoding`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream, StringFormat};

use super::image::EmbeddedImage;
use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::metrics::StandardFont;

/// Accumulates pages of drawing operations and serializes them.
pub struct PdfWriter {
    doc: LopdfDocument,
    pages_id: ObjectId,
    width: f32,
    height: f32,
    pages: Vec<ObjectId>,
    ops: Vec<Operation>,
    page_open: bool,
    fonts: Vec<(StandardFont, ObjectId)>,
    images: Vec<ObjectId>,
    title: Option<String>,
}

impl PdfWriter {
    /// Writer producing pages of `width` × `height` points.
    pub fn new(width: f32, height: f32) -> Self {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            width,
            height,
            pages: Vec::new(),
            ops: Vec::new(),
            page_open: false,
            fonts: Vec::new(),
            images: Vec::new(),
            title: None,
        }
    }

    /// Document title written to the Info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Pages started so far, including the open one.
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.page_open)
    }

    /// Close the current page (if any) and open a new one.
    pub fn new_page(&mut self) -> Result<()> {
        self.close_page()?;
        self.page_open = true;
        Ok(())
    }

    fn ensure_page(&mut self) {
        self.page_open = true;
    }

    fn close_page(&mut self) -> Result<()> {
        if !self.page_open {
            return Ok(());
        }
        let content = Content {
            operations: std::mem::take(&mut self.ops),
        };
        let bytes = content.encode()?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
        });
        self.pages.push(page_id);
        self.page_open = false;
        Ok(())
    }

    /// Resource name of a font, registering it on first use.
    fn font_resource(&mut self, font: StandardFont) -> String {
        if let Some(index) = self.fonts.iter().position(|(f, _)| *f == font) {
            return format!("F{}", index + 1);
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.fonts.push((font, id));
        format!("F{}", self.fonts.len())
    }

    /// Draw a single line of text with its baseline at `(x, y)`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, font: StandardFont, size: f32, color: Color) {
        if text.is_empty() {
            return;
        }
        self.ensure_page();
        let name = self.font_resource(font);
        let (r, g, b) = color.to_unit_rgb();
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Tf", vec![Object::Name(name.into_bytes()), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Rectangle with an optional fill and an optional `(color, width)` stroke.
    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
    ) {
        if fill.is_none() && stroke.is_none() {
            return;
        }
        self.ensure_page();
        self.ops.push(Operation::new("q", vec![]));
        if let Some(color) = fill {
            let (r, g, b) = color.to_unit_rgb();
            self.ops
                .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        }
        if let Some((color, line_width)) = stroke {
            let (r, g, b) = color.to_unit_rgb();
            self.ops
                .push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
            self.ops.push(Operation::new("w", vec![line_width.into()]));
        }
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        let paint = match (fill.is_some(), stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            _ => "S",
        };
        self.ops.push(Operation::new(paint, vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Straight stroked line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, line_width: f32) {
        self.ensure_page();
        let (r, g, b) = color.to_unit_rgb();
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![line_width.into()]),
            Operation::new("m", vec![x1.into(), y1.into()]),
            Operation::new("l", vec![x2.into(), y2.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Place an image with its lower-left corner at `(x, y)`.
    pub fn image(&mut self, image: EmbeddedImage, x: f32, y: f32, width: f32, height: f32) {
        self.ensure_page();
        let id = self.doc.add_object(image.into_stream());
        self.images.push(id);
        let name = format!("Im{}", self.images.len());
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Serialize the document. An empty document gets one blank page.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.close_page()?;
        if self.pages.is_empty() {
            self.page_open = true;
            self.close_page()?;
        }

        let mut fonts = Dictionary::new();
        for (index, (_, id)) in self.fonts.iter().enumerate() {
            fonts.set(format!("F{}", index + 1), *id);
        }
        let mut xobjects = Dictionary::new();
        for (index, id) in self.images.iter().enumerate() {
            xobjects.set(format!("Im{}", index + 1), *id);
        }
        let resources_id = self.doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let kids: Vec<Object> = self.pages.iter().map(|id| Object::Reference(*id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), self.width.into(), self.height.into()],
                "Resources" => resources_id,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal("repdf"),
            "CreationDate" => Object::string_literal(
                chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string()
            ),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        let info_id = self.doc.add_object(info);
        self.doc.trailer.set("Info", info_id);

        log::debug!(
            "Writing PDF: {} pages, {} fonts, {} images",
            self.pages.len(),
            self.fonts.len(),
            self.images.len()
        );

        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| Error::Synthesis(format!("cannot serialize PDF: {}", e)))?;
        Ok(out)
    }
}

/// PDF text string: PDFDocEncoding-compatible ASCII, else UTF-16BE with BOM.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Encode text as WinAnsi (Windows-1252); unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}
