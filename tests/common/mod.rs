//! PDF fixtures assembled with lopdf.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A page under construction: raw content operators plus optional image.
#[derive(Default)]
pub struct FixturePage {
    content: String,
    image: Option<(u32, u32, Vec<u8>)>,
    broken_contents: bool,
}

impl FixturePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` with its baseline at PDF coordinates `(x, y)`.
    pub fn text(mut self, font: &str, size: f32, x: f32, y: f32, text: &str) -> Self {
        let escaped = text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
        self.content.push_str(&format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
            font, size, x, y, escaped
        ));
        self
    }

    /// Stroke a rectangle given by its lower-left corner.
    pub fn rect(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.content
            .push_str(&format!("0.5 w {} {} {} {} re S\n", x, y, w, h));
        self
    }

    /// Stroke a straight line.
    pub fn line(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.content
            .push_str(&format!("0.5 w {} {} m {} {} l S\n", x1, y1, x2, y2));
        self
    }

    /// Raw 8-bit RGB image placed with `cm` + `Do` at `(x, y, w, h)`.
    pub fn image(mut self, width: u32, height: u32, rgb: Vec<u8>, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.content
            .push_str(&format!("q {} 0 0 {} {} {} cm /Im1 Do Q\n", w, h, x, y));
        self.image = Some((width, height, rgb));
        self
    }

    /// Point `/Contents` at a non-stream object so content parsing fails.
    pub fn with_broken_contents(mut self) -> Self {
        self.broken_contents = true;
        self
    }
}

/// Fonts available to fixture pages.
const FONTS: [(&str, &str); 3] = [
    ("F1", "Helvetica"),
    ("F2", "Helvetica-Bold"),
    ("F3", "Times-Roman"),
];

/// Build a PDF from fixture pages (595×842 each).
pub fn build_pdf(pages: Vec<FixturePage>) -> Vec<u8> {
    build_document(pages, None)
}

/// Build a PDF whose trailer declares an `/Encrypt` dictionary.
pub fn build_encrypted_pdf() -> Vec<u8> {
    let page = FixturePage::new().text("F1", 12.0, 72.0, 770.0, "secret");
    build_document(vec![page], Some(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0u8; 32]),
        "U" => Object::string_literal(vec![0u8; 32]),
        "P" => -4,
    }))
}

fn build_document(pages: Vec<FixturePage>, encrypt: Option<lopdf::Dictionary>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font_dict = lopdf::Dictionary::new();
    for (name, base) in FONTS {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(name, id);
    }
    let font_id = doc.add_object(font_dict);

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut resources = dictionary! { "Font" => font_id };
        if let Some((width, height, rgb)) = page.image {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                rgb,
            ));
            resources.set("XObject", dictionary! { "Im1" => image_id });
        }

        let contents: ObjectId = if page.broken_contents {
            doc.add_object(dictionary! { "Not" => "a stream" })
        } else {
            doc.add_object(Stream::new(dictionary! {}, page.content.into_bytes()))
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => contents,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Fixture"),
        "Author" => Object::string_literal("repdf tests"),
    });
    doc.trailer.set("Info", info_id);
    if let Some(encrypt) = encrypt {
        let encrypt_id = doc.add_object(encrypt);
        doc.trailer.set("Encrypt", encrypt_id);
    }

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("fixture serializes");
    out
}

/// The end-to-end sample: a heading, a body paragraph and a ruled 2×2 table.
pub fn heading_body_table_pdf() -> Vec<u8> {
    // Table grid: x 72..372 (split at 222), y 600..660 (split at 630).
    let page = FixturePage::new()
        .text("F2", 20.0, 72.0, 770.0, "# Title")
        .text("F1", 11.0, 72.0, 730.0, "A short body paragraph.")
        .rect(72.0, 600.0, 300.0, 60.0)
        .line(72.0, 630.0, 372.0, 630.0)
        .line(222.0, 600.0, 222.0, 660.0)
        .text("F1", 10.0, 80.0, 640.0, "A1")
        .text("F1", 10.0, 230.0, 640.0, "B1")
        .text("F1", 10.0, 80.0, 610.0, "A2")
        .text("F1", 10.0, 230.0, 610.0, "B2");
    build_pdf(vec![page])
}

/// A tiny RGB payload: 2×2 pixels.
pub fn rgb_2x2() -> Vec<u8> {
    vec![
        255, 0, 0, 0, 255, 0, //
        0, 0, 255, 255, 255, 255,
    ]
}
