//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{ImageElement, Table, TextBlock};
use crate::geometry::BoundingBox;

/// A4 width in points, used when a page declares no MediaBox.
pub const DEFAULT_PAGE_WIDTH: f32 = 595.0;
/// A4 height in points.
pub const DEFAULT_PAGE_HEIGHT: f32 = 842.0;

/// One visual element of a page in reading order.
///
/// `y` is the element's top edge and is the sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text {
        data: TextBlock,
        y: f32,
        bbox: BoundingBox,
    },
    Image {
        data: ImageElement,
        y: f32,
        bbox: BoundingBox,
    },
    Table {
        data: Table,
        y: f32,
        bbox: BoundingBox,
    },
}

impl Element {
    pub fn text(block: TextBlock) -> Self {
        Element::Text {
            y: block.bbox.y0,
            bbox: block.bbox,
            data: block,
        }
    }

    pub fn image(image: ImageElement) -> Self {
        Element::Image {
            y: image.bbox.y0,
            bbox: image.bbox,
            data: image,
        }
    }

    pub fn table(table: Table) -> Self {
        Element::Table {
            y: table.bbox.y0,
            bbox: table.bbox,
            data: table,
        }
    }

    pub fn y(&self) -> f32 {
        match self {
            Element::Text { y, .. } | Element::Image { y, .. } | Element::Table { y, .. } => *y,
        }
    }

    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Element::Text { bbox, .. }
            | Element::Image { bbox, .. }
            | Element::Table { bbox, .. } => bbox,
        }
    }

    /// Tag name as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text { .. } => "text",
            Element::Image { .. } => "image",
            Element::Table { .. } => "table",
        }
    }
}

/// A single extracted page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStructure {
    /// Page number (1-indexed)
    pub page_number: u32,

    pub text_blocks: Vec<TextBlock>,
    pub images: Vec<ImageElement>,
    pub tables: Vec<Table>,

    /// Reading-order view over the blocks, images and tables
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Set when the whole page failed to extract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageStructure {
    /// Create an empty page with the given dimensions.
    pub fn new(page_number: u32, width: f32, height: f32) -> Self {
        Self {
            page_number,
            text_blocks: Vec::new(),
            images: Vec::new(),
            tables: Vec::new(),
            elements: Vec::new(),
            width,
            height,
            error: None,
        }
    }

    /// Placeholder for a page that could not be extracted at all.
    pub fn failed(page_number: u32, error: impl Into<String>) -> Self {
        let mut page = Self::new(page_number, DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT);
        page.error = Some(error.into());
        page
    }

    /// Line texts of every block, one per line, in block order.
    pub fn plain_text(&self) -> String {
        self.text_blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.text_blocks.is_empty() && self.images.is_empty() && self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableKind, TextLine, TextSpan};

    fn block(text: &str, y: f32) -> TextBlock {
        let span = TextSpan::new(text, "Helvetica", 12.0, BoundingBox::new(10.0, y, 80.0, y + 12.0));
        TextBlock::from_lines(vec![TextLine::from_spans(vec![span])])
    }

    #[test]
    fn test_element_serializes_with_type_tag() {
        let el = Element::text(block("hi", 40.0));
        let v = serde_json::to_value(&el).unwrap();
        assert_eq!(v["type"], "text");
        assert_eq!(v["y"], 40.0);
        assert!(v["data"]["lines"].is_array());
        assert_eq!(v["bbox"][1], 40.0);

        let back: Element = serde_json::from_value(v).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_element_accessors() {
        let t = Table::new(vec![vec!["a".into()]], BoundingBox::new(0.0, 75.0, 10.0, 90.0), TableKind::Grid);
        let el = Element::table(t);
        assert_eq!(el.kind(), "table");
        assert_eq!(el.y(), 75.0);
        assert_eq!(el.bbox().y1, 90.0);
    }

    #[test]
    fn test_plain_text() {
        let mut page = PageStructure::new(1, 595.0, 842.0);
        page.text_blocks.push(block("first", 10.0));
        page.text_blocks.push(block("second", 40.0));
        assert_eq!(page.plain_text(), "first\nsecond");
    }

    #[test]
    fn test_failed_page() {
        let page = PageStructure::failed(3, "Page 3: boom");
        assert_eq!(page.width, DEFAULT_PAGE_WIDTH);
        assert!(page.is_empty());
        let v = serde_json::to_value(&page).unwrap();
        assert_eq!(v["error"], "Page 3: boom");

        let ok = PageStructure::new(1, 100.0, 100.0);
        let v = serde_json::to_value(&ok).unwrap();
        assert!(v.get("error").is_none());
    }
}
