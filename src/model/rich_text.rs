//! Rich-text ("Delta"-style) model: an ordered list of insert operations.

use serde::{Deserialize, Serialize};

/// Editable rich-text document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextModel {
    pub ops: Vec<RichTextOp>,
}

impl RichTextModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: RichTextOp) {
        self.ops.push(op);
    }

    /// Append a plain newline op.
    pub fn newline(&mut self) {
        self.ops.push(RichTextOp::text("\n"));
    }

    /// Concatenated text inserts; images are skipped.
    pub fn plain_text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| op.insert.as_text())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// One insert operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextOp {
    pub insert: Insert,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl RichTextOp {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes: Attributes::default(),
        }
    }

    pub fn styled(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes,
        }
    }

    pub fn image(src: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            insert: Insert::Image { image: src.into() },
            attributes,
        }
    }
}

/// Inserted content: a string or an embedded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    Image { image: String },
}

impl Insert {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Insert::Text(s) => Some(s),
            Insert::Image { .. } => None,
        }
    }

    pub fn as_image(&self) -> Option<&str> {
        match self {
            Insert::Image { image } => Some(image),
            Insert::Text(_) => None,
        }
    }
}

/// Formatting attributes. Unset attributes are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// `#rrggbb`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// CSS size, e.g. `12px`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width.to_string());
        self.height = Some(height.to_string());
        self
    }

    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.align = Some(align.into());
        self
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    /// Numeric part of a `Npx` size.
    pub fn size_px(&self) -> Option<f32> {
        self.size
            .as_deref()
            .map(|s| s.trim().trim_end_matches("px"))
            .and_then(|s| s.parse().ok())
    }
}
