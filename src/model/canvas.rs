//! Positioned-object ("canvas"-style) model.
//!
//! A flat list of absolutely positioned drawables. Later objects render on
//! top of earlier ones.

use serde::{Deserialize, Serialize};

/// Editable canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasModel {
    pub version: String,
    pub objects: Vec<CanvasObject>,
    pub background: String,
    #[serde(rename = "canvasHeight")]
    pub canvas_height: f32,
    #[serde(rename = "canvasWidth")]
    pub canvas_width: f32,
}

impl CanvasModel {
    pub fn texts(&self) -> impl Iterator<Item = &TextObject> {
        self.objects.iter().filter_map(|o| match o {
            CanvasObject::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageObject> {
        self.objects.iter().filter_map(|o| match o {
            CanvasObject::Image(i) => Some(i),
            _ => None,
        })
    }
}

/// A drawable, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasObject {
    Rect(RectObject),
    Line(LineObject),
    Text(TextObject),
    Image(ImageObject),
}

impl CanvasObject {
    pub fn kind(&self) -> &'static str {
        match self {
            CanvasObject::Rect(_) => "rect",
            CanvasObject::Line(_) => "line",
            CanvasObject::Text(_) => "text",
            CanvasObject::Image(_) => "image",
        }
    }

    /// Vertical position used for reading order.
    pub fn top(&self) -> f32 {
        match self {
            CanvasObject::Rect(r) => r.top,
            CanvasObject::Line(l) => l.y1.min(l.y2),
            CanvasObject::Text(t) => t.top,
            CanvasObject::Image(i) => i.top,
        }
    }

    /// Whether the user can pick the object; page chrome is not selectable.
    pub fn is_selectable(&self) -> bool {
        match self {
            CanvasObject::Rect(r) => r.selectable,
            CanvasObject::Line(l) => l.selectable,
            CanvasObject::Text(t) => t.selectable,
            CanvasObject::Image(i) => i.selectable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RectObject {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub selectable: bool,
    pub evented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineObject {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stroke: String,
    pub stroke_width: f32,
    pub selectable: bool,
    pub evented: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextObject {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub font_size: f32,
    /// `bold` or `normal`
    pub font_weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    pub fill: String,
    pub font_family: String,
    pub origin_x: String,
    pub origin_y: String,
    pub selectable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evented: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_spacing: Option<f32>,
}

impl TextObject {
    pub fn is_bold(&self) -> bool {
        self.font_weight.eq_ignore_ascii_case("bold")
            || self.font_weight.parse::<u32>().map(|w| w >= 600).unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.font_style
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("italic") || s.eq_ignore_ascii_case("oblique"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageObject {
    pub src: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub selectable: bool,
    pub has_controls: bool,
    pub has_borders: bool,
    pub origin_x: String,
    pub origin_y: String,
    pub cross_origin: String,
}
