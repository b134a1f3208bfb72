//! Editable-model converters.
//!
//! Both converters are pure functions over a [`DocumentStructure`] and share
//! the style-normalization helpers defined here.
//!
//! # Example
//!
//! ```no_run
//! use repdf::convert::{CanvasConverter, EditableConverter, RichTextConverter};
//!
//! fn main() -> repdf::Result<()> {
//!     let doc = repdf::extract_file("document.pdf")?;
//!
//!     let delta = RichTextConverter::default().convert(&doc);
//!     let canvas = CanvasConverter::default().convert(&doc);
//!     println!("{} ops, {} objects", delta.ops.len(), canvas.objects.len());
//!     Ok(())
//! }
//! ```

mod canvas;
mod rich_text;

pub(crate) use canvas::locate_page;
pub use canvas::{CanvasConverter, CanvasOptions};
pub use rich_text::{RichTextConverter, RichTextOptions};

use crate::model::{CanvasModel, DocumentStructure, RichTextModel};

/// Trait for converters from the extracted structure to an editable model.
pub trait EditableConverter: Send + Sync {
    /// The editable model produced.
    type Output;

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert an extracted document.
    fn convert(&self, doc: &DocumentStructure) -> Self::Output;
}

/// Convert with default rich-text options.
pub fn to_rich_text(doc: &DocumentStructure) -> RichTextModel {
    RichTextConverter::default().convert(doc)
}

/// Convert with default canvas options.
pub fn to_canvas(doc: &DocumentStructure) -> CanvasModel {
    CanvasConverter::default().convert(doc)
}

/// Strip a subset prefix (`ABCDEF+`) and a style suffix (`-Bold`) from a
/// PDF font name.
pub fn clean_font_name(font: &str) -> &str {
    let base = font.rsplit('+').next().unwrap_or(font);
    base.split('-').next().unwrap_or(base)
}

/// Best-effort web font family for a PDF font name.
pub fn web_font_family(font: &str) -> String {
    let clean = clean_font_name(font);
    if clean.is_empty() {
        "Arial".to_string()
    } else if clean.contains("Times") || clean.contains("Serif") {
        "Times New Roman".to_string()
    } else if clean.contains("Courier") || clean.contains("Mono") {
        "Courier New".to_string()
    } else if clean.contains("Helvetica") || clean.contains("Arial") {
        "Arial".to_string()
    } else {
        clean.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_font_name() {
        assert_eq!(clean_font_name("ABCDEF+Calibri-Bold"), "Calibri");
        assert_eq!(clean_font_name("Helvetica"), "Helvetica");
        assert_eq!(clean_font_name("Times-Roman"), "Times");
        assert_eq!(clean_font_name(""), "");
    }

    #[test]
    fn test_web_font_family() {
        assert_eq!(web_font_family("XYZ+TimesNewRomanPSMT"), "Times New Roman");
        assert_eq!(web_font_family("DejaVuSansMono"), "Courier New");
        assert_eq!(web_font_family("Courier-Bold"), "Courier New");
        assert_eq!(web_font_family("Helvetica-Oblique"), "Arial");
        assert_eq!(web_font_family("Calibri"), "Calibri");
        assert_eq!(web_font_family(""), "Arial");
    }
}
