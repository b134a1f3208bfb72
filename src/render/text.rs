//! Plain text rendering.

use crate::model::{CanvasModel, CanvasObject, DocumentStructure, RichTextModel};

/// Page texts separated by a blank line.
pub fn to_text(doc: &DocumentStructure) -> String {
    doc.plain_text().trim().to_string()
}

/// Text inserts of a rich-text model; images are skipped.
pub fn rich_text_to_text(model: &RichTextModel) -> String {
    model.plain_text().trim().to_string()
}

/// Selectable text objects of a canvas, top to bottom.
pub fn canvas_to_text(model: &CanvasModel) -> String {
    let mut texts: Vec<(f32, f32, &str)> = model
        .objects
        .iter()
        .filter_map(|o| match o {
            CanvasObject::Text(t) if t.selectable && !t.text.trim().is_empty() => {
                Some((t.top, t.left, t.text.as_str()))
            }
            _ => None,
        })
        .collect();
    texts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    texts
        .into_iter()
        .map(|(_, _, text)| text)
        .collect::<Vec<_>>()
        .join("\n")
}
