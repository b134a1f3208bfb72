//! Rendering module: exports of extracted documents and editable models.

mod html;
mod json;
mod text;

pub use html::{canvas_to_html, escape_html, rich_text_to_html, to_html};
pub use json::{to_json, to_json_value, JsonFormat};
pub use text::{canvas_to_text, rich_text_to_text, to_text};
