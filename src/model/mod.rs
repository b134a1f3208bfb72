//! Document model types.
//!
//! [`DocumentStructure`] is the intermediate representation produced by the
//! reader and shared by every converter, exporter, and the synthesizer.
//! [`RichTextModel`] and [`CanvasModel`] are the two editable targets.

mod canvas;
mod document;
mod image;
mod page;
mod rich_text;
mod table;
mod text;

pub use canvas::{
    CanvasModel, CanvasObject, ImageObject, LineObject, RectObject, Shadow, TextObject,
};
pub use document::{DocumentStructure, ExtractionStats};
pub use image::{parse_data_uri, to_data_uri, ImageElement, DEFAULT_IMAGE_SIZE};
pub use page::{Element, PageStructure, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH};
pub use rich_text::{Attributes, Insert, RichTextModel, RichTextOp};
pub use table::{Table, TableKind};
pub use text::{
    is_spaceless_script_char, needs_space_between, style_from_font_name, TextBlock, TextLine,
    TextSpan,
};
