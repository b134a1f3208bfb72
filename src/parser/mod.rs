//! PDF parsing module.

mod content;
mod images;
mod layout;
mod options;
mod reader;
mod table_detector;

pub use content::{interpret_page, page_content, ImagePlacement, PageContent, Segment};
pub use images::{extract_page_images, pixel_dimensions};
pub use layout::{FontStatistics, LayoutAnalyzer};
pub use options::{ErrorMode, ExtractOptions, PageSelection};
pub use reader::{header_version, is_pdf, PdfReader};
pub use table_detector::{merge_tables, TableDetector, TableDetectorConfig};
