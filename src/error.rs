//! Error types for repdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction, conversion, and synthesis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file does not exist.
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input is not a PDF container, or its structure cannot be recovered.
    #[error("Corrupted PDF: {0}")]
    Corrupted(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing a PDF object or content stream.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error decoding an embedded image.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// Error while detecting tables on a page.
    #[error("Table detection error: {0}")]
    TableDetect(String),

    /// Catastrophic failure while walking the document.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Error while producing an output PDF.
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (JSON, text, HTML).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error is a document-level extraction failure
    /// (missing, unreadable, corrupt, or encrypted input).
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::NotFound(_)
                | Error::Corrupted(_)
                | Error::Encrypted
                | Error::UnsupportedVersion(_)
                | Error::Extraction(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}
