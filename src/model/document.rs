//! Document-level types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PageStructure;

/// Counts and non-fatal diagnostics collected during extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub pages_extracted: u32,
    pub text_blocks: u32,
    pub images_extracted: u32,
    pub tables_detected: u32,
    /// Whole-page failures
    pub errors: Vec<String>,
    /// Failed sub-steps of otherwise extracted pages
    pub warnings: Vec<String>,
}

impl ExtractionStats {
    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Add a finished page's counts.
    pub fn record_page(&mut self, page: &PageStructure) {
        self.pages_extracted += 1;
        self.text_blocks += page.text_blocks.len() as u32;
        self.images_extracted += page.images.len() as u32;
        self.tables_detected += page.tables.len() as u32;
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// The full result of extracting a PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    pub pages: Vec<PageStructure>,

    pub total_pages: u32,

    /// Document information (title, author, dates, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    #[serde(default)]
    pub stats: ExtractionStats,

    /// Wall-clock extraction time in seconds
    #[serde(default)]
    pub extraction_time: f64,
}

impl DocumentStructure {
    /// Get a page by number (1-indexed).
    pub fn page(&self, page_number: u32) -> Option<&PageStructure> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Get a metadata value.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Plain text of the entire document, pages separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record_page() {
        let mut stats = ExtractionStats::default();
        let page = PageStructure::new(1, 595.0, 842.0);
        stats.record_page(&page);
        stats.record_page(&page);
        assert_eq!(stats.pages_extracted, 2);
        assert!(!stats.has_issues());

        stats.push_warning("Page 2: image extraction failed");
        assert_eq!(stats.warnings.len(), 1);
        assert!(stats.has_issues());
    }

    #[test]
    fn test_document_keys() {
        let doc = DocumentStructure {
            pages: vec![PageStructure::new(1, 595.0, 842.0)],
            total_pages: 1,
            ..Default::default()
        };
        let v = serde_json::to_value(&doc).unwrap();
        for key in ["pages", "total_pages", "metadata", "stats", "extraction_time"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert!(doc.page(1).is_some());
        assert!(doc.page(2).is_none());
    }

    #[test]
    fn test_document_deserializes_minimal_input() {
        let json = r#"{"pages": [], "total_pages": 0}"#;
        let doc: DocumentStructure = serde_json::from_str(json).unwrap();
        assert!(doc.is_empty());
        assert!(doc.metadata.is_empty());
    }
}
