//! Extraction scenarios over generated PDFs.

mod common;

use common::{build_encrypted_pdf, build_pdf, heading_body_table_pdf, rgb_2x2, FixturePage};
use repdf::compose::compose_elements;
use repdf::{
    extract_bytes, extract_bytes_with_options, extract_file, BoundingBox, CanvasObject, Error,
    ExtractOptions, ImageElement, PageSelection, PageStructure, Repdf, Table, TableKind, TextBlock,
    TextLine, TextSpan,
};

fn block_at(text: &str, y: f32) -> TextBlock {
    let span = TextSpan::new(text, "Helvetica", 12.0, BoundingBox::new(300.0, y, 400.0, y + 12.0));
    TextBlock::from_lines(vec![TextLine::from_spans(vec![span])])
}

#[test]
fn test_elements_follow_reading_order() {
    let mut page = PageStructure::new(1, 595.0, 842.0);
    page.text_blocks.push(block_at("body", 100.0));
    page.images.push(ImageElement::from_bytes(
        b"fake",
        "png",
        (10, 10),
        BoundingBox::new(10.0, 50.0, 20.0, 60.0),
        1,
    ));
    page.tables.push(Table::new(
        vec![vec!["a".into(), "b".into()]],
        BoundingBox::new(10.0, 75.0, 200.0, 90.0),
        TableKind::Grid,
    ));

    let kinds: Vec<_> = compose_elements(&page).iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["image", "table", "text"]);
}

#[test]
fn test_text_inside_table_is_not_repeated_in_elements() {
    let mut page = PageStructure::new(1, 595.0, 842.0);
    page.tables.push(Table::new(
        vec![vec!["cell".into()]],
        BoundingBox::new(0.0, 90.0, 500.0, 120.0),
        TableKind::Grid,
    ));
    page.text_blocks.push(block_at("cell", 100.0));
    page.text_blocks.push(block_at("outside", 300.0));

    let elements = compose_elements(&page);
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind(), "table");
    assert_eq!(elements[1].kind(), "text");
    // Text blocks themselves stay intact.
    assert_eq!(page.text_blocks.len(), 2);
}

#[test]
fn test_heading_body_and_ruled_table() {
    let data = heading_body_table_pdf();
    let doc = extract_bytes(&data).unwrap();

    assert_eq!(doc.total_pages, 1);
    assert!(doc.stats.tables_detected >= 1);
    assert!(doc.stats.errors.is_empty());

    let page = &doc.pages[0];
    assert_eq!(page.width, 595.0);
    assert_eq!(page.height, 842.0);
    let table = &page.tables[0];
    assert_eq!(table.num_rows, 2);
    assert_eq!(table.num_cols, 2);
    assert_eq!(table.rows[0], vec!["A1", "B1"]);
    assert_eq!(table.rows[1], vec!["A2", "B2"]);

    let text = page.plain_text();
    assert!(text.contains("# Title"));
    assert!(text.contains("A short body paragraph."));

    // Title line comes first in reading order.
    assert_eq!(page.elements.first().map(|e| e.kind()), Some("text"));
    assert!(page.elements.iter().any(|e| e.kind() == "table"));

    let result = Repdf::new().extract_bytes(&data).unwrap();
    let rich = result.to_rich_text();
    let inserts: Vec<_> = rich.ops.iter().filter_map(|op| op.insert.as_text()).collect();
    assert!(inserts.contains(&"A1 | B1"));
    assert!(inserts.contains(&"A2 | B2"));

    let canvas = result.to_canvas();
    let overlay = canvas
        .objects
        .iter()
        .position(|o| matches!(o, CanvasObject::Rect(r) if r.stroke == "#2d3748" && r.shadow.is_none()))
        .expect("table overlay rect");
    let title = canvas
        .objects
        .iter()
        .position(|o| matches!(o, CanvasObject::Text(t) if t.text.contains("Title")))
        .expect("title text");
    let body = canvas
        .objects
        .iter()
        .position(|o| matches!(o, CanvasObject::Text(t) if t.text.contains("body paragraph")))
        .expect("body text");
    assert!(overlay < title);
    assert!(overlay < body);
}

#[test]
fn test_heading_is_bold() {
    let doc = extract_bytes(&heading_body_table_pdf()).unwrap();
    let heading = doc.pages[0]
        .text_blocks
        .iter()
        .flat_map(|b| b.spans())
        .find(|s| s.text.contains("Title"))
        .expect("heading span");
    assert!(heading.bold);
    assert!(!heading.italic);
    assert!((heading.size - 20.0).abs() < 0.5);
}

#[test]
fn test_metadata_is_read() {
    let doc = extract_bytes(&heading_body_table_pdf()).unwrap();
    assert_eq!(doc.meta("title"), Some("Fixture"));
    assert_eq!(doc.meta("author"), Some("repdf tests"));
    assert!(doc.meta("format").unwrap_or_default().starts_with("PDF"));
}

#[test]
fn test_encrypted_input_is_an_extraction_error() {
    let err = extract_bytes(&build_encrypted_pdf()).unwrap_err();
    assert!(err.is_extraction_failure(), "unexpected error: {err}");
}

#[test]
fn test_truncated_input_is_an_extraction_error() {
    let data = heading_body_table_pdf();
    let truncated = &data[..data.len() / 3];
    let err = extract_bytes(truncated).unwrap_err();
    assert!(err.is_extraction_failure(), "unexpected error: {err}");
}

#[test]
fn test_failed_text_step_keeps_images() {
    let page = FixturePage::new()
        .image(2, 2, rgb_2x2(), 100.0, 600.0, 50.0, 50.0)
        .with_broken_contents();
    let doc = extract_bytes(&build_pdf(vec![page])).unwrap();

    assert_eq!(doc.pages.len(), 1);
    let page = &doc.pages[0];
    assert!(page.error.is_none());
    assert!(page.text_blocks.is_empty());
    assert_eq!(page.images.len(), 1);
    assert_eq!((page.images[0].width, page.images[0].height), (2, 2));
    assert!(page.images[0].data.starts_with("data:image/png;base64,"));
    assert!(doc
        .stats
        .warnings
        .iter()
        .any(|w| w == "Page 1: text extraction failed"));
}

#[test]
fn test_strict_mode_fails_on_broken_page() {
    let page = FixturePage::new().with_broken_contents();
    let data = build_pdf(vec![page]);
    let result = extract_bytes_with_options(&data, ExtractOptions::new().strict());
    assert!(result.is_err());
}

#[test]
fn test_page_selection() {
    let pages = (1..=3)
        .map(|i| FixturePage::new().text("F1", 12.0, 72.0, 770.0, &format!("Page body {}", i)))
        .collect();
    let data = build_pdf(pages);
    let options = ExtractOptions::new().with_pages(PageSelection::parse("2-3").unwrap());
    let doc = extract_bytes_with_options(&data, options).unwrap();

    assert_eq!(doc.total_pages, 3);
    let numbers: Vec<_> = doc.pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![2, 3]);
    assert!(doc.pages[0].plain_text().contains("Page body 2"));
}

#[test]
fn test_empty_ruled_box_is_not_a_table() {
    let page = FixturePage::new()
        .text("F1", 12.0, 72.0, 770.0, "Signature")
        .rect(100.0, 600.0, 200.0, 100.0)
        .line(100.0, 650.0, 300.0, 650.0)
        .line(200.0, 600.0, 200.0, 700.0);
    let doc = extract_bytes(&build_pdf(vec![page])).unwrap();

    assert!(doc.pages[0].tables.is_empty());
    assert_eq!(doc.stats.tables_detected, 0);
    assert!(doc.pages[0].plain_text().contains("Signature"));
}

#[test]
fn test_text_only_skips_tables_and_images() {
    let page = FixturePage::new()
        .text("F1", 12.0, 72.0, 770.0, "Caption")
        .image(2, 2, rgb_2x2(), 100.0, 600.0, 50.0, 50.0);
    let data = build_pdf(vec![page]);
    let doc = extract_bytes_with_options(&data, ExtractOptions::new().text_only()).unwrap();
    assert!(doc.pages[0].images.is_empty());
    assert!(doc.pages[0].tables.is_empty());
    assert!(doc.pages[0].plain_text().contains("Caption"));
}

#[test]
fn test_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.pdf");
    assert!(matches!(extract_file(&missing), Err(Error::NotFound(_))));

    let corrupt = dir.path().join("corrupt.pdf");
    std::fs::write(&corrupt, b"%PDF-1.4\nthis is not really a pdf").unwrap();
    let err = extract_file(&corrupt).unwrap_err();
    assert!(err.is_extraction_failure());
    assert!(!matches!(err, Error::NotFound(_)));

    let good = dir.path().join("good.pdf");
    std::fs::write(&good, heading_body_table_pdf()).unwrap();
    assert_eq!(extract_file(&good).unwrap().total_pages, 1);
}
