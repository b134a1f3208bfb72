//! Re-synthesis scenarios, checked by extracting the produced PDFs.

mod common;

use common::{build_pdf, heading_body_table_pdf, FixturePage};
use repdf::convert::EditableConverter;
use repdf::model::{Attributes, RichTextOp, TextObject};
use repdf::synth::{
    synthesize_canvas, synthesize_document, synthesize_plain, synthesize_rich_text,
    synthesize_structure, Modifications, SynthOptions,
};
use repdf::{
    extract_bytes, CanvasConverter, CanvasModel, CanvasObject, DocumentStructure, Repdf,
    RichTextConverter, RichTextModel,
};

const LINES: [&str; 3] = ["Alpha beta gamma", "Second line here", "Closing words"];

fn source_pdf() -> Vec<u8> {
    let mut page = FixturePage::new();
    for (i, line) in LINES.iter().enumerate() {
        page = page.text("F1", 11.0, 72.0, 770.0 - 20.0 * i as f32, line);
    }
    build_pdf(vec![page])
}

fn page_lines(doc: &DocumentStructure, index: usize) -> Vec<String> {
    doc.pages[index]
        .plain_text()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_empty_modifications_preserve_text() {
    let source = extract_bytes(&source_pdf()).unwrap();
    let pdf = synthesize_structure("Title", &source, &Modifications::new(), &SynthOptions::default())
        .unwrap();
    let output = extract_bytes(&pdf).unwrap();

    assert_eq!(output.total_pages, 1);
    let lines = page_lines(&output, 0);
    assert_eq!(lines[0], "Title");
    assert_eq!(lines[1..].join("\n"), source.pages[0].plain_text());
}

#[test]
fn test_modifications_are_applied() {
    let source = extract_bytes(&source_pdf()).unwrap();
    let mods = Modifications::new()
        .with("beta", "BETA")
        .with("Closing", "Final");
    let pdf = synthesize_structure("Title", &source, &mods, &SynthOptions::default()).unwrap();
    let text = extract_bytes(&pdf).unwrap().plain_text();

    assert!(text.contains("Alpha BETA gamma"));
    assert!(text.contains("Final words"));
    assert!(!text.contains("Closing"));
}

#[test]
fn test_table_pages_are_rebuilt_as_tables() {
    let source = extract_bytes(&heading_body_table_pdf()).unwrap();
    let mods = Modifications::new().with("B2", "Z9");
    let pdf = Repdf::new()
        .extract_bytes(&heading_body_table_pdf())
        .unwrap()
        .resynthesize("Rebuilt", &mods)
        .unwrap();
    let output = extract_bytes(&pdf).unwrap();

    assert_eq!(output.total_pages as usize, source.pages.len());
    let text = output.plain_text();
    assert!(text.contains("Rebuilt"));
    assert!(text.contains("A1"));
    assert!(text.contains("Z9"));
    assert!(!text.contains("B2"));
}

#[test]
fn test_each_source_page_starts_a_new_page() {
    let pages = (1..=3)
        .map(|i| FixturePage::new().text("F1", 11.0, 72.0, 770.0, &format!("Body of page {}", i)))
        .collect();
    let source = extract_bytes(&build_pdf(pages)).unwrap();
    let pdf = synthesize_structure("Three", &source, &Modifications::new(), &SynthOptions::default())
        .unwrap();
    let output = extract_bytes(&pdf).unwrap();

    assert_eq!(output.total_pages, 3);
    assert_eq!(page_lines(&output, 1), vec!["Body of page 2"]);
    assert_eq!(page_lines(&output, 2), vec!["Body of page 3"]);
}

#[test]
fn test_plain_content_markup() {
    let content = "# Overview\nIntro with **bold** words\n- first item\n1. numbered item\n\nName      Qty      Price\nApples    3        1.20\nPears     12       0.80";
    let pdf = synthesize_plain("Report", content, &SynthOptions::default()).unwrap();
    let doc = extract_bytes(&pdf).unwrap();

    assert_eq!(doc.total_pages, 1);
    let text = doc.plain_text();
    assert!(text.starts_with("Report"));
    assert!(text.contains("Overview"));
    assert!(!text.contains("# Overview"));
    assert!(text.contains("first item"));
    assert!(text.contains("1. numbered item"));
    assert!(!text.contains("**"));
    assert!(text.contains("Apples"));

    let bold = doc.pages[0]
        .text_blocks
        .iter()
        .flat_map(|b| b.spans())
        .find(|s| s.text.contains("bold"))
        .expect("bold run");
    assert!(bold.bold);
}

#[test]
fn test_mixed_style_line_survives_both_editable_models() {
    let pdf = synthesize_plain("T", "Total **42** items", &SynthOptions::default()).unwrap();
    let doc = extract_bytes(&pdf).unwrap();
    assert!(doc.plain_text().contains("Total 42 items"));

    let rich = RichTextConverter::default().convert(&doc);
    assert!(rich.plain_text().contains("Total 42 items"));

    let canvas = CanvasConverter::default().convert(&doc);
    assert!(canvas.texts().any(|t| t.text == "Total 42 items"));
}

#[test]
fn test_document_mode_has_date_line() {
    let pdf = synthesize_document("Memo", "Body text", &SynthOptions::default()).unwrap();
    let text = extract_bytes(&pdf).unwrap().plain_text();
    assert!(text.contains("Document mis à jour - Généré le"));
    assert!(text.contains("Body text"));
}

#[test]
fn test_empty_input_still_yields_a_page() {
    let pdf = synthesize_plain("", "", &SynthOptions::default()).unwrap();
    assert_eq!(extract_bytes(&pdf).unwrap().total_pages, 1);

    let pdf = synthesize_rich_text(&RichTextModel::new(), &SynthOptions::default()).unwrap();
    assert_eq!(extract_bytes(&pdf).unwrap().total_pages, 1);

    let empty = CanvasModel {
        version: "5.3.0".to_string(),
        objects: Vec::new(),
        background: "#e2e8f0".to_string(),
        canvas_height: 1200.0,
        canvas_width: 900.0,
    };
    let pdf = synthesize_canvas(&empty, &SynthOptions::default()).unwrap();
    assert_eq!(extract_bytes(&pdf).unwrap().total_pages, 1);
}

#[test]
fn test_rich_text_round_trip() {
    let mut model = RichTextModel::new();
    model.push(RichTextOp::styled(
        "Heading line\n",
        Attributes::default().bold().with_size("18px").with_color("#336699"),
    ));
    model.push(RichTextOp::text("plain line\n"));
    model.push(RichTextOp::image("data:image/png;base64,not-an-image", Attributes::default()));

    let pdf = synthesize_rich_text(&model, &SynthOptions::default()).unwrap();
    let doc = extract_bytes(&pdf).unwrap();
    assert_eq!(page_lines(&doc, 0), vec!["Heading line", "plain line"]);

    let heading = doc.pages[0].text_blocks[0].lines[0].spans[0].clone();
    assert!(heading.bold);
    assert!((heading.size - 18.0).abs() < 0.5);
    assert_eq!(heading.color.to_hex(), "#336699");
}

#[test]
fn test_canvas_round_trip_keeps_pages_and_positions() {
    let pages = vec![
        FixturePage::new().text("F1", 12.0, 100.0, 700.0, "On the first page"),
        FixturePage::new().text("F3", 12.0, 200.0, 500.0, "On the second page"),
    ];
    let source = extract_bytes(&build_pdf(pages)).unwrap();
    let canvas = CanvasConverter::default().convert(&source);

    let pdf = synthesize_canvas(&canvas, &SynthOptions::default()).unwrap();
    let output = extract_bytes(&pdf).unwrap();

    assert_eq!(output.total_pages, 2);
    assert_eq!(output.pages[0].width, 595.0);
    assert_eq!(page_lines(&output, 0), vec!["On the first page"]);
    assert_eq!(page_lines(&output, 1), vec!["On the second page"]);

    let span = &output.pages[1].text_blocks[0].lines[0].spans[0];
    assert!((span.bbox.x0 - 200.0).abs() < 1.0);
    assert!(span.font.starts_with("Times"));
}

#[test]
fn test_canvas_chrome_can_be_kept() {
    let mut canvas = CanvasConverter::default().convert(&extract_bytes(&source_pdf()).unwrap());
    canvas.objects.push(CanvasObject::Text(TextObject {
        text: "Added note".to_string(),
        left: 150.0,
        top: 900.0,
        font_size: 18.0,
        font_family: "Courier New".to_string(),
        font_weight: "bold".to_string(),
        fill: "rgb(200, 0, 0)".to_string(),
        selectable: true,
        ..Default::default()
    }));

    let skipped = synthesize_canvas(&canvas, &SynthOptions::default()).unwrap();
    let text = extract_bytes(&skipped).unwrap().plain_text();
    assert!(text.contains("Added note"));
    assert!(!text.lines().any(|l| l.trim() == "1"));

    let kept = synthesize_canvas(&canvas, &SynthOptions::default().with_skip_chrome(false)).unwrap();
    let text = extract_bytes(&kept).unwrap().plain_text();
    assert!(text.lines().any(|l| l.trim() == "1"));
}
