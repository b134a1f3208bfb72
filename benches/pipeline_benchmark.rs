//! Benchmarks for the extract / convert / synthesize pipeline.
//!
//! Run with: cargo bench
//!
//! Input documents are produced by the plain-content synthesizer, so every
//! page carries headings, body paragraphs and an aligned table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use repdf::convert::EditableConverter;
use repdf::synth::{synthesize_plain, synthesize_structure, Modifications, SynthOptions};

/// Plain content long enough to fill roughly `pages` pages.
fn sample_content(pages: usize) -> String {
    let mut content = String::new();
    for section in 0..pages * 3 {
        content.push_str(&format!("# Section {}\n", section + 1));
        for line in 0..6 {
            content.push_str(&format!(
                "Paragraph {} of section {} with **some bold words** and ordinary text.\n",
                line + 1,
                section + 1
            ));
        }
        content.push_str("- first point\n- second point\n\n");
        content.push_str("Item        Quantity      Price\n");
        content.push_str("Apples      3             1.20\n");
        content.push_str("Pears       12            0.80\n\n");
    }
    content
}

fn create_test_pdf(pages: usize) -> Vec<u8> {
    synthesize_plain("Benchmark", &sample_content(pages), &SynthOptions::default())
        .unwrap_or_default()
}

/// Benchmark header sniffing.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| repdf::parser::header_version(black_box(&pdf_data)).is_ok());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| repdf::parser::header_version(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark structural extraction at various sizes.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    for page_count in [1, 5, 10] {
        let data = create_test_pdf(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| repdf::extract_bytes(black_box(&data)));
        });
    }

    group.finish();
}

/// Benchmark the editable-model converters.
fn bench_conversion(c: &mut Criterion) {
    let Ok(doc) = repdf::extract_bytes(&create_test_pdf(5)) else {
        return;
    };
    let rich_text = repdf::RichTextConverter::default();
    let canvas = repdf::CanvasConverter::default();

    let mut group = c.benchmark_group("conversion");
    group.bench_function("rich_text", |b| {
        b.iter(|| rich_text.convert(black_box(&doc)));
    });
    group.bench_function("canvas", |b| {
        b.iter(|| canvas.convert(black_box(&doc)));
    });
    group.finish();
}

/// Benchmark PDF synthesis.
fn bench_synthesis(c: &mut Criterion) {
    let content = sample_content(5);
    let options = SynthOptions::default();

    let mut group = c.benchmark_group("synthesis");
    group.bench_function("plain_5_pages", |b| {
        b.iter(|| synthesize_plain("Benchmark", black_box(&content), &options));
    });

    if let Ok(doc) = repdf::extract_bytes(&create_test_pdf(5)) {
        let mods = Modifications::new()
            .with("Apples", "Oranges")
            .with("ordinary", "plain");
        group.bench_function("structure_5_pages", |b| {
            b.iter(|| synthesize_structure("Benchmark", black_box(&doc), &mods, &options));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_extraction,
    bench_conversion,
    bench_synthesis,
);
criterion_main!(benches);
