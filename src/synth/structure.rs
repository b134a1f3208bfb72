//! Structure-preserving re-synthesis of an extracted document.

use super::flow::{CellStyle, FlowLayout, ParagraphStyle, TableStyle};
use super::markup::{self, SPACER};
use super::modifications::Modifications;
use super::SynthOptions;
use crate::geometry::Color;
use crate::metrics::StandardFont;
use crate::model::{DocumentStructure, PageStructure};

/// Lines of page text kept above the tables of a table page.
const TABLE_PAGE_HEADER_LINES: usize = 2;

/// Smallest share of the table width a column receives.
const MIN_COLUMN_SHARE: f32 = 0.1;

/// Column widths proportional to each column's longest cell.
///
/// The column count comes from the first row. Every column gets at least
/// [`MIN_COLUMN_SHARE`] of `width`, so the total may exceed it.
pub fn column_widths(rows: &[Vec<String>], width: f32) -> Vec<f32> {
    let cols = rows.first().map_or(0, Vec::len);
    let mut max_lengths = vec![0usize; cols];
    for row in rows {
        for (i, cell) in row.iter().take(cols).enumerate() {
            max_lengths[i] = max_lengths[i].max(cell.chars().count());
        }
    }
    let total = max_lengths.iter().sum::<usize>().max(1) as f32;
    max_lengths
        .iter()
        .map(|&len| width * (len as f32 / total).max(MIN_COLUMN_SHARE))
        .collect()
}

fn table_style(col_widths: Vec<f32>) -> TableStyle {
    TableStyle {
        col_widths,
        header: None,
        body: CellStyle::new(StandardFont::HELVETICA, 7.0).with_background(Color::WHITE),
        grid: Some((Color::BLACK, 0.5)),
        border: Some((Color::BLACK, 1.0)),
        padding: 3.0,
    }
}

fn header_style() -> ParagraphStyle {
    ParagraphStyle::new(StandardFont::HELVETICA, 10.0).with_leading(12.0)
}

/// Lay out the pages of `doc` after applying `modifications`.
pub(crate) fn render_pages(
    flow: &mut FlowLayout,
    doc: &DocumentStructure,
    modifications: &Modifications,
    options: &SynthOptions,
) -> crate::error::Result<()> {
    for (index, page) in doc.pages.iter().enumerate() {
        if index > 0 {
            flow.page_break()?;
        }
        log::debug!(
            "Re-synthesizing page {} ({} tables)",
            page.page_number,
            page.tables.len()
        );
        render_page(flow, page, modifications, options);
    }
    Ok(())
}

fn render_page(
    flow: &mut FlowLayout,
    page: &PageStructure,
    modifications: &Modifications,
    options: &SynthOptions,
) {
    let text = modifications.apply(&page.plain_text());

    if page.tables.is_empty() {
        if !text.trim().is_empty() {
            markup::render_blocks(flow, &markup::parse_markup(&text), options);
        }
        return;
    }

    let header: Vec<&str> = text.split('\n').take(TABLE_PAGE_HEADER_LINES).collect();
    let header = header.join(" ");
    if !header.trim().is_empty() {
        match flow.text(&header, &header_style()) {
            Ok(()) => flow.spacer(SPACER),
            Err(e) => log::warn!("Skipping page {} header: {}", page.page_number, e),
        }
    }

    for table in &page.tables {
        let rows = modifications.apply_to_rows(&table.rows);
        if rows.first().map_or(true, Vec::is_empty) {
            continue;
        }
        let style = table_style(column_widths(&rows, options.structure_table_width));
        flow.spacer(2.0 * SPACER);
        if let Err(e) = flow.table(&rows, &style) {
            log::warn!("Skipping table on page {}: {}", page.page_number, e);
        }
        flow.spacer(2.0 * SPACER);
    }
}
