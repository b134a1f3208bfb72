//! Top-down flow layout over [`PdfWriter`].
//!
//! The cursor is measured from the top edge of the page. Paragraphs wrap
//! greedily with standard-14 metrics and break onto new pages as needed.

use super::writer::PdfWriter;
use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::metrics::StandardFont;

/// Horizontal alignment of paragraph lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Typographic settings of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub font: StandardFont,
    pub size: f32,
    pub leading: f32,
    pub color: Color,
    pub align: Align,
    pub indent: f32,
    pub space_before: f32,
    pub space_after: f32,
}

impl ParagraphStyle {
    pub fn new(font: StandardFont, size: f32) -> Self {
        Self {
            font,
            size,
            leading: size * 1.2,
            color: Color::BLACK,
            align: Align::Left,
            indent: 0.0,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn with_indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }
}

/// A piece of paragraph text, optionally bold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Look of the cells in one table region (header or body).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub font: StandardFont,
    pub size: f32,
    pub color: Color,
    pub background: Option<Color>,
}

impl CellStyle {
    pub fn new(font: StandardFont, size: f32) -> Self {
        Self {
            font,
            size,
            color: Color::BLACK,
            background: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }
}

/// Column widths and ruling of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub col_widths: Vec<f32>,
    /// Style of the first row; `None` renders it like the body.
    pub header: Option<CellStyle>,
    pub body: CellStyle,
    pub grid: Option<(Color, f32)>,
    pub border: Option<(Color, f32)>,
    pub padding: f32,
}

impl TableStyle {
    fn total_width(&self) -> f32 {
        self.col_widths.iter().sum()
    }
}

#[derive(Debug)]
struct Word {
    text: String,
    font: StandardFont,
    space_before: bool,
}

/// Flowing layout state: the writer plus a top-down cursor.
pub struct FlowLayout {
    writer: PdfWriter,
    width: f32,
    height: f32,
    margin: f32,
    cursor: f32,
}

impl FlowLayout {
    pub fn new(writer: PdfWriter, margin: f32) -> Self {
        let (width, height) = writer.page_size();
        Self {
            writer,
            width,
            height,
            margin,
            cursor: margin,
        }
    }

    /// Width between the left and right margins.
    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn bottom(&self) -> f32 {
        self.height - self.margin
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.margin
    }

    /// Start a fresh page.
    pub fn page_break(&mut self) -> Result<()> {
        self.writer.new_page()?;
        self.cursor = self.margin;
        Ok(())
    }

    fn ensure_room(&mut self, needed: f32) -> Result<()> {
        if self.cursor + needed > self.bottom() && !self.at_page_top() {
            self.page_break()?;
        }
        Ok(())
    }

    /// Vertical space; swallowed at the top of a page.
    pub fn spacer(&mut self, height: f32) {
        if !self.at_page_top() {
            self.cursor = (self.cursor + height).min(self.bottom());
        }
    }

    /// Lay out a paragraph made of styled runs.
    pub fn paragraph(&mut self, runs: &[Run], style: &ParagraphStyle) -> Result<()> {
        let words = split_words(runs, style.font);
        if words.is_empty() {
            return Ok(());
        }

        let max_width = self.frame_width() - style.indent;
        if max_width <= 0.0 {
            return Err(Error::Synthesis("paragraph indent exceeds frame".to_string()));
        }

        self.spacer(style.space_before);
        for line in break_lines(&words, style.size, max_width) {
            self.ensure_room(style.leading)?;
            let line_width = line_width(&line, style.size);
            let x = match style.align {
                Align::Left => self.margin + style.indent,
                Align::Center => self.margin + style.indent + (max_width - line_width).max(0.0) / 2.0,
            };
            let baseline = self.height - (self.cursor + style.size);
            self.draw_line(&line, x, baseline, style.size, style.color);
            self.cursor += style.leading;
        }
        self.spacer(style.space_after);
        Ok(())
    }

    /// Shorthand for a single-run paragraph.
    pub fn text(&mut self, text: &str, style: &ParagraphStyle) -> Result<()> {
        self.paragraph(&[Run::plain(text)], style)
    }

    /// Draw a line as one text operation per same-font group of words.
    fn draw_line(&mut self, line: &[&Word], x: f32, baseline: f32, size: f32, color: Color) {
        let mut x = x;
        let mut group = String::new();
        let mut group_font: Option<StandardFont> = None;
        let mut group_x = x;

        for (index, word) in line.iter().enumerate() {
            let gap = if index > 0 && word.space_before {
                word.font.text_width(" ", size)
            } else {
                0.0
            };
            if group_font != Some(word.font) {
                if let Some(font) = group_font {
                    self.writer.text(group_x, baseline, &group, font, size, color);
                }
                group.clear();
                group_font = Some(word.font);
                group_x = x + gap;
            } else if gap > 0.0 {
                group.push(' ');
            }
            x += gap;
            group.push_str(&word.text);
            x += word.font.text_width(&word.text, size);
        }
        if let Some(font) = group_font {
            self.writer.text(group_x, baseline, &group, font, size, color);
        }
    }

    /// Lay out a ruled table, centered on the page, splitting across pages
    /// between rows.
    pub fn table(&mut self, rows: &[Vec<String>], style: &TableStyle) -> Result<()> {
        let cols = style.col_widths.len();
        if cols == 0 || rows.is_empty() {
            return Err(Error::Synthesis("table without rows or columns".to_string()));
        }
        if style.col_widths.iter().any(|w| !w.is_finite() || *w <= 2.0 * style.padding) {
            return Err(Error::Synthesis("table column too narrow".to_string()));
        }

        let total = style.total_width();
        let left = ((self.width - total) / 2.0).max(0.0);
        let mut segment_top = self.cursor;

        for (row_index, row) in rows.iter().enumerate() {
            let cell_style = match (row_index, style.header) {
                (0, Some(header)) => header,
                _ => style.body,
            };
            let leading = cell_style.size * 1.2;

            let cells: Vec<Vec<String>> = (0..cols)
                .map(|c| {
                    let text = row.get(c).map(String::as_str).unwrap_or("");
                    let inner = style.col_widths[c] - 2.0 * style.padding;
                    text.split('\n')
                        .flat_map(|part| {
                            crate::metrics::wrap_text(part, cell_style.font, cell_style.size, inner)
                        })
                        .map(|(line, _)| line)
                        .collect()
                })
                .collect();
            let max_lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let row_height = max_lines as f32 * leading + 2.0 * style.padding;

            if self.cursor + row_height > self.bottom() && !self.at_page_top() {
                self.draw_border(left, segment_top, total, style);
                self.page_break()?;
                segment_top = self.cursor;
            }

            let row_top = self.cursor;
            let row_bottom_pdf = self.height - (row_top + row_height);
            let mut x = left;
            for (c, lines) in cells.iter().enumerate() {
                let col_width = style.col_widths[c];
                if let Some(background) = cell_style.background {
                    self.writer
                        .rect(x, row_bottom_pdf, col_width, row_height, Some(background), None);
                }
                for (i, line) in lines.iter().enumerate() {
                    let baseline = self.height
                        - (row_top + style.padding + cell_style.size + i as f32 * leading);
                    self.writer.text(
                        x + style.padding,
                        baseline,
                        line,
                        cell_style.font,
                        cell_style.size,
                        cell_style.color,
                    );
                }
                if let Some(grid) = style.grid {
                    self.writer
                        .rect(x, row_bottom_pdf, col_width, row_height, None, Some(grid));
                }
                x += col_width;
            }
            self.cursor += row_height;
        }

        self.draw_border(left, segment_top, total, style);
        Ok(())
    }

    fn draw_border(&mut self, left: f32, top: f32, width: f32, style: &TableStyle) {
        let height = self.cursor - top;
        if let (Some(border), true) = (style.border, height > 0.0) {
            self.writer
                .rect(left, self.height - self.cursor, width, height, None, Some(border));
        }
    }

    /// Finish the layout and serialize the PDF.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.writer.finish()
    }
}

/// Split runs into words, remembering whether whitespace preceded each one.
fn split_words(runs: &[Run], base: StandardFont) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut pending_space = false;
    let mut in_word = false;

    for run in runs {
        let font = if run.bold {
            StandardFont::new(base.family, true, base.italic)
        } else {
            base
        };
        for ch in run.text.chars() {
            if ch.is_whitespace() {
                pending_space = true;
                in_word = false;
                continue;
            }
            match words.last_mut() {
                Some(last) if in_word && last.font == font => last.text.push(ch),
                _ => {
                    words.push(Word {
                        text: ch.to_string(),
                        font,
                        space_before: pending_space,
                    });
                    pending_space = false;
                    in_word = true;
                }
            }
        }
    }
    words
}

fn line_width(line: &[&Word], size: f32) -> f32 {
    line.iter()
        .enumerate()
        .map(|(i, w)| {
            let gap = if i > 0 && w.space_before {
                w.font.text_width(" ", size)
            } else {
                0.0
            };
            gap + w.font.text_width(&w.text, size)
        })
        .sum()
}

fn break_lines(words: &[Word], size: f32, max_width: f32) -> Vec<Vec<&Word>> {
    let mut lines: Vec<Vec<&Word>> = Vec::new();
    let mut current: Vec<&Word> = Vec::new();
    let mut width = 0.0;

    for word in words {
        let word_width = word.font.text_width(&word.text, size);
        let gap = if current.is_empty() || !word.space_before {
            0.0
        } else {
            word.font.text_width(" ", size)
        };
        if !current.is_empty() && word.space_before && width + gap + word_width > max_width {
            lines.push(std::mem::take(&mut current));
            width = word_width;
        } else {
            width += gap + word_width;
        }
        current.push(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FlowLayout {
        FlowLayout::new(PdfWriter::new(595.0, 842.0), 72.0)
    }

    #[test]
    fn test_split_words_tracks_spacing() {
        let runs = vec![Run::plain("Total: "), Run::bold("42"), Run::plain(", done")];
        let words = split_words(&runs, StandardFont::HELVETICA);
        let texts: Vec<(&str, bool, bool)> = words
            .iter()
            .map(|w| (w.text.as_str(), w.font.bold, w.space_before))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("Total:", false, false),
                ("42", true, true),
                (",", false, false),
                ("done", false, true),
            ]
        );
    }

    #[test]
    fn test_break_lines_respects_width() {
        let words = split_words(&[Run::plain("aaa bbb ccc ddd")], StandardFont::COURIER);
        // Courier: 0.6 em per glyph, so each word is 18pt at 10pt size.
        let lines = break_lines(&words, 10.0, 45.0);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| line_width(l, 10.0) <= 45.0));
    }

    #[test]
    fn test_paragraphs_break_pages() {
        let mut flow = layout();
        let style = ParagraphStyle::new(StandardFont::HELVETICA, 11.0).with_leading(14.0);
        for i in 0..100 {
            flow.text(&format!("Line {}", i), &style).unwrap();
        }
        let bytes = flow.finish().unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 2);
    }

    #[test]
    fn test_table_rejects_missing_columns() {
        let mut flow = layout();
        let style = TableStyle {
            col_widths: vec![],
            header: None,
            body: CellStyle::new(StandardFont::HELVETICA, 8.0),
            grid: None,
            border: None,
            padding: 3.0,
        };
        assert!(flow.table(&[vec!["a".to_string()]], &style).is_err());
    }

    #[test]
    fn test_long_table_splits_across_pages() {
        let mut flow = layout();
        let style = TableStyle {
            col_widths: vec![200.0, 200.0],
            header: Some(CellStyle::new(StandardFont::HELVETICA_BOLD, 9.0).with_background(Color::from_packed(0x2193b0))),
            body: CellStyle::new(StandardFont::HELVETICA, 8.0),
            grid: Some((Color::from_packed(0x808080), 0.5)),
            border: Some((Color::BLACK, 1.0)),
            padding: 4.0,
        };
        let rows: Vec<Vec<String>> = (0..80)
            .map(|i| vec![format!("r{}", i), "value".to_string()])
            .collect();
        flow.table(&rows, &style).unwrap();
        let bytes = flow.finish().unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 2);
    }
}
