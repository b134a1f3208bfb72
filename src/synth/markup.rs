//! Lightweight markup for plain-content synthesis.
//!
//! Recognized line forms: `#`/`##`/`###` headings, `- `/`* `/`.` bullets,
//! `1.` numbered items, `**bold**` runs, long or tabbed lines (monospace),
//! and runs of whitespace-aligned lines (tables). Blank lines are spacing.

use std::sync::OnceLock;

use regex::Regex;

use super::flow::{CellStyle, FlowLayout, ParagraphStyle, Run, TableStyle};
use super::SynthOptions;
use crate::geometry::Color;
use crate::metrics::StandardFont;

/// Inline markers stripped from every line.
const EDIT_MARKERS: [&str; 2] = ["[MODIFIÉ]", "[AJOUTÉ]"];

/// Lines longer than this are set in monospace.
const PREFORMAT_MIN_CHARS: usize = 80;

/// One laid-out unit of plain content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(String),
    Numbered(String),
    Body(Vec<Run>),
    Preformatted(String),
    Table(Vec<Vec<String>>),
    Spacer,
}

fn regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn numbered_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&RE, r"^\d+\.")
}

fn column_gap_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&RE, r"\s{2,}")
}

fn bold_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&RE, r"\*\*(.*?)\*\*")
}

/// Whether a trimmed line looks like a whitespace-aligned table row.
pub fn looks_like_table_row(line: &str) -> bool {
    if line.chars().count() < 10 {
        return false;
    }
    column_gap_re().is_some_and(|re| re.find_iter(line).count() >= 2)
}

fn strip_markers(line: &str) -> String {
    let mut out = line.to_string();
    for marker in EDIT_MARKERS {
        out = out.replace(marker, "");
    }
    out.trim().to_string()
}

/// Split `**bold**` markup into runs. Unpaired markers stay literal.
pub fn parse_runs(line: &str) -> Vec<Run> {
    let Some(re) = bold_re() else {
        return vec![Run::plain(line)];
    };
    let mut runs = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            runs.push(Run::plain(&line[last..whole.start()]));
        }
        if !inner.as_str().is_empty() {
            runs.push(Run::bold(inner.as_str()));
        }
        last = whole.end();
    }
    if last < line.len() {
        runs.push(Run::plain(&line[last..]));
    }
    runs
}

fn table_rows(lines: &[&str]) -> Vec<Vec<String>> {
    let Some(gap) = column_gap_re() else {
        return Vec::new();
    };
    let mut rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| {
            gap.split(line.trim())
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(cols, String::new());
    }
    rows
}

/// Parse plain content into blocks.
pub fn parse_markup(content: &str) -> Vec<Block> {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        if raw.is_empty() {
            blocks.push(Block::Spacer);
            i += 1;
            continue;
        }

        let line = strip_markers(raw);
        if line.is_empty() {
            i += 1;
            continue;
        }

        if looks_like_table_row(&line) {
            let run_end = lines[i..]
                .iter()
                .position(|l| !looks_like_table_row(l))
                .map_or(lines.len(), |p| i + p);
            if run_end - i >= 2 {
                let rows = table_rows(&lines[i..run_end]);
                if !rows.is_empty() {
                    blocks.push(Block::Table(rows));
                }
                i = run_end;
                continue;
            }
        }

        blocks.push(classify_line(&line, raw.contains('\t')));
        i += 1;
    }
    blocks
}

fn classify_line(line: &str, has_tab: bool) -> Block {
    if let Some(text) = line.strip_prefix("### ") {
        return Block::Heading { level: 3, text: text.trim().to_string() };
    }
    if let Some(text) = line.strip_prefix("## ") {
        return Block::Heading { level: 2, text: text.trim().to_string() };
    }
    if let Some(text) = line.strip_prefix("# ") {
        return Block::Heading { level: 1, text: text.trim().to_string() };
    }
    if line.starts_with("- ") || line.starts_with("* ") || line.starts_with('.') {
        let text: String = line.chars().skip(2).collect();
        return Block::Bullet(text.trim().to_string());
    }
    if numbered_re().is_some_and(|re| re.is_match(line)) {
        return Block::Numbered(line.to_string());
    }
    if line.contains("**") {
        return Block::Body(parse_runs(line));
    }
    if line.chars().count() > PREFORMAT_MIN_CHARS || has_tab {
        return Block::Preformatted(line.to_string());
    }
    Block::Body(vec![Run::plain(line)])
}

pub(crate) const TEAL: Color = Color(0x11998e);
pub(crate) const BLUE: Color = Color(0x2193b0);

/// Style of the document title line.
pub(crate) fn title_style() -> ParagraphStyle {
    ParagraphStyle::new(StandardFont::HELVETICA_BOLD, 24.0)
        .with_leading(28.0)
        .with_color(TEAL)
        .centered()
        .with_spacing(0.0, 30.0)
}

fn heading_style(level: u8) -> ParagraphStyle {
    match level {
        1 => ParagraphStyle::new(StandardFont::HELVETICA_BOLD, 18.0)
            .with_leading(22.0)
            .with_color(TEAL)
            .with_spacing(12.0, 12.0),
        2 => ParagraphStyle::new(StandardFont::HELVETICA_BOLD, 14.0)
            .with_leading(18.0)
            .with_color(BLUE)
            .with_spacing(10.0, 10.0),
        _ => ParagraphStyle::new(StandardFont::HELVETICA_BOLD_OBLIQUE, 12.0)
            .with_leading(14.4)
            .with_spacing(12.0, 6.0),
    }
}

fn body_style() -> ParagraphStyle {
    ParagraphStyle::new(StandardFont::HELVETICA, 11.0)
        .with_leading(14.0)
        .with_spacing(0.0, 8.0)
}

fn bullet_style() -> ParagraphStyle {
    ParagraphStyle::new(StandardFont::HELVETICA, 11.0)
        .with_leading(14.0)
        .with_indent(20.0)
        .with_spacing(0.0, 6.0)
}

fn preformat_style() -> ParagraphStyle {
    ParagraphStyle::new(StandardFont::COURIER, 8.0)
        .with_leading(9.6)
        .with_indent(10.0)
        .with_spacing(0.0, 2.0)
}

fn plain_table_style(cols: usize, width: f32) -> TableStyle {
    TableStyle {
        col_widths: vec![width / cols as f32; cols],
        header: Some(
            CellStyle::new(StandardFont::HELVETICA_BOLD, 9.0)
                .with_color(Color(0xf5f5f5))
                .with_background(BLUE),
        ),
        body: CellStyle::new(StandardFont::HELVETICA, 8.0).with_background(Color::WHITE),
        grid: Some((Color(0x808080), 0.5)),
        border: Some((BLUE, 1.0)),
        padding: 4.0,
    }
}

/// Height of a blank-line spacer (0.1in).
pub(crate) const SPACER: f32 = 7.2;

/// Lay out parsed blocks. Element failures are logged and skipped.
pub fn render_blocks(flow: &mut FlowLayout, blocks: &[Block], options: &SynthOptions) {
    for block in blocks {
        let result = match block {
            Block::Spacer => {
                flow.spacer(SPACER);
                Ok(())
            }
            Block::Heading { level, text } => flow.text(text, &heading_style(*level)),
            Block::Bullet(text) => flow.text(&format!("• {}", text), &bullet_style()),
            Block::Numbered(text) => flow.text(text, &bullet_style()),
            Block::Body(runs) => flow.paragraph(runs, &body_style()),
            Block::Preformatted(text) => flow.text(text, &preformat_style()),
            Block::Table(rows) => {
                let cols = rows.first().map_or(0, Vec::len);
                flow.spacer(SPACER);
                let result = flow.table(rows, &plain_table_style(cols, options.plain_table_width));
                flow.spacer(SPACER);
                result
            }
        };
        if let Err(e) = result {
            log::warn!("Skipping unrenderable block: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_lists() {
        let blocks = parse_markup("# Title\n## Sub\n### Minor\n- one\n* two\n.three\n12. twelve");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, text: "Title".into() },
                Block::Heading { level: 2, text: "Sub".into() },
                Block::Heading { level: 3, text: "Minor".into() },
                Block::Bullet("one".into()),
                Block::Bullet("two".into()),
                Block::Bullet("hree".into()),
                Block::Numbered("12. twelve".into()),
            ]
        );
    }

    #[test]
    fn test_bold_runs() {
        assert_eq!(
            parse_runs("Total **42** items"),
            vec![Run::plain("Total "), Run::bold("42"), Run::plain(" items")]
        );
        assert_eq!(parse_runs("a ** b"), vec![Run::plain("a ** b")]);
    }

    #[test]
    fn test_markers_removed_and_blank_lines() {
        let blocks = parse_markup("[MODIFIÉ] Price updated\n\n[AJOUTÉ]");
        assert_eq!(
            blocks,
            vec![
                Block::Body(vec![Run::plain("Price updated")]),
                Block::Spacer,
            ]
        );
    }

    #[test]
    fn test_tabular_run_becomes_table() {
        let content = "Name      Qty      Price\nApples    3        1.20\nPears     10  2.50 extra\nafter";
        let blocks = parse_markup(content);
        assert_eq!(blocks.len(), 2);
        let Block::Table(rows) = &blocks[0] else {
            panic!("expected table, got {:?}", blocks[0]);
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Name", "Qty", "Price"]);
        assert_eq!(rows[2], vec!["Pears", "10", "2.50 extra"]);
    }

    #[test]
    fn test_single_tabular_line_is_body() {
        let blocks = parse_markup("Name      Qty      Price");
        assert_eq!(blocks, vec![Block::Body(vec![Run::plain("Name      Qty      Price")])]);
    }

    #[test]
    fn test_long_line_is_preformatted() {
        let long = "x".repeat(81);
        assert_eq!(parse_markup(&long), vec![Block::Preformatted(long.clone())]);
    }
}
