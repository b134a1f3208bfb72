//! Styled text: spans, lines, and blocks.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Color};

/// A run of text sharing one font, size, weight, slant, and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name as declared by the PDF (may carry a subset prefix)
    pub font: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub bbox: BoundingBox,
}

impl TextSpan {
    /// Create a span, deriving bold/italic from the font name.
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32, bbox: BoundingBox) -> Self {
        let font = font.into();
        let (bold, italic) = style_from_font_name(&font);
        Self {
            text: text.into(),
            size,
            font,
            bold,
            italic,
            color: Color::BLACK,
            bbox,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Same font, size, weight, slant, and color.
    pub fn same_style(&self, other: &TextSpan) -> bool {
        self.font == other.font
            && (self.size - other.size).abs() < 0.01
            && self.bold == other.bold
            && self.italic == other.italic
            && self.color == other.color
    }

    pub fn width(&self) -> f32 {
        self.bbox.width()
    }
}

/// Bold/italic classification from font name keywords.
pub fn style_from_font_name(font: &str) -> (bool, bool) {
    let lower = font.to_lowercase();
    let bold = lower.contains("bold")
        || lower.contains("black")
        || lower.contains("heavy")
        || lower.contains("semibold");
    let italic = lower.contains("italic") || lower.contains("oblique");
    (bold, italic)
}

/// Spans sharing a baseline, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub bbox: BoundingBox,
}

impl TextLine {
    /// Create a line from spans; spans are sorted by their left edge.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let bbox = BoundingBox::union_all(spans.iter().map(|s| &s.bbox)).unwrap_or_default();
        Self { spans, bbox }
    }

    /// Dominant font size, weighted by text length.
    pub fn font_size(&self) -> f32 {
        let total_chars: usize = self.spans.iter().map(|s| s.text.len()).sum();
        if total_chars == 0 {
            return self.spans.first().map(|s| s.size).unwrap_or(0.0);
        }
        let weighted: f32 = self
            .spans
            .iter()
            .map(|s| s.size * s.text.len() as f32)
            .sum();
        weighted / total_chars as f32
    }

    /// Combined text of all spans.
    ///
    /// Inserts a space between spans separated by a visible gap, except
    /// between characters of scripts written without word spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 && needs_space_between(&self.spans[i - 1], span) {
                result.push(' ');
            }
            result.push_str(&span.text);
        }

        result
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

/// Whether joining two horizontally adjacent spans needs a space.
///
/// True when the gap is visible, neither side already has a space, and the
/// join is not between characters of scripts written without word spaces.
pub fn needs_space_between(prev: &TextSpan, next: &TextSpan) -> bool {
    let gap = next.bbox.x0 - prev.bbox.x1;

    let char_count = next.text.chars().count();
    let avg_char_width = if char_count > 0 && next.width() > 0.0 {
        next.width() / char_count as f32
    } else {
        next.size * 0.5
    };

    let prev_last = prev.text.chars().last();
    let curr_first = next.text.chars().next();

    let spaceless = prev_last.map(is_spaceless_script_char).unwrap_or(false)
        && curr_first.map(is_spaceless_script_char).unwrap_or(false);

    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = next.text.starts_with(' ') || next.text.starts_with('\u{00A0}');

    gap > avg_char_width * 0.2 && !spaceless && !prev_ends_with_space && !curr_starts_with_space
}

/// A paragraph-like region: consecutive lines grouped by layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub bbox: BoundingBox,
}

impl TextBlock {
    pub fn from_lines(lines: Vec<TextLine>) -> Self {
        let bbox = BoundingBox::union_all(lines.iter().map(|l| &l.bbox)).unwrap_or_default();
        Self { lines, bbox }
    }

    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }
}

/// Whether a character belongs to a script that doesn't use word spaces.
///
/// Chinese and Japanese don't separate words with spaces; Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x0: f32, x1: f32) -> TextSpan {
        TextSpan::new(text, "Helvetica", 12.0, BoundingBox::new(x0, 100.0, x1, 112.0))
    }

    #[test]
    fn test_style_from_font_name() {
        assert_eq!(style_from_font_name("Helvetica-Bold"), (true, false));
        assert_eq!(style_from_font_name("Helvetica-Oblique"), (false, true));
        assert_eq!(style_from_font_name("ABCDEF+Arial-BoldItalicMT"), (true, true));
        assert_eq!(style_from_font_name("Times-Roman"), (false, false));
    }

    #[test]
    fn test_line_sorts_and_unions() {
        let line = TextLine::from_spans(vec![span("world", 60.0, 90.0), span("Hello", 10.0, 40.0)]);
        assert_eq!(line.spans[0].text, "Hello");
        assert_eq!(line.bbox, BoundingBox::new(10.0, 100.0, 90.0, 112.0));
        assert_eq!(line.text(), "Hello world");
    }

    #[test]
    fn test_line_text_no_space_for_adjacent_spans() {
        let line = TextLine::from_spans(vec![span("Hel", 10.0, 28.0), span("lo", 28.0, 40.0)]);
        assert_eq!(line.text(), "Hello");
    }

    #[test]
    fn test_line_text_cjk() {
        let line = TextLine::from_spans(vec![span("中文", 10.0, 34.0), span("字符", 40.0, 64.0)]);
        assert_eq!(line.text(), "中文字符");
    }

    #[test]
    fn test_block_text_and_bbox() {
        let l1 = TextLine::from_spans(vec![span("One", 10.0, 40.0)]);
        let mut l2 = TextLine::from_spans(vec![span("Two", 10.0, 40.0)]);
        l2.bbox = BoundingBox::new(10.0, 115.0, 45.0, 127.0);
        let block = TextBlock::from_lines(vec![l1, l2]);
        assert_eq!(block.text(), "One\nTwo");
        assert_eq!(block.bbox, BoundingBox::new(10.0, 100.0, 45.0, 127.0));
    }

    #[test]
    fn test_span_serialization_keys() {
        let s = span("x", 0.0, 5.0);
        let v = serde_json::to_value(&s).unwrap();
        let obj = v.as_object().unwrap();
        for key in ["text", "size", "font", "bold", "italic", "color", "bbox"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["color"], "#000000");
    }
}
