//! Standard-14 font metrics.
//!
//! Widths are in 1/1000 em, taken from the Adobe core font metrics for the
//! printable ASCII range. Characters outside that range are measured by
//! their NFD base character, falling back to an average width.

use unicode_normalization::UnicodeNormalization;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const COURIER_WIDTH: u16 = 600;

/// Font families available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

/// One of the standard-14 text fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StandardFont {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl Default for StandardFont {
    fn default() -> Self {
        Self::HELVETICA
    }
}

impl StandardFont {
    pub const HELVETICA: StandardFont = StandardFont::new(FontFamily::Helvetica, false, false);
    pub const HELVETICA_BOLD: StandardFont = StandardFont::new(FontFamily::Helvetica, true, false);
    pub const HELVETICA_BOLD_OBLIQUE: StandardFont =
        StandardFont::new(FontFamily::Helvetica, true, true);
    pub const COURIER: StandardFont = StandardFont::new(FontFamily::Courier, false, false);

    pub const fn new(family: FontFamily, bold: bool, italic: bool) -> Self {
        Self {
            family,
            bold,
            italic,
        }
    }

    /// Best-effort mapping of an arbitrary PDF font name onto a standard font.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let family = if lower.contains("courier") || lower.contains("mono") {
            FontFamily::Courier
        } else if lower.contains("times") || (lower.contains("serif") && !lower.contains("sans")) {
            FontFamily::Times
        } else {
            FontFamily::Helvetica
        };
        let bold = ["bold", "black", "heavy", "semibold"]
            .iter()
            .any(|k| lower.contains(k));
        let italic = lower.contains("italic") || lower.contains("oblique");
        Self::new(family, bold, italic)
    }

    /// PostScript base font name, as written into a `/BaseFont` entry.
    pub fn base_name(&self) -> &'static str {
        match (self.family, self.bold, self.italic) {
            (FontFamily::Helvetica, false, false) => "Helvetica",
            (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
            (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Times, false, false) => "Times-Roman",
            (FontFamily::Times, true, false) => "Times-Bold",
            (FontFamily::Times, false, true) => "Times-Italic",
            (FontFamily::Times, true, true) => "Times-BoldItalic",
            (FontFamily::Courier, false, false) => "Courier",
            (FontFamily::Courier, true, false) => "Courier-Bold",
            (FontFamily::Courier, false, true) => "Courier-Oblique",
            (FontFamily::Courier, true, true) => "Courier-BoldOblique",
        }
    }

    /// Advance width of one character in 1/1000 em.
    pub fn char_width(&self, ch: char) -> u16 {
        if self.family == FontFamily::Courier {
            return COURIER_WIDTH;
        }
        let table = match (self.family, self.bold) {
            (FontFamily::Helvetica, false) => &HELVETICA,
            (FontFamily::Helvetica, true) => &HELVETICA_BOLD,
            _ => &TIMES_ROMAN,
        };
        let lookup = |c: char| {
            let code = c as u32;
            (32..127).contains(&code).then(|| table[(code - 32) as usize])
        };
        if let Some(w) = lookup(ch) {
            return w;
        }
        match ch {
            '\u{00a0}' => table[0],
            '•' => 350,
            '–' => 556,
            '—' => 1000,
            '’' | '‘' => 222,
            '“' | '”' => 333,
            '€' => 556,
            _ => ch
                .to_string()
                .nfd()
                .next()
                .and_then(lookup)
                .unwrap_or(table[('n' as usize) - 32]),
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Greedy word wrap.
///
/// Returns `(line_text, line_width)` pairs. Words wider than `max_width`
/// are broken between characters. Always yields at least one line.
pub fn wrap_text(
    text: &str,
    font: StandardFont,
    size: f32,
    max_width: f32,
) -> Vec<(String, f32)> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;
    let space_width = font.text_width(" ", size);

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > max_width && max_width > 0.0 {
            if !current.is_empty() {
                lines.push((std::mem::take(&mut current), current_width));
                current_width = 0.0;
            }
            for ch in word.chars() {
                let w = font.text_width(ch.encode_utf8(&mut [0; 4]), size);
                if current_width + w > max_width && !current.is_empty() {
                    lines.push((std::mem::take(&mut current), current_width));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += w;
            }
            continue;
        }

        if current.is_empty() {
            current = word.to_string();
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push((std::mem::take(&mut current), current_width));
            current = word.to_string();
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push((current, current_width));
    }
    if lines.is_empty() {
        lines.push((String::new(), 0.0));
    }
    lines
}
