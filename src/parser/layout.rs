//! Layout analysis: spans into lines, lines into blocks.

use std::collections::HashMap;

use crate::model::{TextBlock, TextLine, TextSpan};

/// Font size statistics for heading detection.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (most common)
    pub body_size: f32,
    /// All observed font sizes with frequency
    pub size_histogram: HashMap<i32, usize>,
}

impl FontStatistics {
    /// Build statistics from a page's spans, weighted by text length.
    pub fn from_spans(spans: &[TextSpan]) -> Self {
        let mut stats = Self::default();
        for span in spans {
            for _ in 0..span.text.chars().count().max(1) {
                stats.add_size(span.size);
            }
        }
        stats.analyze();
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        let key = (size * 10.0) as i32; // 0.1pt buckets
        *self.size_histogram.entry(key).or_insert(0) += 1;
    }

    /// Calculate the body size.
    pub fn analyze(&mut self) {
        self.body_size = self
            .size_histogram
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(key, _)| *key as f32 / 10.0)
            .unwrap_or(12.0);
    }

    /// Whether a size is noticeably larger than body text.
    pub fn is_heading_size(&self, font_size: f32) -> bool {
        font_size >= self.body_size + 1.5
    }
}

/// Groups a page's spans into lines and blocks.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    font_stats: FontStatistics,
}

impl LayoutAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full analysis on one page's spans.
    pub fn analyze(&mut self, spans: Vec<TextSpan>) -> Vec<TextBlock> {
        self.font_stats = FontStatistics::from_spans(&spans);
        let lines = self.group_spans_into_lines(spans);
        self.group_lines_into_blocks(lines)
    }

    /// Y-based line grouping, top to bottom.
    pub fn group_spans_into_lines(&self, spans: Vec<TextSpan>) -> Vec<TextLine> {
        let mut spans: Vec<TextSpan> = spans
            .into_iter()
            .filter(|s| !s.text.trim().is_empty() && s.bbox.is_finite())
            .collect();
        if spans.is_empty() {
            return vec![];
        }

        // Bottom edge tracks the baseline.
        spans.sort_by(|a, b| {
            let y_cmp = a
                .bbox
                .y1
                .partial_cmp(&b.bbox.y1)
                .unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut lines: Vec<TextLine> = Vec::new();
        let mut current_line_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let y_tolerance = span.size * 0.3;

            match current_y {
                Some(y) if (span.bbox.y1 - y).abs() <= y_tolerance => {
                    current_line_spans.push(span);
                }
                _ => {
                    if !current_line_spans.is_empty() {
                        lines.push(TextLine::from_spans(std::mem::take(
                            &mut current_line_spans,
                        )));
                    }
                    current_y = Some(span.bbox.y1);
                    current_line_spans.push(span);
                }
            }
        }

        if !current_line_spans.is_empty() {
            lines.push(TextLine::from_spans(current_line_spans));
        }

        lines
    }

    /// Group lines into blocks (paragraphs) based on spacing.
    pub fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        if lines.is_empty() {
            return vec![];
        }

        let avg_spacing = calculate_avg_line_spacing(&lines);
        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut current_block_lines: Vec<TextLine> = Vec::new();

        for line in lines {
            let should_break = current_block_lines
                .last()
                .map(|prev| self.should_break_block(prev, &line, avg_spacing))
                .unwrap_or(false);

            if should_break {
                blocks.push(TextBlock::from_lines(std::mem::take(
                    &mut current_block_lines,
                )));
            }

            current_block_lines.push(line);
        }

        if !current_block_lines.is_empty() {
            blocks.push(TextBlock::from_lines(current_block_lines));
        }

        blocks
    }

    /// Determine if a new block should start.
    fn should_break_block(&self, prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
        let prev_size = prev_line.font_size();
        let curr_size = curr_line.font_size();

        // Headings stand alone
        if self.font_stats.is_heading_size(curr_size) || self.font_stats.is_heading_size(prev_size) {
            return true;
        }

        // Large spacing indicates new paragraph
        let spacing = (curr_line.bbox.y1 - prev_line.bbox.y1).abs();
        if spacing > avg_spacing * 1.5 {
            return true;
        }

        // Significant font size change
        if (prev_size - curr_size).abs() > 1.0 {
            return true;
        }

        // Significant left margin change (indentation)
        if (prev_line.bbox.x0 - curr_line.bbox.x0).abs() > 20.0 {
            return true;
        }

        false
    }
}

/// Average baseline-to-baseline distance.
fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[1].bbox.y1 - w[0].bbox.y1).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}
