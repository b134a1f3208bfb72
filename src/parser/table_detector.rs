//! Table detection from ruled lines and from text alignment.
//!
//! Two strategies run on every page. The grid strategy reads tables off
//! the vector lines a page draws; the aligned strategy infers columns
//! from where text starts. Aligned tables that mostly overlap a grid
//! table are dropped as duplicates.

use crate::geometry::BoundingBox;
use crate::model::{Table, TableKind, TextSpan};

use super::content::Segment;
use super::layout::LayoutAnalyzer;

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Max endpoint delta (points) for a segment to count as horizontal/vertical
    pub orientation_tolerance: f32,
    /// Segments closer than this (points) form one row/column boundary
    pub line_group_tolerance: f32,
    /// Y rounding step (points) for aligned-text lines
    pub row_rounding: f32,
    /// X rounding step (points) for aligned-text columns
    pub column_rounding: f32,
    /// Minimum tokens on a line for it to count as columnar
    pub min_tokens_per_line: usize,
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Overlap ratio (of the smaller box) at which two tables are duplicates
    pub dedup_overlap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            orientation_tolerance: 2.0,
            line_group_tolerance: 5.0,
            row_rounding: 5.0,
            column_rounding: 10.0,
            min_tokens_per_line: 2,
            min_rows: 2,
            min_columns: 2,
            dedup_overlap: 0.5,
        }
    }
}

/// Detects tables on one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableDetectorConfig {
        &self.config
    }

    /// Run both strategies and merge their results.
    pub fn detect(&self, segments: &[Segment], spans: &[TextSpan]) -> Vec<Table> {
        log::debug!(
            "TableDetector: starting with {} segments, {} spans",
            segments.len(),
            spans.len()
        );

        let grid: Vec<Table> = self.detect_grid(segments, spans).into_iter().collect();
        let aligned: Vec<Table> = self.detect_aligned(spans).into_iter().collect();
        log::debug!(
            "TableDetector: {} grid, {} aligned candidates",
            grid.len(),
            aligned.len()
        );

        merge_tables(grid, aligned, self.config.dedup_overlap)
    }

    /// Strategy A: a grid from ruled horizontal and vertical lines.
    pub fn detect_grid(&self, segments: &[Segment], spans: &[TextSpan]) -> Option<Table> {
        let tol = self.config.orientation_tolerance;
        let usable = segments.iter().filter(|s| {
            [s.x0, s.y0, s.x1, s.y1].iter().all(|v| v.is_finite())
                && s.is_horizontal(tol) != s.is_vertical(tol)
        });

        let mut horizontals: Vec<&Segment> = Vec::new();
        let mut verticals: Vec<&Segment> = Vec::new();
        for seg in usable {
            if seg.is_horizontal(tol) {
                horizontals.push(seg);
            } else {
                verticals.push(seg);
            }
        }

        let row_bounds = self.group_positions(horizontals.iter().map(|s| (s.y0 + s.y1) / 2.0));
        let col_bounds = self.group_positions(verticals.iter().map(|s| (s.x0 + s.x1) / 2.0));
        log::debug!(
            "TableDetector: {} row boundaries, {} column boundaries",
            row_bounds.len(),
            col_bounds.len()
        );

        if row_bounds.len() < 2 || col_bounds.len() < 2 {
            return None;
        }

        let bbox = BoundingBox::union_all(
            horizontals
                .iter()
                .chain(verticals.iter())
                .map(|s| s.bbox())
                .collect::<Vec<_>>()
                .iter(),
        )?;

        let analyzer = LayoutAnalyzer::new();
        let mut rows = Vec::new();
        for r in row_bounds.windows(2) {
            let row: Vec<String> = col_bounds
                .windows(2)
                .map(|c| {
                    let cell = BoundingBox::new(c[0], r[0], c[1], r[1]);
                    let inside: Vec<TextSpan> = spans
                        .iter()
                        .filter(|s| {
                            let (cx, cy) = s.bbox.center();
                            cx > cell.x0 && cx < cell.x1 && cy > cell.y0 && cy < cell.y1
                        })
                        .cloned()
                        .collect();
                    analyzer
                        .group_spans_into_lines(inside)
                        .iter()
                        .map(|l| l.text())
                        .collect::<Vec<_>>()
                        .join("\n")
                        .trim()
                        .to_string()
                })
                .collect();
            if row.iter().any(|cell| !cell.is_empty()) {
                rows.push(row);
            }
        }

        if rows.is_empty() {
            log::debug!("TableDetector: ruled grid holds no text, skipped");
            return None;
        }

        let mut table = Table::new(rows, bbox, TableKind::Grid);
        table.num_rows = row_bounds.len() - 1;
        table.num_cols = col_bounds.len() - 1;
        log::debug!(
            "TableDetector: grid table {}x{} with {} non-empty rows",
            table.num_rows,
            table.num_cols,
            table.rows.len()
        );
        Some(table)
    }

    /// Sort, deduplicate and group coordinates; each group is represented
    /// by its first coordinate.
    fn group_positions(&self, positions: impl Iterator<Item = f32>) -> Vec<f32> {
        let mut values: Vec<f32> = positions.filter(|v| v.is_finite()).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup_by(|a, b| (*a - *b).abs() < f32::EPSILON);

        let mut bounds: Vec<f32> = Vec::new();
        let mut last_in_group: Option<f32> = None;
        for v in values {
            match last_in_group {
                Some(last) if (v - last).abs() < self.config.line_group_tolerance => {}
                _ => bounds.push(v),
            }
            last_in_group = Some(v);
        }
        bounds
    }

    /// Strategy B: columns inferred from text start positions.
    pub fn detect_aligned(&self, spans: &[TextSpan]) -> Option<Table> {
        let row_step = self.config.row_rounding;
        let col_step = self.config.column_rounding;

        let mut tokens: Vec<&TextSpan> = spans
            .iter()
            .filter(|s| !s.text.trim().is_empty() && s.bbox.is_finite())
            .collect();
        tokens.sort_by(|a, b| {
            let ka = ((a.bbox.y0 / row_step).round() * row_step, a.bbox.x0);
            let kb = ((b.bbox.y0 / row_step).round() * row_step, b.bbox.x0);
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut lines: Vec<Vec<&TextSpan>> = Vec::new();
        for token in tokens {
            match lines.last_mut() {
                Some(line) if (token.bbox.y0 - line[0].bbox.y0).abs() < row_step => {
                    line.push(token)
                }
                _ => lines.push(vec![token]),
            }
        }
        lines.retain(|line| line.len() >= self.config.min_tokens_per_line);
        log::debug!("TableDetector: {} columnar lines", lines.len());

        if lines.len() < self.config.min_rows {
            return None;
        }

        let round_x = |x: f32| (x / col_step).round() * col_step;
        let mut columns: Vec<f32> = lines
            .iter()
            .flat_map(|line| line.iter().map(|t| round_x(t.bbox.x0)))
            .collect();
        columns.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        columns.dedup();
        log::debug!("TableDetector: aligned columns at {:?}", columns);

        if columns.len() < self.config.min_columns {
            return None;
        }

        let mut rows = Vec::with_capacity(lines.len());
        for line in &lines {
            let mut row = vec![String::new(); columns.len()];
            for token in line {
                let col = nearest_index(&columns, token.bbox.x0);
                let text = token.text.trim();
                if row[col].is_empty() {
                    row[col] = text.to_string();
                } else {
                    row[col].push(' ');
                    row[col].push_str(text);
                }
            }
            rows.push(row);
        }

        if rows.len() < self.config.min_rows {
            return None;
        }

        let bbox = BoundingBox::union_all(lines.iter().flat_map(|l| l.iter().map(|t| &t.bbox)))?;
        Some(Table::new(rows, bbox, TableKind::Aligned))
    }
}

fn nearest_index(columns: &[f32], x: f32) -> usize {
    columns
        .iter()
        .enumerate()
        .min_by(|a, b| {
            (a.1 - x)
                .abs()
                .partial_cmp(&(b.1 - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Keep every primary table; add a secondary table only when it does not
/// overlap any primary table by `threshold` of the smaller box's area.
pub fn merge_tables(primary: Vec<Table>, secondary: Vec<Table>, threshold: f32) -> Vec<Table> {
    let mut kept = primary;
    let primary_count = kept.len();
    for candidate in secondary {
        let duplicate = kept[..primary_count]
            .iter()
            .any(|t| t.bbox.overlap_ratio(&candidate.bbox) >= threshold);
        if duplicate {
            log::debug!("TableDetector: dropping duplicate {:?} table", candidate.kind);
        } else {
            kept.push(candidate);
        }
    }
    kept
}
