//! Detected tables.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// How a table was inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// From ruled vector lines
    Grid,
    /// From whitespace-aligned text columns
    Aligned,
}

/// A table of cell strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows of cell text; rows may have differing lengths
    pub rows: Vec<Vec<String>>,
    pub bbox: BoundingBox,
    /// Row count reported by the detector
    pub num_rows: usize,
    /// Column count reported by the detector
    pub num_cols: usize,
    #[serde(rename = "type")]
    pub kind: TableKind,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>, bbox: BoundingBox, kind: TableKind) -> Self {
        let num_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self {
            num_rows: rows.len(),
            num_cols,
            rows,
            bbox,
            kind,
        }
    }

    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Rows padded with empty cells (or truncated) to `cols` columns.
    pub fn normalized_rows(&self, cols: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut row: Vec<String> = row.iter().take(cols).cloned().collect();
                row.resize(cols, String::new());
                row
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows joined with `" | "`, one per line.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
