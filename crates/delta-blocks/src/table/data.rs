//! Table block data and its grid consistency check.
//!
//! Cells are keyed `"row:col"`. The grid size is derived from the largest
//! indices present, and every grid position must have exactly one key: an
//! anchor cell with content, or `null` if another cell's span covers it.

use std::collections::{BTreeMap, HashMap};

use delta_core::Op;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

static CELL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").expect("valid cell key regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub ops: Vec<Op>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
    /// Fields this crate does not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CellData {
    pub fn new(ops: Vec<Op>) -> Self {
        Self {
            ops,
            colspan: None,
            rowspan: None,
            extra: Map::new(),
        }
    }

    pub fn with_span(mut self, colspan: u32, rowspan: u32) -> Self {
        self.colspan = Some(colspan);
        self.rowspan = Some(rowspan);
        self
    }

    pub fn colspan(&self) -> u32 {
        self.colspan.unwrap_or(1)
    }

    pub fn rowspan(&self) -> u32 {
        self.rowspan.unwrap_or(1)
    }

    pub fn is_merged(&self) -> bool {
        self.colspan() > 1 || self.rowspan() > 1
    }
}

/// `{"type": "table", "cells": {...}, "headerRows"?, "colWidths"?, "colAligns"?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlockData {
    #[serde(rename = "type")]
    pub kind: String,
    /// `"row:col"` → cell, or `None` (JSON `null`) for a position covered by a span.
    pub cells: BTreeMap<String, Option<CellData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_widths: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_aligns: Option<Vec<Option<ColAlign>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// First structural problem found in a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("block type is '{0}', expected 'table'")]
    NotATable(String),

    #[error("table has no cells")]
    NoCells,

    #[error("cell key '{0}' is not of the form 'row:col'")]
    BadKey(String),

    #[error("more than one key addresses cell {row}:{col}")]
    DuplicatePosition { row: usize, col: usize },

    #[error("table is not rectangular: {rows}x{cols} grid but only {present} cells present")]
    Incomplete {
        rows: usize,
        cols: usize,
        present: usize,
    },

    #[error("cell {row}:{col} has a span below 1")]
    InvalidSpan { row: usize, col: usize },

    #[error("cell {row}:{col} spans past the table edge")]
    SpanOutOfBounds { row: usize, col: usize },

    #[error("cell {row}:{col} is covered by another span but is not null")]
    CoveredCellNotNull { row: usize, col: usize },

    #[error("spans overlap at {row}:{col}")]
    Overlap { row: usize, col: usize },

    #[error("cell {row}:{col} is null but no span covers it")]
    SpuriousNull { row: usize, col: usize },

    #[error("cell {row}:{col} has no ops")]
    EmptyCell { row: usize, col: usize },

    #[error("headerRows {header_rows} exceeds row count {rows}")]
    HeaderRowsOutOfRange { header_rows: u32, rows: usize },

    #[error("colWidths has {actual} entries, expected {expected}")]
    ColWidthsLength { expected: usize, actual: usize },

    #[error("colWidths[{index}] is not a non-negative number")]
    InvalidColWidth { index: usize },

    #[error("colAligns has {actual} entries, expected {expected}")]
    ColAlignsLength { expected: usize, actual: usize },
}

/// Parse a `"row:col"` key. No whitespace, signs or other separators.
pub fn parse_cell_key(key: &str) -> Option<(usize, usize)> {
    let caps = CELL_KEY.captures(key)?;
    let row = caps[1].parse().ok()?;
    let col = caps[2].parse().ok()?;
    Some((row, col))
}

/// Cell positions resolved from keys.
struct Layout<'a> {
    rows: usize,
    cols: usize,
    positions: HashMap<(usize, usize), Option<&'a CellData>>,
}

impl TableBlockData {
    pub fn new(cells: BTreeMap<String, Option<CellData>>) -> Self {
        Self {
            kind: "table".to_string(),
            cells,
            header_rows: None,
            col_widths: None,
            col_aligns: None,
            extra: Map::new(),
        }
    }

    /// Derived grid size `(rows, cols)` over the keys that parse.
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells
            .keys()
            .filter_map(|k| parse_cell_key(k))
            .fold((0, 0), |(rows, cols), (r, c)| {
                (rows.max(r.saturating_add(1)), cols.max(c.saturating_add(1)))
            })
    }

    fn layout(&self) -> Result<Layout<'_>, TableError> {
        let mut positions = HashMap::with_capacity(self.cells.len());
        let (mut rows, mut cols) = (0usize, 0usize);

        for (key, cell) in &self.cells {
            let (r, c) = parse_cell_key(key).ok_or_else(|| TableError::BadKey(key.clone()))?;
            if positions.insert((r, c), cell.as_ref()).is_some() {
                return Err(TableError::DuplicatePosition { row: r, col: c });
            }
            rows = rows.max(r.saturating_add(1));
            cols = cols.max(c.saturating_add(1));
        }

        // Positions are unique and inside the grid, so any shortfall is a hole.
        // Checked before allocating anything of grid size.
        let incomplete = TableError::Incomplete {
            rows,
            cols,
            present: positions.len(),
        };
        match rows.checked_mul(cols) {
            Some(area) if area == positions.len() => Ok(Layout {
                rows,
                cols,
                positions,
            }),
            _ => Err(incomplete),
        }
    }

    /// Full structural check. Any failure rejects the whole table.
    pub fn check(&self) -> Result<(), TableError> {
        if self.kind != "table" {
            return Err(TableError::NotATable(self.kind.clone()));
        }
        if self.cells.is_empty() {
            return Err(TableError::NoCells);
        }

        let Layout {
            rows,
            cols,
            positions,
        } = self.layout()?;

        // Anchor covering each position, row-major.
        let mut owner: Vec<Option<(usize, usize)>> = vec![None; rows * cols];

        for r in 0..rows {
            for c in 0..cols {
                let Some(Some(cell)) = positions.get(&(r, c)) else {
                    continue;
                };
                // An anchor always precedes, row-major, every cell its span covers.
                if owner[r * cols + c].is_some() {
                    return Err(TableError::CoveredCellNotNull { row: r, col: c });
                }
                if cell.ops.is_empty() {
                    return Err(TableError::EmptyCell { row: r, col: c });
                }

                let (cs, rs) = (cell.colspan() as usize, cell.rowspan() as usize);
                if cs < 1 || rs < 1 {
                    return Err(TableError::InvalidSpan { row: r, col: c });
                }
                if r.saturating_add(rs) > rows || c.saturating_add(cs) > cols {
                    return Err(TableError::SpanOutOfBounds { row: r, col: c });
                }

                for rr in r..r + rs {
                    for cc in c..c + cs {
                        let slot = &mut owner[rr * cols + cc];
                        if slot.is_some() {
                            return Err(TableError::Overlap { row: rr, col: cc });
                        }
                        *slot = Some((r, c));
                    }
                }
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                match (positions.get(&(r, c)), owner[r * cols + c]) {
                    (Some(Some(_)), Some(anchor)) if anchor == (r, c) => {}
                    (Some(Some(_)), _) => {
                        return Err(TableError::CoveredCellNotNull { row: r, col: c });
                    }
                    (Some(None), Some(_)) => {}
                    (Some(None), None) => return Err(TableError::SpuriousNull { row: r, col: c }),
                    (None, _) => {
                        return Err(TableError::Incomplete {
                            rows,
                            cols,
                            present: positions.len(),
                        });
                    }
                }
            }
        }

        if let Some(header_rows) = self.header_rows {
            if header_rows as usize > rows {
                return Err(TableError::HeaderRowsOutOfRange { header_rows, rows });
            }
        }

        if let Some(widths) = &self.col_widths {
            if widths.len() != cols {
                return Err(TableError::ColWidthsLength {
                    expected: cols,
                    actual: widths.len(),
                });
            }
            if let Some(index) = widths.iter().position(|w| !w.is_finite() || *w < 0.0) {
                return Err(TableError::InvalidColWidth { index });
            }
        }

        if let Some(aligns) = &self.col_aligns {
            if aligns.len() != cols {
                return Err(TableError::ColAlignsLength {
                    expected: cols,
                    actual: aligns.len(),
                });
            }
        }

        Ok(())
    }

    /// Keys of non-null cells, row-major. Keys that do not parse are skipped.
    pub fn anchor_keys(&self) -> Vec<&str> {
        let mut anchors: Vec<((usize, usize), &str)> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_some())
            .filter_map(|(key, _)| parse_cell_key(key).map(|pos| (pos, key.as_str())))
            .collect();
        anchors.sort_by_key(|(pos, _)| *pos);
        anchors.into_iter().map(|(_, key)| key).collect()
    }

    /// Anchor cells with their positions, row-major.
    pub fn anchors(&self) -> Vec<((usize, usize), &CellData)> {
        self.anchor_keys()
            .into_iter()
            .filter_map(|key| {
                let pos = parse_cell_key(key)?;
                let cell = self.cells.get(key)?.as_ref()?;
                Some((pos, cell))
            })
            .collect()
    }

    pub fn has_merged_cells(&self) -> bool {
        self.cells.values().flatten().any(CellData::is_merged)
    }

    pub fn align_of(&self, col: usize) -> Option<ColAlign> {
        self.col_aligns.as_ref()?.get(col).copied().flatten()
    }
}
