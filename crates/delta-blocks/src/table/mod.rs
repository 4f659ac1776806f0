//! Table block handler.
//!
//! Block data is read leniently from raw JSON: anything that does not
//! deserialize into [`TableBlockData`] is simply an invalid table.

mod data;
mod render;

pub use data::{CellData, ColAlign, TableBlockData, TableError, parse_cell_key};

use delta_core::Op;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BlockError;
use crate::handler::{BlockHandler, RenderContext};

pub const TABLE_TYPE: &str = "table";

#[derive(Debug, Clone, Copy, Default)]
pub struct TableBlockHandler;

impl TableBlockHandler {
    /// Typed view of raw block data.
    pub fn read(data: &Value) -> Result<TableBlockData, BlockError> {
        if !data.is_object() {
            return Err(BlockError::InvalidData("table data must be an object".to_string()));
        }
        TableBlockData::deserialize(data).map_err(|e| BlockError::InvalidData(e.to_string()))
    }

    /// Read and fully check raw block data.
    fn read_valid(data: &Value) -> Option<TableBlockData> {
        let table = Self::read(data).ok()?;
        table.check().ok()?;
        Some(table)
    }
}

impl BlockHandler for TableBlockHandler {
    fn block_type(&self) -> &str {
        TABLE_TYPE
    }

    fn check(&self, data: &Value) -> Result<(), BlockError> {
        Self::read(data)?.check()?;
        Ok(())
    }

    /// Ops of every non-null cell, row-major.
    fn nested_deltas(&self, data: &Value) -> Option<Vec<Vec<Op>>> {
        let table = Self::read(data).ok()?;
        Some(
            table
                .anchors()
                .into_iter()
                .map(|(_, cell)| cell.ops.clone())
                .collect(),
        )
    }

    /// Same table with each non-null cell's ops replaced, row-major.
    ///
    /// Fails fast when the number of sequences differs from the number of
    /// non-null cells; nothing is truncated or padded. Only `ops` fields are
    /// rewritten, so key order and every other field keep their input form.
    fn set_nested_deltas(&self, data: &Value, deltas: Vec<Vec<Op>>) -> Result<Value, BlockError> {
        let table = Self::read(data)?;
        let keys = table.anchor_keys();
        if keys.len() != deltas.len() {
            return Err(BlockError::NestedCountMismatch {
                expected: keys.len(),
                actual: deltas.len(),
            });
        }

        let mut out = data.clone();
        let Some(cells) = out.get_mut("cells").and_then(Value::as_object_mut) else {
            return Err(BlockError::InvalidData("table has no cells object".to_string()));
        };
        for (key, ops) in keys.into_iter().zip(deltas) {
            let ops = serde_json::to_value(ops).map_err(|e| BlockError::InvalidData(e.to_string()))?;
            if let Some(cell) = cells.get_mut(key).and_then(Value::as_object_mut) {
                cell.insert("ops".to_string(), ops);
            }
        }
        Ok(out)
    }

    fn to_html(&self, data: &Value, ctx: &RenderContext<'_>) -> Option<String> {
        let table = Self::read_valid(data)?;
        Some(render::to_html(&table, ctx))
    }

    /// GitHub-flavored pipe table, or `None` for merged tables (which have no
    /// Markdown form) and invalid data.
    fn to_markdown(&self, data: &Value, ctx: &RenderContext<'_>) -> Option<String> {
        let table = Self::read_valid(data)?;
        if table.has_merged_cells() {
            return None;
        }
        Some(render::to_markdown(&table, ctx))
    }
}
