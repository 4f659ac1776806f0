//! Block handler trait definition

use delta_core::Op;
use delta_schema::HtmlElement;
use serde_json::Value;

use crate::error::BlockError;

/// Callbacks a converter lends to a handler while rendering.
///
/// `render_delta` renders a nested op sequence in the target syntax (HTML or
/// Markdown), so handlers never need to know how inline runs are written.
pub struct RenderContext<'a> {
    render_delta: &'a dyn Fn(&[Op]) -> String,
}

impl<'a> RenderContext<'a> {
    pub fn new(render_delta: &'a dyn Fn(&[Op]) -> String) -> Self {
        Self { render_delta }
    }

    pub fn render_delta(&self, ops: &[Op]) -> String {
        (self.render_delta)(ops)
    }
}

/// Schema entry for a structural embed whose data may contain nested documents.
///
/// Data arrives as raw JSON from untrusted documents: `check` must reject any
/// unexpected shape with an error, never panic.
pub trait BlockHandler: Send + Sync {
    /// Key matched against the block data's `type` field.
    fn block_type(&self) -> &str;

    /// Structural check, with the reason on failure.
    fn check(&self, data: &Value) -> Result<(), BlockError>;

    fn validate(&self, data: &Value) -> bool {
        self.check(data).is_ok()
    }

    /// Nested op sequences in a stable order, or `None` if the block has none
    /// (or the data cannot be read).
    fn nested_deltas(&self, _data: &Value) -> Option<Vec<Vec<Op>>> {
        None
    }

    /// New block data with the nested sequences replaced positionally, in the
    /// order `nested_deltas` produced them. Never mutates `data`.
    fn set_nested_deltas(&self, _data: &Value, _deltas: Vec<Vec<Op>>) -> Result<Value, BlockError> {
        Err(BlockError::NoNestedDeltas(self.block_type().to_string()))
    }

    fn to_html(&self, _data: &Value, _ctx: &RenderContext<'_>) -> Option<String> {
        None
    }

    fn from_html(&self, _element: &HtmlElement) -> Option<Value> {
        None
    }

    /// Markdown for the block, or `None` to ask the caller to fall back to HTML.
    fn to_markdown(&self, _data: &Value, _ctx: &RenderContext<'_>) -> Option<String> {
        None
    }
}
