use thiserror::Error;

use crate::table::TableError;

/// Why block data was rejected or could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    /// The data does not have the shape the handler expects.
    #[error("invalid block data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Table(#[from] TableError),

    /// `set_nested_deltas` received a different number of sequences than the
    /// block has nested documents.
    #[error("expected {expected} nested deltas, got {actual}")]
    NestedCountMismatch { expected: usize, actual: usize },

    #[error("block type '{0}' has no nested deltas")]
    NoNestedDeltas(String),
}
