//! Schema construction errors.
//!
//! Only registration can fail. Validation failures are never errors: they
//! surface as `false` or as removed data.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("format '{0}' is already registered")]
    DuplicateFormat(String),

    #[error("block handler '{0}' is already registered")]
    DuplicateBlockHandler(String),
}
