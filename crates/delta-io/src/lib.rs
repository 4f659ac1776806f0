//! `delta-io` is the single supported public entrypoint for the Delta schema
//! engine: wire types, the format and block handler registries, and the
//! sanitizer.
//!
//! This crate contains no HTML or Markdown converters. Those live in higher
//! layers and call into the hooks re-exported here. `delta-io` focuses on:
//! - stable types
//! - schema registries
//! - sanitization and validation
//! - canonical JSON and fingerprints

// -----------------------------------------------------------------------------
// Public API contract
// -----------------------------------------------------------------------------
//
// Consumers SHOULD import from `delta_io::prelude::*`.
// Anything not re-exported via the prelude is considered internal and may change
// without notice.

#[doc(hidden)]
pub mod core {
    pub use delta_core::{AttributeMap, Delta, Embed, InsertContent, Op, clone_delta};
}

#[doc(hidden)]
pub mod formats {
    pub use delta_palette::{is_named_color, named_color_hex};
    pub use delta_schema::formats::*;
    pub use delta_schema::{
        Format, FormatRegistry, HtmlElement, MarkdownNode, Matched, SchemaError, Scope,
    };
}

#[doc(hidden)]
pub mod blocks {
    pub use delta_blocks::{
        BlockError, BlockHandler, BlockHandlerRegistry, CellData, ColAlign, RenderContext,
        TableBlockData, TableBlockHandler, TableError,
    };
}

#[doc(hidden)]
pub mod sanitize {
    pub use delta_sanitize::{
        BLOCK_EMBED, DEFAULT_MAX_BLOCK_DEPTH, DeltaSanitizer, DiagnosticCode, SanitizeOptions,
        SanitizeReport, Sanitized, ValidationDiagnostic, ValidationError,
    };
}

/// Deterministic JSON canonicalization.
pub mod canonical_json;

/// Parsing Delta JSON with per-op diagnostics.
pub mod delta_json;

/// Fingerprints over canonical JSON.
pub mod hashing;

mod schema;

pub use schema::Schema;

/// Convenience prelude for consumers.
///
/// This is the **only supported** import surface for external users.
pub mod prelude {
    pub use crate::Schema;
    pub use crate::blocks::{
        BlockError, BlockHandler, BlockHandlerRegistry, RenderContext, TableBlockData,
        TableBlockHandler,
    };
    pub use crate::core::{AttributeMap, Delta, Embed, InsertContent, Op, clone_delta};
    pub use crate::delta_json::{DeltaJsonError, parse_delta_json_str};
    pub use crate::formats::{Format, FormatRegistry, Matched, SchemaError, Scope};
    pub use crate::sanitize::{
        DeltaSanitizer, DiagnosticCode, SanitizeOptions, SanitizeReport, Sanitized,
        ValidationDiagnostic, ValidationError,
    };
    pub use crate::{canonical_json, hashing};
}
