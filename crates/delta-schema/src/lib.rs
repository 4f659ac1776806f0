#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

Attribute and embed schema for Deltas: the `Format` capability trait, the
add-only `FormatRegistry`, and the built-in formats.

Do NOT depend on this crate directly.
Use `delta-io` instead.
"#]

pub mod error;
pub mod format;
pub mod formats;
pub mod interop;
pub mod registry;

pub use error::SchemaError;
pub use format::{Format, Matched, Scope};
pub use interop::{HtmlElement, MarkdownNode};
pub use registry::FormatRegistry;
