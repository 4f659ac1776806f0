#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

Structural block embeds (`{"block": {"type": ...}}`): the `BlockHandler`
trait, its registry, and the table handler.

Do NOT depend on this crate directly.
Use `delta-io` instead.
"#]

pub mod error;
pub mod handler;
pub mod registry;
pub mod table;

pub use error::BlockError;
pub use handler::{BlockHandler, RenderContext};
pub use registry::BlockHandlerRegistry;
pub use table::{CellData, ColAlign, TableBlockData, TableBlockHandler, TableError};
