#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

This crate is an internal implementation detail of the Delta schema engine.

Do NOT depend on this crate directly.
Use `delta-io` instead.
"#]

pub mod model;
pub mod embed;

pub use embed::Embed;
pub use model::{AttributeMap, Delta, InsertContent, Op, clone_delta};
