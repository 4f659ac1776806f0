#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

Whole-document sanitization and validation of Deltas against a
`FormatRegistry` and a `BlockHandlerRegistry`.

Do NOT depend on this crate directly.
Use `delta-io` instead.
"#]

pub mod diagnostics;
pub mod options;
pub mod report;
pub mod sanitizer;

pub use delta_core::clone_delta;
pub use diagnostics::{DiagnosticCode, ValidationDiagnostic, ValidationError};
pub use options::{DEFAULT_MAX_BLOCK_DEPTH, SanitizeOptions};
pub use report::SanitizeReport;
pub use sanitizer::{BLOCK_EMBED, DeltaSanitizer, Sanitized};
