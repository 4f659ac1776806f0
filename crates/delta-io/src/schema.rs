//! A format registry and a block handler registry, built together.

use delta_blocks::BlockHandlerRegistry;
use delta_core::Delta;
use delta_sanitize::{DeltaSanitizer, SanitizeOptions};
use delta_schema::FormatRegistry;

use crate::delta_json::{DeltaJsonError, parse_delta_json_str};

/// Owns both registries. Register everything first, then hand out sanitizers.
#[derive(Debug, Default)]
pub struct Schema {
    pub formats: FormatRegistry,
    pub blocks: BlockHandlerRegistry,
}

impl Schema {
    /// Empty schema: every attribute is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in formats and the table block handler.
    pub fn with_defaults() -> Self {
        Self {
            formats: FormatRegistry::with_defaults(),
            blocks: BlockHandlerRegistry::with_defaults(),
        }
    }

    pub fn sanitizer(&self) -> DeltaSanitizer<'_> {
        DeltaSanitizer::new(&self.formats, &self.blocks)
    }

    /// Parse untrusted Delta JSON and sanitize it in one step.
    pub fn sanitize_json_str(
        &self,
        s: &str,
        options: &SanitizeOptions,
    ) -> Result<Delta, DeltaJsonError> {
        let delta = parse_delta_json_str(s)?;
        Ok(self.sanitizer().sanitize(&delta, options).into_delta())
    }
}
