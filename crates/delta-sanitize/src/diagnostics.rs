use serde::{Deserialize, Serialize};

/// Stable, machine-readable codes for Delta validation failures.
///
/// Meant for programmatic handling; `message` stays human-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A registered format rejected an attribute value.
    InvalidAttribute,
    /// A registered embed format rejected the embed value.
    InvalidEmbed,
    /// A `block` embed whose `type` has no handler.
    UnknownBlockType,
    /// A block handler rejected the block data.
    InvalidBlock,
    /// Block embeds nested past the depth limit.
    BlockTooDeep,
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDiagnostic {
    pub code: DiagnosticCode,
    /// JSON-ish path such as `ops[3].attributes.header` or
    /// `ops[0].insert.block.nested[2].ops[0].attributes.bold`.
    pub path: String,
    /// Index of the top-level op the problem was found under.
    pub op_index: usize,
    pub message: String,
}

/// Structured validation failure.
///
/// Validation is fail-fast and reports one diagnostic, but the container
/// holds a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationError {
    pub fn single(diag: ValidationDiagnostic) -> Self {
        Self {
            diagnostics: vec![diag],
        }
    }

    pub fn first(&self) -> Option<&ValidationDiagnostic> {
        self.diagnostics.first()
    }

    /// First diagnostic as `path: message`.
    pub fn summary(&self) -> String {
        self.diagnostics
            .first()
            .map(|d| format!("{}: {}", d.path, d.message))
            .unwrap_or_else(|| "validation failed".to_string())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

impl std::error::Error for ValidationError {}
