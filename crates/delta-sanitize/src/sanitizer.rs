//! Whole-Delta sanitization and validation.
//!
//! Attributes go through [`FormatRegistry::sanitize`]; embeds are checked by
//! their format, or by a block handler when the embed is structural. Ops that
//! need no change come back as `Cow::Borrowed` of the input op.

use std::borrow::Cow;

use delta_blocks::{BlockHandler, BlockHandlerRegistry};
use delta_core::{AttributeMap, Delta, Embed, InsertContent, Op};
use delta_schema::{Format, FormatRegistry};
use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{DiagnosticCode, ValidationDiagnostic, ValidationError};
use crate::options::SanitizeOptions;
use crate::report::SanitizeReport;

/// Embed name whose value carries a `type` field selecting the block handler.
pub const BLOCK_EMBED: &str = "block";

/// Output of a sanitize pass.
#[derive(Debug, Clone)]
pub struct Sanitized<'a> {
    ops: Vec<Cow<'a, Op>>,
    input_len: usize,
}

impl<'a> Sanitized<'a> {
    pub fn ops(&self) -> &[Cow<'a, Op>] {
        &self.ops
    }

    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter().map(|op| op.as_ref())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// No op was dropped or rebuilt.
    pub fn is_unchanged(&self) -> bool {
        self.ops.len() == self.input_len && self.ops.iter().all(|op| matches!(op, Cow::Borrowed(_)))
    }

    pub fn into_delta(self) -> Delta {
        Delta::from_ops(self.ops.into_iter().map(Cow::into_owned).collect())
    }
}

enum EmbedTarget<'r> {
    Block(&'r dyn BlockHandler),
    UnknownBlock,
    Format(&'r dyn Format),
    Unknown,
}

struct EmbedFault {
    code: DiagnosticCode,
    message: String,
}

impl EmbedFault {
    fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

enum EmbedOutcome {
    Keep,
    Drop,
    Replace(Value),
}

/// Walks Deltas against a pair of registries.
///
/// Holds only shared references, so one sanitizer can serve any number of
/// documents, including from several threads.
#[derive(Debug, Clone, Copy)]
pub struct DeltaSanitizer<'r> {
    formats: &'r FormatRegistry,
    blocks: &'r BlockHandlerRegistry,
}

impl<'r> DeltaSanitizer<'r> {
    pub fn new(formats: &'r FormatRegistry, blocks: &'r BlockHandlerRegistry) -> Self {
        Self { formats, blocks }
    }

    pub fn formats(&self) -> &'r FormatRegistry {
        self.formats
    }

    pub fn blocks(&self) -> &'r BlockHandlerRegistry {
        self.blocks
    }

    /// Clean a Delta.
    ///
    /// Text is never altered. Op order is kept, and ops are only removed when
    /// `remove_invalid_embeds` rejects an embed.
    pub fn sanitize<'a>(&self, delta: &'a Delta, options: &SanitizeOptions) -> Sanitized<'a> {
        self.sanitize_with_report(delta, options).0
    }

    pub fn sanitize_with_report<'a>(
        &self,
        delta: &'a Delta,
        options: &SanitizeOptions,
    ) -> (Sanitized<'a>, SanitizeReport) {
        let mut report = SanitizeReport {
            ops_in: delta.ops.len(),
            ..SanitizeReport::default()
        };
        let ops = self.sanitize_ops(&delta.ops, 0, options, &mut report);
        report.ops_out = ops.len();
        report.ops_rewritten = ops.iter().filter(|op| matches!(op, Cow::Owned(_))).count();

        let sanitized = Sanitized {
            ops,
            input_len: delta.ops.len(),
        };
        (sanitized, report)
    }

    /// Normalize every attribute in a Delta.
    ///
    /// This is a sanitize pass with default options: values a format rejects
    /// are dropped, not kept as-is, and unknown attributes are removed.
    /// Normalization never turns an invalid value into a valid one.
    pub fn normalize_delta<'a>(&self, delta: &'a Delta) -> Sanitized<'a> {
        self.sanitize(delta, &SanitizeOptions::default())
    }

    /// `true` when no registered format or block handler rejects anything.
    ///
    /// Unknown attributes and unknown embed names are accepted.
    pub fn validate_delta(&self, delta: &Delta) -> bool {
        self.validate_delta_with_diagnostics(delta).is_ok()
    }

    /// Fail-fast validation reporting where the first violation is.
    pub fn validate_delta_with_diagnostics(&self, delta: &Delta) -> Result<(), ValidationError> {
        self.validate_delta_with_options(delta, &SanitizeOptions::default())
    }

    /// Like [`Self::validate_delta_with_diagnostics`], with the block depth
    /// limit taken from `options`.
    ///
    /// Only `max_block_depth` is read. Pass the options given to
    /// [`Self::sanitize`] so a strict sanitize pass and this check agree.
    pub fn validate_delta_with_options(
        &self,
        delta: &Delta,
        options: &SanitizeOptions,
    ) -> Result<(), ValidationError> {
        self.validate_ops(&delta.ops, 0, options.max_block_depth, "", None)
            .map_err(ValidationError::single)
    }

    fn target(&self, embed: &Embed) -> EmbedTarget<'r> {
        let (formats, blocks) = (self.formats, self.blocks);
        if embed.name == BLOCK_EMBED {
            return match blocks.for_data(&embed.value) {
                Some(handler) => EmbedTarget::Block(handler),
                None => EmbedTarget::UnknownBlock,
            };
        }
        if let Some(handler) = blocks.get(&embed.name) {
            return EmbedTarget::Block(handler);
        }
        match formats.get(&embed.name) {
            Some(format) => EmbedTarget::Format(format),
            None => EmbedTarget::Unknown,
        }
    }

    /// Check one embed. A valid block embed yields its handler.
    fn check_embed(
        &self,
        embed: &Embed,
        depth: usize,
        max_depth: usize,
    ) -> Result<Option<&'r dyn BlockHandler>, EmbedFault> {
        match self.target(embed) {
            EmbedTarget::Block(handler) => {
                if depth >= max_depth {
                    return Err(EmbedFault::new(
                        DiagnosticCode::BlockTooDeep,
                        format!("blocks nested more than {max_depth} deep"),
                    ));
                }
                handler
                    .check(&embed.value)
                    .map_err(|err| EmbedFault::new(DiagnosticCode::InvalidBlock, err.to_string()))?;
                Ok(Some(handler))
            }
            EmbedTarget::UnknownBlock => {
                let message = match embed.value.get("type").and_then(Value::as_str) {
                    Some(t) => format!("no handler for block type '{t}'"),
                    None => "block has no string 'type'".to_string(),
                };
                Err(EmbedFault::new(DiagnosticCode::UnknownBlockType, message))
            }
            EmbedTarget::Format(format) => {
                if format.validate(&embed.value) {
                    Ok(None)
                } else {
                    Err(EmbedFault::new(
                        DiagnosticCode::InvalidEmbed,
                        format!("invalid value for embed '{}'", embed.name),
                    ))
                }
            }
            EmbedTarget::Unknown => Ok(None),
        }
    }

    fn sanitize_ops<'a>(
        &self,
        ops: &'a [Op],
        depth: usize,
        options: &SanitizeOptions,
        report: &mut SanitizeReport,
    ) -> Vec<Cow<'a, Op>> {
        ops.iter()
            .filter_map(|op| self.sanitize_op(op, depth, options, report))
            .collect()
    }

    fn sanitize_op<'a>(
        &self,
        op: &'a Op,
        depth: usize,
        options: &SanitizeOptions,
        report: &mut SanitizeReport,
    ) -> Option<Cow<'a, Op>> {
        let (embed, attributes) = match op {
            Op::Delete { .. } => return Some(Cow::Borrowed(op)),
            Op::Insert {
                insert: InsertContent::Embed(embed),
                attributes,
            } => (Some(embed), attributes.as_ref()),
            Op::Insert { attributes, .. } | Op::Retain { attributes, .. } => {
                (None, attributes.as_ref())
            }
        };

        let mut value = None;
        if let Some(embed) = embed {
            match self.sanitize_embed(embed, depth, options, report) {
                EmbedOutcome::Drop => return None,
                EmbedOutcome::Keep => {}
                EmbedOutcome::Replace(v) => value = Some(v),
            }
        }
        let cleaned = self.sanitize_attributes(attributes, options, report);

        if value.is_none() && cleaned.is_none() {
            return Some(Cow::Borrowed(op));
        }

        let attributes = cleaned.unwrap_or_else(|| attributes.cloned());
        let rebuilt = match (embed, value) {
            (Some(embed), Some(value)) => Op::embed(embed.name.clone(), value, attributes),
            _ => op.with_attributes(attributes),
        };
        Some(Cow::Owned(rebuilt))
    }

    /// `None` when the attributes stay as they are, otherwise their replacement.
    fn sanitize_attributes(
        &self,
        attrs: Option<&AttributeMap>,
        options: &SanitizeOptions,
        report: &mut SanitizeReport,
    ) -> Option<Option<AttributeMap>> {
        let original = attrs?;
        let cleaned = match self
            .formats
            .sanitize(Some(original), options.remove_unknown_attributes)
        {
            Some(Cow::Borrowed(_)) => return None,
            cleaned => cleaned.map(Cow::into_owned),
        };

        for key in original.keys() {
            if !cleaned.as_ref().is_some_and(|map| map.contains_key(key)) {
                debug!(attribute = %key, "dropping attribute");
                report.drop_attribute(key);
            }
        }
        Some(cleaned)
    }

    fn sanitize_embed(
        &self,
        embed: &Embed,
        depth: usize,
        options: &SanitizeOptions,
        report: &mut SanitizeReport,
    ) -> EmbedOutcome {
        let checked = self.check_embed(embed, depth, options.max_block_depth);

        if options.remove_invalid_embeds {
            let reason = if !options.is_allowed(&embed.name) {
                Some("not an allowed embed")
            } else {
                checked.as_ref().err().map(|fault| fault.message.as_str())
            };
            if let Some(reason) = reason {
                debug!(embed = %embed.name, reason, "dropping embed");
                report.drop_embed(&embed.name);
                return EmbedOutcome::Drop;
            }
        }

        let Ok(Some(handler)) = checked else {
            return EmbedOutcome::Keep;
        };
        match self.sanitize_nested(handler, &embed.value, depth, options, report) {
            None => EmbedOutcome::Keep,
            Some(value) if handler.validate(&value) => EmbedOutcome::Replace(value),
            Some(_) => {
                // Nested content was dropped until the block no longer holds together.
                debug!(embed = %embed.name, "dropping block emptied by nested sanitization");
                report.drop_embed(&embed.name);
                EmbedOutcome::Drop
            }
        }
    }

    /// Rebuilt block data when any nested sequence changed.
    fn sanitize_nested(
        &self,
        handler: &dyn BlockHandler,
        data: &Value,
        depth: usize,
        options: &SanitizeOptions,
        report: &mut SanitizeReport,
    ) -> Option<Value> {
        let nested = handler.nested_deltas(data)?;
        let mut changed = false;
        let cleaned: Vec<Vec<Op>> = nested
            .iter()
            .map(|ops| {
                let out = self.sanitize_ops(ops, depth + 1, options, report);
                if out.len() != ops.len() || out.iter().any(|op| matches!(op, Cow::Owned(_))) {
                    changed = true;
                }
                out.into_iter().map(Cow::into_owned).collect()
            })
            .collect();

        if !changed {
            return None;
        }
        match handler.set_nested_deltas(data, cleaned) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(block_type = handler.block_type(), %err, "could not rebuild block");
                None
            }
        }
    }

    fn validate_ops(
        &self,
        ops: &[Op],
        depth: usize,
        max_depth: usize,
        prefix: &str,
        top_index: Option<usize>,
    ) -> Result<(), ValidationDiagnostic> {
        for (i, op) in ops.iter().enumerate() {
            let op_index = top_index.unwrap_or(i);
            let path = format!("{prefix}ops[{i}]");

            if let Some(key) = op.attributes().and_then(|attrs| self.formats.first_invalid(attrs)) {
                return Err(ValidationDiagnostic {
                    code: DiagnosticCode::InvalidAttribute,
                    path: format!("{path}.attributes.{key}"),
                    op_index,
                    message: format!("invalid value for attribute '{key}'"),
                });
            }

            let Some(embed) = op.as_embed() else {
                continue;
            };
            let embed_path = format!("{path}.insert.{}", embed.name);
            let handler = self
                .check_embed(embed, depth, max_depth)
                .map_err(|fault| ValidationDiagnostic {
                    code: fault.code,
                    path: embed_path.clone(),
                    op_index,
                    message: fault.message,
                })?;

            if let Some(nested) = handler.and_then(|h| h.nested_deltas(&embed.value)) {
                for (n, ops) in nested.iter().enumerate() {
                    let prefix = format!("{embed_path}.nested[{n}].");
                    self.validate_ops(ops, depth + 1, max_depth, &prefix, Some(op_index))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(v: Value) -> AttributeMap {
        v.as_object().cloned().expect("object")
    }

    #[test]
    fn delete_ops_always_pass_through() {
        let formats = FormatRegistry::new();
        let blocks = BlockHandlerRegistry::new();
        let sanitizer = DeltaSanitizer::new(&formats, &blocks);
        let delta = Delta::new().delete(3);
        let out = sanitizer.sanitize(&delta, &SanitizeOptions::default());
        assert!(out.is_unchanged());
    }

    #[test]
    fn empty_attribute_map_is_removed() {
        let formats = FormatRegistry::with_defaults();
        let blocks = BlockHandlerRegistry::new();
        let sanitizer = DeltaSanitizer::new(&formats, &blocks);
        let delta = Delta::new().retain_with(4, AttributeMap::new());
        let out = sanitizer.sanitize(&delta, &SanitizeOptions::default()).into_delta();
        assert_eq!(out, Delta::new().retain(4));
    }

    #[test]
    fn unknown_attributes_kept_when_asked() {
        let formats = FormatRegistry::with_defaults();
        let blocks = BlockHandlerRegistry::new();
        let sanitizer = DeltaSanitizer::new(&formats, &blocks);
        let delta = Delta::new().insert_with("x", attrs(json!({ "bold": true, "data-id": "7" })));
        let options = SanitizeOptions {
            remove_unknown_attributes: false,
            ..SanitizeOptions::default()
        };
        assert!(sanitizer.sanitize(&delta, &options).is_unchanged());
        assert!(!sanitizer.sanitize(&delta, &SanitizeOptions::default()).is_unchanged());
    }

    #[test]
    fn unknown_block_type_is_kept_by_default_and_dropped_when_strict() {
        let formats = FormatRegistry::with_defaults();
        let blocks = BlockHandlerRegistry::with_defaults();
        let sanitizer = DeltaSanitizer::new(&formats, &blocks);
        let delta = Delta::new().insert_embed("block", json!({ "type": "chart" }));

        assert!(sanitizer.sanitize(&delta, &SanitizeOptions::default()).is_unchanged());
        let strict = SanitizeOptions {
            remove_invalid_embeds: true,
            ..SanitizeOptions::default()
        };
        assert!(sanitizer.sanitize(&delta, &strict).is_empty());

        let err = sanitizer.validate_delta_with_diagnostics(&delta).unwrap_err();
        assert_eq!(err.first().unwrap().code, DiagnosticCode::UnknownBlockType);
    }
}
