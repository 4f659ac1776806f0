use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deterministic counts describing what a sanitize pass changed.
///
/// Contains no timings, so two runs over the same input produce equal reports.
/// Op counts are top-level; drop counts include nested block content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub ops_in: usize,
    pub ops_out: usize,

    /// Kept ops that were rebuilt rather than returned as-is.
    pub ops_rewritten: usize,

    /// Dropped attribute values, by attribute name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub dropped_attributes: BTreeMap<String, usize>,

    /// Dropped embed ops, by embed name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub dropped_embeds: BTreeMap<String, usize>,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.ops_rewritten == 0 && self.ops_in == self.ops_out
    }

    pub fn dropped_attribute_total(&self) -> usize {
        self.dropped_attributes.values().sum()
    }

    pub fn dropped_embed_total(&self) -> usize {
        self.dropped_embeds.values().sum()
    }

    pub(crate) fn drop_attribute(&mut self, key: &str) {
        *self.dropped_attributes.entry(key.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn drop_embed(&mut self, name: &str) {
        *self.dropped_embeds.entry(name.to_string()).or_insert(0) += 1;
    }
}
