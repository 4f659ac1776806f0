use serde::{Deserialize, Serialize};

/// Block embeds nested deeper than this are treated as invalid.
pub const DEFAULT_MAX_BLOCK_DEPTH: usize = 8;

/// Sanitizer configuration.
///
/// Deserializes from camelCase JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SanitizeOptions {
    /// Drop attributes that have no registered format.
    pub remove_unknown_attributes: bool,

    /// Drop whole embed ops that fail validation or the allow-list.
    ///
    /// Off by default: invalid embeds are kept unless the caller opts in.
    pub remove_invalid_embeds: bool,

    /// Embed names to keep when `remove_invalid_embeds` is set.
    /// `None` allows every name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_embeds: Option<Vec<String>>,

    /// How many block embeds may contain one another.
    pub max_block_depth: usize,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            remove_unknown_attributes: true,
            remove_invalid_embeds: false,
            allowed_embeds: None,
            max_block_depth: DEFAULT_MAX_BLOCK_DEPTH,
        }
    }
}

impl SanitizeOptions {
    /// Remove invalid embeds and keep only the given names.
    pub fn allow_only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            remove_invalid_embeds: true,
            allowed_embeds: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub(crate) fn is_allowed(&self, embed: &str) -> bool {
        self.allowed_embeds
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == embed))
    }
}
