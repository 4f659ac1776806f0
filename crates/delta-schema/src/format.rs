//! Format trait definition
//!
//! A format is a named schema entry for one attribute or embed. Every
//! operation beyond `name` and `scope` is an optional capability: the default
//! implementations mean "not supported", and a format that overrides none of
//! them is legal (it only marks the name as known).

use delta_core::AttributeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::interop::{HtmlElement, MarkdownNode};

/// Where a format applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Text-run attribute (bold, link, ...).
    Inline,
    /// Line-level attribute carried on the trailing newline (header, list, ...).
    Block,
    /// Non-text insert content (image, video, ...).
    Embed,
}

/// Result of recognising an HTML element or Markdown node as this format.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    pub value: Value,
    pub attributes: Option<AttributeMap>,
}

impl Matched {
    pub fn value(value: Value) -> Self {
        Self {
            value,
            attributes: None,
        }
    }

    pub fn with_attributes(value: Value, attributes: AttributeMap) -> Self {
        Self {
            value,
            attributes: (!attributes.is_empty()).then_some(attributes),
        }
    }
}

/// Trait for attribute and embed formats.
///
/// # Examples
///
/// ```ignore
/// struct Highlight;
///
/// impl Format for Highlight {
///     fn name(&self) -> &str {
///         "highlight"
///     }
///
///     fn scope(&self) -> Scope {
///         Scope::Inline
///     }
///
///     fn validate(&self, value: &Value) -> bool {
///         value.as_bool() == Some(true)
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Unique key within a registry; also the attribute or embed name on the wire.
    fn name(&self) -> &str;

    fn scope(&self) -> Scope;

    /// Canonical form of `value`, or `None` when the value is already canonical
    /// or the format has no normalization.
    fn normalize(&self, _value: &Value) -> Option<Value> {
        None
    }

    /// Whether `value` is acceptable. Formats without a rule accept everything.
    ///
    /// Must never panic: values come from untrusted documents.
    fn validate(&self, _value: &Value) -> bool {
        true
    }

    /// HTML for an embed value.
    fn render(&self, _value: &Value, _attributes: Option<&AttributeMap>) -> Option<String> {
        None
    }

    /// Recognise an HTML element as this format.
    fn match_element(&self, _element: &HtmlElement) -> Option<Matched> {
        None
    }

    /// Markdown for an embed value. `None` asks the caller to fall back (usually to HTML).
    fn to_markdown(&self, _value: &Value, _attributes: Option<&AttributeMap>) -> Option<String> {
        None
    }

    /// Recognise a Markdown node as this format.
    fn from_markdown(&self, _node: &MarkdownNode) -> Option<Matched> {
        None
    }
}

/// A format with no capabilities: registering it only marks `name` as known.
#[derive(Debug, Clone)]
pub struct SchemaOnly {
    name: String,
    scope: Scope,
}

impl SchemaOnly {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }
}

impl Format for SchemaOnly {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> Scope {
        self.scope
    }
}
