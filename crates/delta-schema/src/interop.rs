//! Boundary shapes handed in by the HTML and Markdown converters.
//!
//! The converters own tree walking; formats only ever see one flattened
//! element or node at a time.

use std::collections::BTreeMap;

/// One HTML element as seen by `Format::match_element`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lowercase tag name.
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Concatenated text content.
    pub text: String,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

/// One Markdown AST node as seen by `Format::from_markdown`.
///
/// `kind` follows mdast naming (`image`, `thematicBreak`, `inlineMath`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownNode {
    pub kind: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub value: Option<String>,
}

impl MarkdownNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}
