//! Built-in formats.
//!
//! Most attributes fit one of a few generic shapes (flag, enumeration,
//! clamped integer); the rest get a dedicated type.

mod color;
mod embeds;
mod link;

pub use color::{ColorFormat, normalize_color};
pub use embeds::{DividerFormat, FormulaFormat, ImageFormat, VideoFormat};
pub use link::{LinkFormat, is_safe_url};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::format::{Format, SchemaOnly, Scope};

/// Every built-in format, in registration order.
pub fn defaults() -> Vec<Box<dyn Format>> {
    vec![
        // inline
        Box::new(BooleanFormat::inline("bold")),
        Box::new(BooleanFormat::inline("italic")),
        Box::new(BooleanFormat::inline("underline")),
        Box::new(BooleanFormat::inline("strike")),
        Box::new(BooleanFormat::inline("code")),
        Box::new(EnumFormat::new("script", Scope::Inline, &["sub", "super"])),
        Box::new(EnumFormat::new("size", Scope::Inline, &["small", "large", "huge"])),
        Box::new(LinkFormat),
        Box::new(ColorFormat::new("color")),
        Box::new(ColorFormat::new("background")),
        Box::new(DimensionFormat::new("width")),
        Box::new(DimensionFormat::new("height")),
        Box::new(TextFormat::new("alt", Scope::Inline)),
        // block
        Box::new(RangeFormat::block("header", 1, 6)),
        Box::new(EnumFormat::new(
            "list",
            Scope::Block,
            &["ordered", "bullet", "checked", "unchecked"],
        )),
        Box::new(EnumFormat::new("align", Scope::Block, &["left", "center", "right", "justify"])),
        Box::new(RangeFormat::block("indent", 1, 8)),
        Box::new(BooleanFormat::block("blockquote")),
        Box::new(CodeBlockFormat),
        // embed
        Box::new(ImageFormat),
        Box::new(VideoFormat),
        Box::new(FormulaFormat),
        Box::new(DividerFormat),
        Box::new(SchemaOnly::new("block", Scope::Embed)),
    ]
}

/// Attribute whose only legal value is `true`.
#[derive(Debug, Clone)]
pub struct BooleanFormat {
    name: &'static str,
    scope: Scope,
}

impl BooleanFormat {
    pub fn inline(name: &'static str) -> Self {
        Self {
            name,
            scope: Scope::Inline,
        }
    }

    pub fn block(name: &'static str) -> Self {
        Self {
            name,
            scope: Scope::Block,
        }
    }
}

impl Format for BooleanFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_bool() == Some(true)
    }
}

/// Attribute restricted to a fixed set of strings. Matching is exact.
#[derive(Debug, Clone)]
pub struct EnumFormat {
    name: &'static str,
    scope: Scope,
    allowed: &'static [&'static str],
}

impl EnumFormat {
    pub fn new(name: &'static str, scope: Scope, allowed: &'static [&'static str]) -> Self {
        Self {
            name,
            scope,
            allowed,
        }
    }
}

impl Format for EnumFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.allowed.contains(&s))
    }
}

/// Integer attribute within `min..=max`.
///
/// Normalization rounds and clamps any number (or numeric string) into range;
/// validation only accepts integers already in range.
#[derive(Debug, Clone)]
pub struct RangeFormat {
    name: &'static str,
    scope: Scope,
    min: i64,
    max: i64,
}

impl RangeFormat {
    pub fn block(name: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            scope: Scope::Block,
            min,
            max,
        }
    }
}

impl Format for RangeFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn normalize(&self, value: &Value) -> Option<Value> {
        let n = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !n.is_finite() {
            return None;
        }
        let clamped = (n.round() as i64).clamp(self.min, self.max);
        Some(Value::from(clamped))
    }

    fn validate(&self, value: &Value) -> bool {
        value
            .as_i64()
            .is_some_and(|n| (self.min..=self.max).contains(&n))
    }
}

/// Free-form non-empty string attribute.
#[derive(Debug, Clone)]
pub struct TextFormat {
    name: &'static str,
    scope: Scope,
}

impl TextFormat {
    pub fn new(name: &'static str, scope: Scope) -> Self {
        Self { name, scope }
    }
}

impl Format for TextFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| !s.is_empty() && s.len() <= 1024)
    }
}

static DIMENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,5}(\.[0-9]{1,3})?(px|%)?$").expect("valid dimension regex"));

/// Embed size (`width`/`height`): a non-negative number, or a string such as `"120"`, `"120px"`, `"50%"`.
#[derive(Debug, Clone)]
pub struct DimensionFormat {
    name: &'static str,
}

impl DimensionFormat {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Format for DimensionFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        Scope::Inline
    }

    fn normalize(&self, value: &Value) -> Option<Value> {
        let s = value.as_str()?;
        let trimmed = s.trim();
        (trimmed != s).then(|| Value::from(trimmed))
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f >= 0.0),
            Value::String(s) => DIMENSION.is_match(s.trim()),
            _ => false,
        }
    }
}

static LANGUAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9+#._-]{0,31}$").expect("valid language regex"));

/// `code-block`: `true`, or a language tag such as `"rust"`.
#[derive(Debug, Clone)]
pub struct CodeBlockFormat;

impl Format for CodeBlockFormat {
    fn name(&self) -> &str {
        "code-block"
    }

    fn scope(&self) -> Scope {
        Scope::Block
    }

    fn normalize(&self, value: &Value) -> Option<Value> {
        let s = value.as_str()?;
        let lower = s.trim().to_ascii_lowercase();
        (lower != s).then(|| Value::from(lower))
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::String(s) => LANGUAGE.is_match(s.trim()),
            _ => false,
        }
    }
}
