use delta_core::AttributeMap;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::{Value, json};

use crate::format::{Format, Matched, Scope};
use crate::formats::link::is_safe_url;
use crate::interop::{HtmlElement, MarkdownNode};

const IMAGE_SCHEMES: &[&str] = &["http", "https", "data"];
const VIDEO_SCHEMES: &[&str] = &["http", "https"];

/// Raster image types allowed inline as `data:` URLs. SVG is excluded: it can carry script.
const DATA_IMAGE_TYPES: &[&str] = &["png", "jpeg", "jpg", "gif", "webp", "bmp"];

const MAX_FORMULA_LEN: usize = 4096;

fn is_safe_image_src(src: &str) -> bool {
    let src = src.trim();
    if !is_safe_url(src, IMAGE_SCHEMES) {
        return false;
    }
    let Some(rest) = strip_prefix_ignore_case(src, "data:") else {
        return true;
    };
    let Some(rest) = strip_prefix_ignore_case(rest, "image/") else {
        return false;
    };
    let Some((mime, payload)) = rest.split_once(";base64,") else {
        return false;
    };
    DATA_IMAGE_TYPES.iter().any(|t| t.eq_ignore_ascii_case(mime)) && !payload.is_empty()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn trimmed_string(value: &Value) -> Option<Value> {
    let s = value.as_str()?;
    let trimmed = s.trim();
    (trimmed != s).then(|| Value::from(trimmed))
}

/// Scalar attribute as HTML attribute text.
fn attr_text(attributes: Option<&AttributeMap>, key: &str) -> Option<String> {
    match attributes?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}

/// `{"image": "<src>"}` with optional `alt`, `width`, `height` attributes.
#[derive(Debug, Clone)]
pub struct ImageFormat;

impl Format for ImageFormat {
    fn name(&self) -> &str {
        "image"
    }

    fn scope(&self) -> Scope {
        Scope::Embed
    }

    fn normalize(&self, value: &Value) -> Option<Value> {
        trimmed_string(value)
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().is_some_and(is_safe_image_src)
    }

    fn render(&self, value: &Value, attributes: Option<&AttributeMap>) -> Option<String> {
        let src = value.as_str()?;
        let mut out = String::from("<img");
        push_attr(&mut out, "src", src.trim());
        for key in ["alt", "width", "height"] {
            if let Some(v) = attr_text(attributes, key) {
                push_attr(&mut out, key, &v);
            }
        }
        out.push('>');
        Some(out)
    }

    fn match_element(&self, element: &HtmlElement) -> Option<Matched> {
        if element.tag != "img" {
            return None;
        }
        let src = element.attr("src")?.trim();
        if !is_safe_image_src(src) {
            return None;
        }
        let mut attributes = AttributeMap::new();
        for key in ["alt", "width", "height"] {
            if let Some(v) = element.attr(key).filter(|v| !v.is_empty()) {
                attributes.insert(key.to_string(), Value::from(v));
            }
        }
        Some(Matched::with_attributes(Value::from(src), attributes))
    }

    fn to_markdown(&self, value: &Value, attributes: Option<&AttributeMap>) -> Option<String> {
        let src = value.as_str()?.trim();
        let alt = attr_text(attributes, "alt").unwrap_or_default();
        let alt = alt.replace('[', "\\[").replace(']', "\\]");
        if src.contains([' ', '(', ')']) {
            Some(format!("![{alt}](<{src}>)"))
        } else {
            Some(format!("![{alt}]({src})"))
        }
    }

    fn from_markdown(&self, node: &MarkdownNode) -> Option<Matched> {
        if node.kind != "image" {
            return None;
        }
        let url = node.url.as_deref()?.trim();
        if !is_safe_image_src(url) {
            return None;
        }
        let mut attributes = AttributeMap::new();
        if let Some(alt) = node.alt.as_deref().filter(|a| !a.is_empty()) {
            attributes.insert("alt".to_string(), Value::from(alt));
        }
        Some(Matched::with_attributes(Value::from(url), attributes))
    }
}

/// `{"video": "<url>"}`, rendered as an iframe. Markdown has no video form.
#[derive(Debug, Clone)]
pub struct VideoFormat;

impl Format for VideoFormat {
    fn name(&self) -> &str {
        "video"
    }

    fn scope(&self) -> Scope {
        Scope::Embed
    }

    fn normalize(&self, value: &Value) -> Option<Value> {
        trimmed_string(value)
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|url| {
            // Relative URLs are not embeddable players.
            url.contains(':') && is_safe_url(url, VIDEO_SCHEMES)
        })
    }

    fn render(&self, value: &Value, attributes: Option<&AttributeMap>) -> Option<String> {
        let src = value.as_str()?;
        let mut out = String::from("<iframe class=\"ql-video\" frameborder=\"0\" allowfullscreen=\"true\"");
        push_attr(&mut out, "src", src.trim());
        for key in ["width", "height"] {
            if let Some(v) = attr_text(attributes, key) {
                push_attr(&mut out, key, &v);
            }
        }
        out.push_str("></iframe>");
        Some(out)
    }

    fn match_element(&self, element: &HtmlElement) -> Option<Matched> {
        if element.tag != "iframe" && element.tag != "video" {
            return None;
        }
        let src = element.attr("src")?.trim();
        self.validate(&Value::from(src))
            .then(|| Matched::value(Value::from(src)))
    }
}

/// `{"formula": "<tex>"}`.
#[derive(Debug, Clone)]
pub struct FormulaFormat;

impl Format for FormulaFormat {
    fn name(&self) -> &str {
        "formula"
    }

    fn scope(&self) -> Scope {
        Scope::Embed
    }

    fn validate(&self, value: &Value) -> bool {
        value
            .as_str()
            .is_some_and(|s| !s.trim().is_empty() && s.len() <= MAX_FORMULA_LEN)
    }

    fn render(&self, value: &Value, _attributes: Option<&AttributeMap>) -> Option<String> {
        let tex = value.as_str()?;
        let mut out = String::from("<span class=\"ql-formula\"");
        push_attr(&mut out, "data-value", tex);
        out.push('>');
        out.push_str(&encode_text(tex));
        out.push_str("</span>");
        Some(out)
    }

    fn match_element(&self, element: &HtmlElement) -> Option<Matched> {
        if element.tag != "span" || !element.has_class("ql-formula") {
            return None;
        }
        let tex = element.attr("data-value")?;
        self.validate(&Value::from(tex))
            .then(|| Matched::value(Value::from(tex)))
    }

    fn to_markdown(&self, value: &Value, _attributes: Option<&AttributeMap>) -> Option<String> {
        Some(format!("${}$", value.as_str()?))
    }

    fn from_markdown(&self, node: &MarkdownNode) -> Option<Matched> {
        if node.kind != "inlineMath" {
            return None;
        }
        let tex = node.value.as_deref()?;
        self.validate(&Value::from(tex))
            .then(|| Matched::value(Value::from(tex)))
    }
}

/// `{"divider": true}`: a horizontal rule.
#[derive(Debug, Clone)]
pub struct DividerFormat;

impl Format for DividerFormat {
    fn name(&self) -> &str {
        "divider"
    }

    fn scope(&self) -> Scope {
        Scope::Embed
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_bool() == Some(true)
    }

    fn render(&self, _value: &Value, _attributes: Option<&AttributeMap>) -> Option<String> {
        Some("<hr>".to_string())
    }

    fn match_element(&self, element: &HtmlElement) -> Option<Matched> {
        (element.tag == "hr").then(|| Matched::value(json!(true)))
    }

    fn to_markdown(&self, _value: &Value, _attributes: Option<&AttributeMap>) -> Option<String> {
        Some("---".to_string())
    }

    fn from_markdown(&self, node: &MarkdownNode) -> Option<Matched> {
        (node.kind == "thematicBreak").then(|| Matched::value(json!(true)))
    }
}
