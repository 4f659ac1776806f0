use serde_json::Value;

use crate::format::{Format, Scope};

const MAX_URL_LEN: usize = 2048;

/// Schemes a link may use. Scheme-less (relative) URLs are also accepted.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Whether `url` is safe to place in an `href`/`src`.
///
/// Rejects control characters (browsers strip them, which lets
/// `java\tscript:` through), overlong values, and schemes outside `schemes`.
pub fn is_safe_url(url: &str, schemes: &[&str]) -> bool {
    let url = url.trim();
    if url.is_empty() || url.len() > MAX_URL_LEN {
        return false;
    }
    if url.chars().any(|c| c.is_control()) {
        return false;
    }
    match scheme_of(url) {
        Some(scheme) => schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)),
        None => true,
    }
}

/// The scheme, if the URL has one. A `:` after the first `/`, `?` or `#`
/// belongs to the path or query, not to a scheme.
fn scheme_of(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if url.as_bytes()[end] != b':' {
        return None;
    }
    Some(&url[..end])
}

#[derive(Debug, Clone)]
pub struct LinkFormat;

impl Format for LinkFormat {
    fn name(&self) -> &str {
        "link"
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
        value.as_str().is_some_and(|url| is_safe_url(url, LINK_SCHEMES))
    }
}
