use delta_palette::named_color_hex;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::format::{Format, Scope};

static HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex regex"));

static RGB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\([ \t]*([0-9]{1,3})[ \t]*,[ \t]*([0-9]{1,3})[ \t]*,[ \t]*([0-9]{1,3})[ \t]*\)$").expect("valid rgb regex")
});

/// Color attribute (`color`, `background`).
///
/// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` and CSS color names, in any case.
/// The canonical form is lowercase `#rrggbb`.
#[derive(Debug, Clone)]
pub struct ColorFormat {
    name: &'static str,
}

impl ColorFormat {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Format for ColorFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn scope(&self) -> Scope {
        Scope::Inline
    }

    fn normalize(&self, value: &Value) -> Option<Value> {
        let s = value.as_str()?;
        let canonical = normalize_color(s)?;
        (canonical != s).then(|| Value::from(canonical))
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().and_then(normalize_color).is_some()
    }
}

/// Canonical `#rrggbb` for a color string, or `None` if it is not a color.
pub fn normalize_color(input: &str) -> Option<String> {
    let s = input.trim();

    if HEX.is_match(s) {
        let digits = s[1..].to_ascii_lowercase();
        if digits.len() == 3 {
            let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
            return Some(format!("#{expanded}"));
        }
        return Some(format!("#{digits}"));
    }

    if let Some(caps) = RGB.captures(&s.to_ascii_lowercase()) {
        let mut out = String::from("#");
        for i in 1..=3 {
            let component: u16 = caps[i].parse().ok()?;
            if component > 255 {
                return None;
            }
            out.push_str(&format!("{component:02x}"));
        }
        return Some(out);
    }

    named_color_hex(s).map(str::to_string)
}
