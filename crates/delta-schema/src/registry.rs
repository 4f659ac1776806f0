//! Format registry
//!
//! Owns the registered formats and applies them to whole attribute maps.
//! Registration is add-only and keeps insertion order; the registry is built
//! once during setup and only read afterwards.

use std::borrow::Cow;
use std::collections::HashMap;

use delta_core::AttributeMap;
use tracing::trace;

use crate::error::SchemaError;
use crate::format::{Format, Scope};

/// Registry of attribute and embed formats.
///
/// # Examples
///
/// ```ignore
/// let mut registry = FormatRegistry::new();
/// registry.register(BooleanFormat::inline("bold"))?;
///
/// let clean = registry.sanitize(op.attributes(), true);
/// ```
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
    by_name: HashMap<String, usize>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in format.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for format in crate::formats::defaults() {
            // Built-in names are distinct.
            let _ = registry.register_boxed(format);
        }
        registry
    }

    /// Register a format. Fails if its name is already taken.
    pub fn register<F: Format + 'static>(&mut self, format: F) -> Result<&mut Self, SchemaError> {
        self.register_boxed(Box::new(format))
    }

    pub fn register_boxed(&mut self, format: Box<dyn Format>) -> Result<&mut Self, SchemaError> {
        let name = format.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(SchemaError::DuplicateFormat(name));
        }
        trace!(format = %name, scope = ?format.scope(), "registering format");
        self.by_name.insert(name, self.formats.len());
        self.formats.push(format);
        Ok(self)
    }

    /// Register several formats in order, stopping at the first duplicate.
    ///
    /// Formats before the duplicate stay registered.
    pub fn register_all(
        &mut self,
        formats: impl IntoIterator<Item = Box<dyn Format>>,
    ) -> Result<&mut Self, SchemaError> {
        for format in formats {
            self.register_boxed(format)?;
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Format> {
        self.by_name.get(name).map(|&i| self.formats[i].as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Formats of one scope, in registration order.
    pub fn get_by_scope(&self, scope: Scope) -> Vec<&dyn Format> {
        self.formats
            .iter()
            .filter(|f| f.scope() == scope)
            .map(|f| f.as_ref())
            .collect()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Replace every value whose format normalizes it.
    ///
    /// Unknown keys and formats without normalization pass through. When no
    /// value actually changes the input map itself is returned (`Cow::Borrowed`),
    /// so callers can detect "no change" without comparing contents.
    pub fn normalize<'a>(&self, attrs: Option<&'a AttributeMap>) -> Option<Cow<'a, AttributeMap>> {
        let attrs = attrs?;
        let mut changed: Option<AttributeMap> = None;

        for (key, value) in attrs {
            let Some(normalized) = self.get(key).and_then(|f| f.normalize(value)) else {
                continue;
            };
            if normalized != *value {
                changed
                    .get_or_insert_with(|| attrs.clone())
                    .insert(key.clone(), normalized);
            }
        }

        Some(match changed {
            Some(map) => Cow::Owned(map),
            None => Cow::Borrowed(attrs),
        })
    }

    /// `true` unless some registered format rejects its value.
    ///
    /// Open world: unknown keys, and formats without a rule, never fail.
    pub fn validate(&self, attrs: Option<&AttributeMap>) -> bool {
        let Some(attrs) = attrs else {
            return true;
        };
        attrs
            .iter()
            .all(|(key, value)| self.get(key).is_none_or(|f| f.validate(value)))
    }

    /// Name of the first attribute a registered format rejects.
    pub fn first_invalid<'a>(&self, attrs: &'a AttributeMap) -> Option<&'a str> {
        attrs
            .iter()
            .find(|(key, value)| self.get(key).is_some_and(|f| !f.validate(value)))
            .map(|(key, _)| key.as_str())
    }

    /// Keep only acceptable attributes, normalized.
    ///
    /// Per key:
    /// - no format registered: dropped when `remove_unknown`, kept otherwise
    /// - format rejects the raw value: dropped (normalization never rescues a value)
    /// - otherwise kept, normalized when the format normalizes
    ///
    /// Returns `None` when nothing survives; an empty map is never returned.
    /// Returns the input map itself (`Cow::Borrowed`) when every key survives unchanged.
    pub fn sanitize<'a>(
        &self,
        attrs: Option<&'a AttributeMap>,
        remove_unknown: bool,
    ) -> Option<Cow<'a, AttributeMap>> {
        let attrs = attrs?;
        let mut out = AttributeMap::new();
        let mut changed = false;

        for (key, value) in attrs {
            match self.get(key) {
                None if remove_unknown => changed = true,
                None => {
                    out.insert(key.clone(), value.clone());
                }
                Some(format) if !format.validate(value) => changed = true,
                Some(format) => match format.normalize(value) {
                    Some(normalized) if normalized != *value => {
                        changed = true;
                        out.insert(key.clone(), normalized);
                    }
                    _ => {
                        out.insert(key.clone(), value.clone());
                    }
                },
            }
        }

        if out.is_empty() {
            None
        } else if changed {
            Some(Cow::Owned(out))
        } else {
            Some(Cow::Borrowed(attrs))
        }
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}
