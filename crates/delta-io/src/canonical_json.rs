//! Deterministic JSON for hashing and cache keys.
//!
//! Documents keep attribute keys in insertion order, so two equal Deltas can
//! serialize differently. The canonical form removes that:
//! - object keys are sorted, at every depth
//! - arrays keep their order
//! - output is minified

use serde::Serialize;
use serde_json::{Map, Value};

pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let canon = canonicalize_value(serde_json::to_value(value)?);
    serde_json::to_vec(&canon)
}

pub fn to_canonical_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let canon = canonicalize_value(serde_json::to_value(value)?);
    serde_json::to_string(&canon)
}

/// Deep-sort object keys.
pub fn canonicalize_value(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize_value(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}
