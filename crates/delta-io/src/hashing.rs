//! Content fingerprints over canonical JSON.

use delta_core::Delta;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_json_bytes;

/// Lowercase hex SHA-256 of bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn sha256_canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(&to_canonical_json_bytes(value)?))
}

/// Fingerprint of a document's content.
///
/// Equal Deltas hash equally regardless of attribute key order; any change to
/// text, attributes, embeds or op order changes the hash.
pub fn delta_fingerprint(delta: &Delta) -> Result<String, serde_json::Error> {
    sha256_canonical_json(delta)
}

/// Cache key for a sanitized document: `delta|schema=<tag>|sha256:<fingerprint>`.
///
/// `schema_tag` should change whenever registered formats or options change.
pub fn sanitized_cache_key(schema_tag: &str, delta: &Delta) -> Result<String, serde_json::Error> {
    let fingerprint = delta_fingerprint(delta)?;
    Ok(format!("delta|schema={schema_tag}|sha256:{fingerprint}"))
}
