use delta_io::prelude::*;
use delta_io::{canonical_json, hashing};
use proptest::prelude::*;
use serde_json::{Value, json};

fn attrs(v: Value) -> AttributeMap {
    v.as_object().cloned().expect("object")
}

#[test]
fn canonical_json_sorts_object_keys_at_every_depth() {
    let v = json!({ "b": { "z": 1, "y": [ { "d": 1, "c": 2 } ] }, "a": 0 });
    let s = canonical_json::to_canonical_json_string(&v).expect("canonical json");
    assert_eq!(s, r#"{"a":0,"b":{"y":[{"c":2,"d":1}],"z":1}}"#);
}

#[test]
fn fingerprint_is_lowercase_sha256_hex() {
    let h = hashing::delta_fingerprint(&Delta::new()).unwrap();
    // sha256("[]")
    assert_eq!(h, "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945");
}

#[test]
fn fingerprint_changes_with_content_and_order() {
    let a = Delta::new().insert("a").insert("b");
    let b = Delta::new().insert("b").insert("a");
    let c = Delta::new().insert_with("a", attrs(json!({ "bold": true }))).insert("b");
    let ha = hashing::delta_fingerprint(&a).unwrap();
    assert_ne!(ha, hashing::delta_fingerprint(&b).unwrap());
    assert_ne!(ha, hashing::delta_fingerprint(&c).unwrap());
}

#[test]
fn cache_key_names_schema_and_hash() {
    let delta = Delta::new().insert("x");
    let key = hashing::sanitized_cache_key("defaults-v1", &delta).unwrap();
    let fingerprint = hashing::delta_fingerprint(&delta).unwrap();
    assert_eq!(key, format!("delta|schema=defaults-v1|sha256:{fingerprint}"));
}

proptest! {
    #[test]
    fn fingerprint_ignores_attribute_key_order(
        keys in prop::collection::btree_set("[a-z]{1,6}", 1..6),
        text in "[a-z]{0,10}",
    ) {
        let forward: AttributeMap = keys.iter().map(|k| (k.clone(), json!(k.len()))).collect();
        let backward: AttributeMap = keys.iter().rev().map(|k| (k.clone(), json!(k.len()))).collect();

        let a = Delta::new().insert_with(text.clone(), forward);
        let b = Delta::new().insert_with(text, backward);
        prop_assert_eq!(
            hashing::delta_fingerprint(&a).unwrap(),
            hashing::delta_fingerprint(&b).unwrap()
        );
    }
}
