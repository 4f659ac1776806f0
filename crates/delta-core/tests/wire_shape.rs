use delta_core::{Delta, Embed, InsertContent, Op, clone_delta};
use serde_json::json;

#[test]
fn parses_all_three_op_kinds() {
    let delta: Delta = serde_json::from_value(json!([
        { "insert": "Hello", "attributes": { "bold": true } },
        { "insert": { "image": "https://example.com/a.png" } },
        { "retain": 3, "attributes": { "italic": true } },
        { "delete": 2 }
    ]))
    .expect("delta must parse");

    assert_eq!(delta.len(), 4);
    assert_eq!(delta.ops[0].as_text(), Some("Hello"));
    assert_eq!(
        delta.ops[1].as_embed(),
        Some(&Embed::new("image", json!("https://example.com/a.png")))
    );
    assert!(matches!(delta.ops[2], Op::Retain { retain: 3, .. }));
    assert_eq!(delta.ops[3], Op::Delete { delete: 2 });
}

#[test]
fn absent_attributes_are_not_serialized() {
    let delta = Delta::new().insert("plain").retain(1).delete(1);
    let out = serde_json::to_value(&delta).unwrap();
    assert_eq!(out, json!([{ "insert": "plain" }, { "retain": 1 }, { "delete": 1 }]));
}

#[test]
fn null_attributes_read_as_absent() {
    let delta: Delta =
        serde_json::from_value(json!([{ "insert": "x", "attributes": null }])).unwrap();
    assert_eq!(delta.ops[0].attributes(), None);
}

#[test]
fn embed_with_two_keys_is_rejected() {
    let err = serde_json::from_value::<Delta>(json!([{ "insert": { "image": "a", "video": "b" } }]));
    assert!(err.is_err());
}

#[test]
fn op_length_counts_chars_and_embeds() {
    assert_eq!(Op::text("héllo", None).len(), 5);
    assert_eq!(Op::embed("divider", json!(true), None).len(), 1);
    assert_eq!(Op::Retain { retain: 7, attributes: None }.len(), 7);
}

#[test]
fn clone_is_deep_and_independent() {
    let attrs = json!({ "bold": true }).as_object().cloned().unwrap();
    let original = Delta::new()
        .insert_with("Hello", attrs)
        .insert_embed("image", json!({ "src": "a.png" }));

    let mut copy = clone_delta(&original);
    assert_eq!(copy, original);

    if let Op::Insert { attributes: Some(attrs), .. } = &mut copy.ops[0] {
        attrs.insert("italic".to_string(), json!(true));
    }
    if let Op::Insert { insert: InsertContent::Embed(embed), .. } = &mut copy.ops[1] {
        embed.value["src"] = json!("b.png");
    }

    assert_eq!(original.ops[0].attributes().unwrap().len(), 1);
    assert_eq!(original.ops[1].as_embed().unwrap().value, json!({ "src": "a.png" }));
    assert_ne!(copy, original);
}

#[test]
fn op_must_name_exactly_one_kind() {
    for (input, needle) in [
        (json!({ "insert": "x\n", "retain": 3, "delete": 2 }), "more than one of insert, retain, delete"),
        (json!({ "retain": 1, "delete": 1 }), "more than one of retain, delete"),
        (json!({ "attributes": { "bold": true } }), "none of"),
        (json!({ "delete": 1, "attributes": { "bold": true } }), "no attributes"),
    ] {
        let err = serde_json::from_value::<Op>(input.clone()).unwrap_err();
        assert!(err.to_string().contains(needle), "{input}: {err}");
    }
}

#[test]
fn unrelated_keys_are_ignored() {
    let op: Op = serde_json::from_value(json!({ "retain": 2, "meta": "x" })).unwrap();
    assert_eq!(op, Op::Retain { retain: 2, attributes: None });
}
