use delta_io::prelude::*;
use serde_json::json;

#[test]
fn sanitize_untrusted_json_end_to_end() {
    let schema = Schema::with_defaults();
    let input = r#"{"ops":[
        {"insert":"Title","attributes":{"bold":true,"onmouseover":"x()"}},
        {"insert":"\n","attributes":{"header":1}},
        {"insert":{"image":"https://example.com/a.png"}},
        {"insert":{"video":"javascript:alert(1)"}},
        {"insert":"link","attributes":{"link":"javascript:alert(1)","color":"Red"}},
        {"insert":"\n"}
    ]}"#;

    let options: SanitizeOptions =
        serde_json::from_value(json!({ "removeInvalidEmbeds": true })).unwrap();
    let clean = schema.sanitize_json_str(input, &options).unwrap();

    let expected = parse_delta_json_str(
        r##"[
        {"insert":"Title","attributes":{"bold":true}},
        {"insert":"\n","attributes":{"header":1}},
        {"insert":{"image":"https://example.com/a.png"}},
        {"insert":"link","attributes":{"color":"#ff0000"}},
        {"insert":"\n"}
    ]"##,
    )
    .unwrap();
    assert_eq!(clean, expected);
    assert!(schema.sanitizer().validate_delta(&clean));
}

#[test]
fn defaults_cover_the_builtin_schema() {
    let schema = Schema::with_defaults();
    for name in ["bold", "header", "color", "link", "image", "block"] {
        assert!(schema.formats.has(name), "{name}");
    }
    assert_eq!(schema.formats.get("image").map(|f| f.scope()), Some(Scope::Embed));
    assert!(schema.blocks.has("table"));
}

#[test]
fn custom_formats_extend_a_schema() {
    struct Highlight;

    impl Format for Highlight {
        fn name(&self) -> &str {
            "highlight"
        }

        fn scope(&self) -> Scope {
            Scope::Inline
        }

        fn validate(&self, value: &serde_json::Value) -> bool {
            value.as_str().is_some_and(|s| s == "yellow" || s == "green")
        }
    }

    let mut schema = Schema::with_defaults();
    schema.formats.register(Highlight).unwrap();
    assert_eq!(
        schema.formats.register(Highlight).unwrap_err(),
        SchemaError::DuplicateFormat("highlight".to_string())
    );

    let delta = parse_delta_json_str(
        r#"[{"insert":"a","attributes":{"highlight":"yellow"}},{"insert":"b","attributes":{"highlight":"pink"}}]"#,
    )
    .unwrap();
    let out = schema.sanitizer().sanitize(&delta, &SanitizeOptions::default());
    assert!(matches!(out.ops()[0], std::borrow::Cow::Borrowed(_)));
    assert_eq!(out.ops()[1].attributes(), None);
}

#[test]
fn table_blocks_through_the_prelude() {
    let schema = Schema::with_defaults();
    let data = json!({
        "type": "table",
        "headerRows": 1,
        "cells": {
            "0:0": { "ops": [{ "insert": "A\n" }] },
            "0:1": { "ops": [{ "insert": "B\n" }] },
            "1:0": { "ops": [{ "insert": "1\n" }] },
            "1:1": { "ops": [{ "insert": "2\n" }] },
        }
    });
    let handler = schema.blocks.for_data(&data).unwrap();
    assert!(handler.validate(&data));

    let render = |ops: &[Op]| ops.iter().filter_map(Op::as_text).collect::<String>();
    let ctx = RenderContext::new(&render);
    assert_eq!(
        handler.to_markdown(&data, &ctx).as_deref(),
        Some("| A | B |\n| --- | --- |\n| 1 | 2 |")
    );
}
