use delta_blocks::{BlockError, BlockHandler, RenderContext, TableBlockHandler};
use delta_core::Op;
use serde_json::{Value, json};

fn merged_table() -> Value {
    json!({
        "type": "table",
        "headerRows": 1,
        "cells": {
            "0:0": { "ops": [{ "insert": "Title\n" }], "colspan": 2 },
            "0:1": null,
            "1:0": { "ops": [{ "insert": "a\n" }] },
            "1:1": { "ops": [{ "insert": "b\n", "attributes": { "bold": true } }] },
        }
    })
}

fn plain_table() -> Value {
    json!({
        "type": "table",
        "headerRows": 1,
        "colAligns": ["left", "right"],
        "cells": {
            "0:0": { "ops": [{ "insert": "Name\n" }] },
            "0:1": { "ops": [{ "insert": "Qty\n" }] },
            "1:0": { "ops": [{ "insert": "a|b\n" }] },
            "1:1": { "ops": [{ "insert": "1\n2\n" }] },
        }
    })
}

/// Concatenated insert text, standing in for a real converter.
fn plain_text(ops: &[Op]) -> String {
    ops.iter().filter_map(Op::as_text).collect()
}

fn text_ops(text: &str) -> Vec<Op> {
    vec![Op::text(text, None)]
}

#[test]
fn nested_deltas_follow_row_major_anchor_order() {
    let nested = TableBlockHandler.nested_deltas(&merged_table()).unwrap();
    let texts: Vec<String> = nested.iter().map(|ops| plain_text(ops)).collect();
    assert_eq!(texts, vec!["Title\n", "a\n", "b\n"]);
}

#[test]
fn set_nested_deltas_replaces_in_order_without_touching_input() {
    let data = merged_table();
    let before = data.clone();
    let updated = TableBlockHandler
        .set_nested_deltas(
            &data,
            vec![text_ops("T\n"), text_ops("x\n"), text_ops("y\n")],
        )
        .unwrap();

    assert_eq!(data, before);
    assert_eq!(updated["cells"]["0:0"]["ops"], json!([{ "insert": "T\n" }]));
    assert_eq!(updated["cells"]["0:0"]["colspan"], json!(2));
    assert_eq!(updated["cells"]["0:1"], Value::Null);
    assert_eq!(updated["cells"]["1:1"]["ops"], json!([{ "insert": "y\n" }]));
    assert_eq!(updated["headerRows"], json!(1));
    assert!(TableBlockHandler.validate(&updated));
}

#[test]
fn set_nested_deltas_round_trips_nested_deltas() {
    let data = merged_table();
    let nested = TableBlockHandler.nested_deltas(&data).unwrap();
    let rebuilt = TableBlockHandler.set_nested_deltas(&data, nested).unwrap();
    assert_eq!(rebuilt, data);
}

#[test]
fn set_nested_deltas_keeps_key_order_and_explicit_nulls() {
    let mut cells = serde_json::Map::new();
    for r in 0..11 {
        cells.insert(format!("{r}:0"), json!({ "ops": [{ "insert": format!("{r}\n") }] }));
    }
    let data = json!({ "type": "table", "headerRows": null, "cells": cells });
    let input_keys: Vec<String> = data["cells"].as_object().unwrap().keys().cloned().collect();

    let nested = TableBlockHandler.nested_deltas(&data).unwrap();
    let updated = TableBlockHandler.set_nested_deltas(&data, nested).unwrap();

    let output_keys: Vec<String> = updated["cells"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(output_keys, input_keys);
    assert_eq!(updated.get("headerRows"), Some(&Value::Null));
    assert_eq!(updated["cells"]["10:0"]["ops"], json!([{ "insert": "10\n" }]));
}

#[test]
fn set_nested_deltas_rejects_count_mismatch() {
    let data = merged_table();
    assert_eq!(
        TableBlockHandler.set_nested_deltas(&data, vec![text_ops("only\n")]),
        Err(BlockError::NestedCountMismatch {
            expected: 3,
            actual: 1
        })
    );
    let too_many = vec![text_ops("1\n"); 4];
    assert_eq!(
        TableBlockHandler.set_nested_deltas(&data, too_many),
        Err(BlockError::NestedCountMismatch {
            expected: 3,
            actual: 4
        })
    );
}

#[test]
fn html_marks_header_rows_and_spans() {
    let render = |ops: &[Op]| plain_text(ops).trim_end().to_string();
    let ctx = RenderContext::new(&render);
    let html = TableBlockHandler.to_html(&merged_table(), &ctx).unwrap();
    assert_eq!(
        html,
        "<table><thead><tr><th colspan=\"2\">Title</th></tr></thead>\
         <tbody><tr><td>a</td><td>b</td></tr></tbody></table>"
    );
}

#[test]
fn html_carries_widths_and_alignment() {
    let mut data = plain_table();
    data["colWidths"] = json!([120, 60.5]);
    let render = |ops: &[Op]| plain_text(ops).trim_end().to_string();
    let ctx = RenderContext::new(&render);
    let html = TableBlockHandler.to_html(&data, &ctx).unwrap();
    assert!(html.starts_with(
        "<table><colgroup><col style=\"width: 120px\"><col style=\"width: 60.5px\"></colgroup><thead>"
    ));
    assert!(html.contains("<th style=\"text-align: right\">Qty</th>"));
    assert!(html.contains("<td style=\"text-align: left\">a|b</td>"));
}

#[test]
fn invalid_table_has_no_html() {
    let render = |ops: &[Op]| plain_text(ops);
    let ctx = RenderContext::new(&render);
    let data = json!({ "type": "table", "cells": { "0:0": null } });
    assert_eq!(TableBlockHandler.to_html(&data, &ctx), None);
}

#[test]
fn markdown_pipe_table() {
    let render = |ops: &[Op]| plain_text(ops);
    let ctx = RenderContext::new(&render);
    let md = TableBlockHandler.to_markdown(&plain_table(), &ctx).unwrap();
    assert_eq!(
        md,
        "| Name | Qty |\n| :--- | ---: |\n| a\\|b | 1<br>2 |"
    );
}

#[test]
fn markdown_without_header_rows_gets_blank_header() {
    let mut data = plain_table();
    data.as_object_mut().unwrap().remove("headerRows");
    data.as_object_mut().unwrap().remove("colAligns");
    let render = |ops: &[Op]| plain_text(ops);
    let ctx = RenderContext::new(&render);
    let md = TableBlockHandler.to_markdown(&data, &ctx).unwrap();
    let lines: Vec<&str> = md.lines().collect();
    assert_eq!(lines[0], "|  |  |");
    assert_eq!(lines[1], "| --- | --- |");
    assert_eq!(lines[2], "| Name | Qty |");
    assert_eq!(lines.len(), 4);
}

#[test]
fn merged_table_falls_back_from_markdown() {
    let render = |ops: &[Op]| plain_text(ops);
    let ctx = RenderContext::new(&render);
    assert_eq!(TableBlockHandler.to_markdown(&merged_table(), &ctx), None);
    assert!(TableBlockHandler.to_html(&merged_table(), &ctx).is_some());
}
