use delta_blocks::{BlockHandler, TableBlockHandler};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// Tile a `rows x cols` grid with random spans, greedily in row-major order.
///
/// The rectangle below and right of an uncovered position is free up to the
/// first covered cell in its row, so each span is chosen inside that bound.
fn tiled_cells(rows: usize, cols: usize, choices: &[u8]) -> Map<String, Value> {
    let mut covered = vec![false; rows * cols];
    let mut cells = Map::new();
    let mut next = choices.iter().cycle();

    for r in 0..rows {
        for c in 0..cols {
            if covered[r * cols + c] {
                continue;
            }
            let max_cs = (c..cols).take_while(|&cc| !covered[r * cols + cc]).count();
            let max_rs = rows - r;
            let cs = 1 + *next.next().unwrap_or(&0) as usize % max_cs;
            let rs = 1 + *next.next().unwrap_or(&0) as usize % max_rs;

            for rr in r..r + rs {
                for cc in c..c + cs {
                    covered[rr * cols + cc] = true;
                    cells.insert(format!("{rr}:{cc}"), Value::Null);
                }
            }
            let mut anchor = json!({ "ops": [{ "insert": format!("{r},{c}\n") }] });
            if cs > 1 {
                anchor["colspan"] = json!(cs);
            }
            if rs > 1 {
                anchor["rowspan"] = json!(rs);
            }
            cells.insert(format!("{r}:{c}"), anchor);
        }
    }
    cells
}

fn table(cells: Map<String, Value>) -> Value {
    json!({ "type": "table", "cells": cells })
}

fn tiling() -> impl Strategy<Value = (usize, usize, Map<String, Value>)> {
    (1usize..6, 1usize..6, prop::collection::vec(any::<u8>(), 1..32))
        .prop_map(|(rows, cols, choices)| (rows, cols, tiled_cells(rows, cols, &choices)))
}

proptest! {
    #[test]
    fn every_tiling_is_valid((rows, cols, cells) in tiling()) {
        let data = table(cells);
        prop_assert_eq!(TableBlockHandler.check(&data), Ok(()));

        let nested = TableBlockHandler.nested_deltas(&data).unwrap();
        let anchors = data["cells"].as_object().unwrap().values().filter(|v| !v.is_null()).count();
        prop_assert_eq!(nested.len(), anchors);
        prop_assert!(nested.len() <= rows * cols);
    }

    #[test]
    fn nulling_an_anchor_breaks_the_table((_rows, _cols, cells) in tiling(), pick in any::<prop::sample::Index>()) {
        let anchors: Vec<String> = cells
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.clone())
            .collect();
        let mut cells = cells;
        cells.insert(pick.get(&anchors).clone(), Value::Null);
        prop_assert!(!TableBlockHandler.validate(&table(cells)));
    }

    #[test]
    fn filling_a_covered_cell_breaks_the_table((_rows, _cols, cells) in tiling(), pick in any::<prop::sample::Index>()) {
        let covered: Vec<String> = cells
            .iter()
            .filter(|(_, v)| v.is_null())
            .map(|(k, _)| k.clone())
            .collect();
        prop_assume!(!covered.is_empty());
        let mut cells = cells;
        cells.insert(pick.get(&covered).clone(), json!({ "ops": [{ "insert": "x\n" }] }));
        prop_assert!(!TableBlockHandler.validate(&table(cells)));
    }

    #[test]
    fn removing_an_interior_key_leaves_a_hole((rows, cols, cells) in tiling(), pick in any::<prop::sample::Index>()) {
        prop_assume!(rows > 1 && cols > 1);
        let interior: Vec<String> = (0..rows - 1)
            .flat_map(|r| (0..cols - 1).map(move |c| format!("{r}:{c}")))
            .collect();
        let mut cells = cells;
        cells.remove(pick.get(&interior));
        prop_assert!(!TableBlockHandler.validate(&table(cells)));
    }
}
