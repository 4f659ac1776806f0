use std::borrow::Cow;

use delta_schema::{FormatRegistry, Scope};
use proptest::prelude::*;
use serde_json::{Value, json};

fn registry() -> FormatRegistry {
    FormatRegistry::with_defaults()
}

proptest! {
    #[test]
    fn header_normalization_always_validates(n in -1000i64..1000) {
        let registry = registry();
        let header = registry.get("header").unwrap();
        let normalized = header.normalize(&json!(n)).unwrap();
        prop_assert!(header.validate(&normalized));
        prop_assert_eq!(header.normalize(&normalized), Some(normalized.clone()));
    }

    #[test]
    fn hex_colors_normalize_to_canonical_fixed_point(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let registry = registry();
        let color = registry.get("color").unwrap();
        let upper = json!(format!("#{r:02X}{g:02X}{b:02X}"));
        prop_assert!(color.validate(&upper));

        let canonical = color.normalize(&upper).unwrap_or(upper.clone());
        prop_assert_eq!(canonical.clone(), json!(format!("#{r:02x}{g:02x}{b:02x}")));
        prop_assert_eq!(color.normalize(&canonical), None);
    }

    #[test]
    fn sanitize_output_is_a_fixed_point(
        bold in any::<bool>(),
        header in -3i64..10,
        color in prop::sample::select(vec!["red", "#ABC", "nope", "rgb(1,2,3)"]),
        junk in "[a-z]{1,6}",
    ) {
        let registry = registry();
        let mut input = json!({
            "bold": bold,
            "header": header,
            "color": color,
        })
        .as_object()
        .cloned()
        .unwrap();
        input.insert(format!("x-{junk}"), json!(1));
        let input = &input;

        let once = registry.sanitize(Some(input), true).map(Cow::into_owned);
        let twice = registry.sanitize(once.as_ref(), true);
        prop_assert!(registry.validate(once.as_ref()));
        match (once.as_ref(), twice) {
            (None, None) => {}
            (Some(a), Some(Cow::Borrowed(b))) => prop_assert!(std::ptr::eq(a, b)),
            (a, b) => prop_assert!(false, "not a fixed point: {:?} vs {:?}", a, b),
        }
    }
}

#[test]
fn default_scopes_partition_the_schema() {
    let registry = registry();
    let total = [Scope::Inline, Scope::Block, Scope::Embed]
        .iter()
        .map(|s| registry.get_by_scope(*s).len())
        .sum::<usize>();
    assert_eq!(total, registry.len());

    let embeds: Vec<&str> = registry
        .get_by_scope(Scope::Embed)
        .iter()
        .map(|f| f.name())
        .collect();
    assert_eq!(embeds, vec!["image", "video", "formula", "divider", "block"]);
}

#[test]
fn schema_only_block_format_accepts_anything() {
    let registry = registry();
    let block = registry.get("block").unwrap();
    assert!(block.validate(&Value::Null));
    assert!(block.render(&json!({}), None).is_none());
}
