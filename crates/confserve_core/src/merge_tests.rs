//! Tests for override merging.

use super::*;
use serde_json::json;

fn merged(overrides: &[(&str, serde_json::Value)]) -> (JsonMap, Vec<Duplicate>) {
    let mut reconciled = JsonMap::new();
    let mut duplicates = Vec::new();
    for (key, value) in overrides {
        override_value(&mut reconciled, key, value.clone(), "test", &mut duplicates);
    }
    (reconciled, duplicates)
}

#[test]
fn inserts_new_keys_verbatim() {
    let (reconciled, duplicates) = merged(&[("a", json!("b")), ("n", json!(5))]);

    assert_eq!(serde_json::Value::Object(reconciled), json!({"a": "b", "n": 5}));
    assert!(duplicates.is_empty());
}

#[test]
fn scalars_overwrite() {
    let (reconciled, duplicates) = merged(&[("a", json!("weak")), ("a", json!("strong"))]);

    assert_eq!(reconciled["a"], json!("strong"));
    assert!(duplicates.is_empty());
}

#[test]
fn equal_scalar_overwrite_records_a_duplicate_but_applies() {
    let (reconciled, duplicates) = merged(&[("owner", json!("Mine")), ("owner", json!("Mine"))]);

    assert_eq!(reconciled["owner"], json!("Mine"));
    assert_eq!(
        duplicates,
        vec![Duplicate {
            key: "owner".to_string(),
            value: json!("Mine"),
            source: "test".to_string(),
        }]
    );
}

#[test]
fn mappings_merge_one_level_deep() {
    let (reconciled, _) = merged(&[
        (
            "site",
            json!({"url": "https://test.com", "timeout": 50, "retries": 0}),
        ),
        (
            "site",
            json!({"url": "https://live.com", "timeout": 5, "retries": 5, "interval": 5}),
        ),
    ]);

    assert_eq!(
        reconciled["site"],
        json!({"url": "https://live.com", "timeout": 5, "retries": 5, "interval": 5})
    );
}

#[test]
fn mapping_merge_replaces_nested_children_wholesale() {
    // One-level merge only: the incoming child mapping replaces the
    // existing child, it is not merged into it.
    let (reconciled, _) = merged(&[
        ("site", json!({"nested": {"a": 1, "b": 2}})),
        ("site", json!({"nested": {"a": 9}})),
    ]);

    assert_eq!(reconciled["site"], json!({"nested": {"a": 9}}));
}

#[test]
fn mapping_over_scalar_replaces() {
    let (reconciled, _) = merged(&[("site", json!("scalar")), ("site", json!({"a": 1}))]);

    assert_eq!(reconciled["site"], json!({"a": 1}));
}

#[test]
fn lists_replace_not_merge() {
    let (reconciled, _) = merged(&[
        ("list", json!(["a", "b", "c"])),
        ("list", json!(["d", "x"])),
        ("list", json!(["y"])),
    ]);

    assert_eq!(reconciled["list"], json!(["y"]));
}

#[test]
fn longer_and_empty_lists_still_replace() {
    let (reconciled, _) = merged(&[
        ("list", json!([])),
        ("list", json!(["y", "1", "2", "3", "4"])),
    ]);
    assert_eq!(reconciled["list"], json!(["y", "1", "2", "3", "4"]));

    let (reconciled, _) = merged(&[("list", json!(["a", "b", "c"])), ("list", json!([]))]);
    assert_eq!(reconciled["list"], json!([]));
}

#[test]
fn list_replaces_scalar_and_vice_versa() {
    let (reconciled, _) = merged(&[("v", json!("scalar")), ("v", json!(["a"]))]);
    assert_eq!(reconciled["v"], json!(["a"]));

    let (reconciled, _) = merged(&[("v", json!(["a"])), ("v", json!("scalar"))]);
    assert_eq!(reconciled["v"], json!("scalar"));
}

#[test]
fn null_existing_value_is_treated_as_absent() {
    let (reconciled, duplicates) = merged(&[("a", json!(null)), ("a", json!("value"))]);

    assert_eq!(reconciled["a"], json!("value"));
    assert!(duplicates.is_empty());
}

#[test]
fn duplicate_display_includes_key_value_and_source() {
    let duplicate = Duplicate {
        key: "owner".to_string(),
        value: json!("Mine"),
        source: "backend-mine.yml".to_string(),
    };

    assert_eq!(duplicate.to_string(), "owner: \"Mine\" (backend-mine.yml);");
}
