//! Tests for flattened-list replacement.

use super::*;
use serde_json::json;

fn ps(name: &str, source: serde_json::Value) -> PropertySource {
    PropertySource {
        name: name.to_string(),
        source: source.as_object().expect("object").clone(),
    }
}

#[test]
fn strongest_source_keeps_its_prefix_weaker_sources_are_wiped() {
    // Ordered weakest -> strongest.
    let sources = vec![
        ps("/application.yml", json!({"list[0]": "a", "list[1]": "b"})),
        ps("/myapp.yml", json!({"list[0]": "d", "list[1]": "x"})),
        ps("/myapp-mine.yml", json!({"list[0]": "y"})),
    ];
    let view: Vec<&PropertySource> = sources.iter().collect();

    let wiped = find_replaced_list_prefixes(&view);

    assert!(wiped[0].contains("list"));
    assert!(wiped[1].contains("list"));
    assert!(wiped[2].is_empty(), "strongest source keeps the list");
}

#[test]
fn distinct_prefixes_are_tracked_independently() {
    let sources = vec![
        ps("/application.yml", json!({"list[0]": "a", "cc[0]": "usd"})),
        ps("/myapp.yml", json!({"cc[0]": "eur"})),
    ];
    let view: Vec<&PropertySource> = sources.iter().collect();

    let wiped = find_replaced_list_prefixes(&view);

    assert!(wiped[0].contains("cc"));
    assert!(
        !wiped[0].contains("list"),
        "only this source carries `list`, so it survives"
    );
    assert!(wiped[1].is_empty());
}

#[test]
fn nested_flattened_entries_contribute_their_prefix() {
    let sources = vec![
        ps("/application.yml", json!({"endpoints[0].host": "a"})),
        ps("/myapp.yml", json!({"endpoints[0].host": "b"})),
    ];
    let view: Vec<&PropertySource> = sources.iter().collect();

    let wiped = find_replaced_list_prefixes(&view);

    assert!(wiped[0].contains("endpoints"));
    assert!(wiped[1].is_empty());
}

#[test]
fn skip_check_matches_only_bracketed_continuations() {
    let wiped: HashSet<String> = ["list".to_string()].into_iter().collect();

    assert!(is_replaced_list_entry("src", &wiped, "list[0]"));
    assert!(is_replaced_list_entry("src", &wiped, "list[12].sub"));
    assert!(!is_replaced_list_entry("src", &wiped, "listing[0]"));
    assert!(!is_replaced_list_entry("src", &wiped, "list"));
    assert!(!is_replaced_list_entry("src", &wiped, "other[0]"));
}

#[test]
fn keys_without_brackets_contribute_no_prefix() {
    let sources = vec![ps("/application.yml", json!({"plain": 1, "[odd": 2}))];
    let view: Vec<&PropertySource> = sources.iter().collect();

    let wiped = find_replaced_list_prefixes(&view);

    assert!(wiped[0].is_empty());
}
