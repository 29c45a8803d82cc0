//! Tests for source aggregate serialization.

use super::*;
use serde_json::json;

#[test]
fn serializes_with_camel_case_keys() {
    let source = Source {
        name: "accounts".to_string(),
        profiles: vec!["production".to_string()],
        label: String::new(),
        version: "abc123".to_string(),
        state: String::new(),
        property_sources: vec![PropertySource {
            name: "repo/accounts.yaml".to_string(),
            source: json!({"a": "b"}).as_object().unwrap().clone(),
        }],
    };

    let value = serde_json::to_value(&source).expect("serialize");

    assert_eq!(
        value,
        json!({
            "name": "accounts",
            "profiles": ["production"],
            "label": "",
            "version": "abc123",
            "state": "",
            "propertySources": [{"name": "repo/accounts.yaml", "source": {"a": "b"}}],
        })
    );
}

#[test]
fn round_trips_through_json() {
    let source = Source {
        name: "accounts".to_string(),
        ..Source::default()
    };

    let text = serde_json::to_string(&source).expect("serialize");
    let back: Source = serde_json::from_str(&text).expect("deserialize");

    assert_eq!(back, source);
}
