//! Tests for injection staging.

use super::*;

#[test]
fn caret_keys_are_pre_stage() {
    assert_eq!(pre_stage_key("^owner"), Some("owner"));
    assert_eq!(pre_stage_key("owner"), None);
    assert!(!is_post_stage("^owner"));
}

#[test]
fn other_keys_are_post_stage() {
    assert!(is_post_stage("owner"));
    assert!(is_post_stage(""));
    assert_eq!(pre_stage_key(""), None);
}
