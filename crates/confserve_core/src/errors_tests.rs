//! Tests for resolution error formatting.

use super::*;

#[test]
fn cycle_error_names_the_placeholder() {
    let err = ResolveError::PlaceholderCycle {
        placeholder: "${a}".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "placeholder cycle detected while resolving ${a}"
    );
}

#[test]
fn store_errors_pass_through_transparently() {
    let err = ResolveError::from(secret_store::SecretStoreError::Store(
        "boom".to_string(),
    ));
    assert_eq!(err.to_string(), "secret store failure: boom");
}
