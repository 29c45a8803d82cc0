//! Tests for template error formatting.

use super::*;

#[test]
fn render_errors_describe_the_failure() {
    let err = Error::Render(handlebars::RenderError::new("missing helper"));
    assert!(err.to_string().contains("template rendering failed"));
    assert!(err.to_string().contains("missing helper"));
}
