use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised during template expansion.
///
/// Parse failures surface through the render path as well; either way the
/// value being expanded is unusable and the whole resolution fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}
