use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Fatal resolution failures.
///
/// Missing placeholder values and empty placeholders are warnings, not
/// errors; the resolver substitutes the empty string and carries on. Only
/// template failures, reference cycles and store failures abort a request.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Template(#[from] template_engine::Error),

    /// A `${…}` chain referenced itself.
    #[error("placeholder cycle detected while resolving {placeholder}")]
    PlaceholderCycle { placeholder: String },

    #[error(transparent)]
    SecretStore(#[from] secret_store::SecretStoreError),
}
