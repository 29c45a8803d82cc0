use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while resolving an external secret reference.
///
/// A missing document, key or sub-key is not an error; those surface as
/// not-found so the placeholder's default can apply.
#[derive(Error, Debug)]
pub enum SecretStoreError {
    /// The underlying store returned a non-not-found failure.
    #[error("secret store failure: {0}")]
    Store(String),

    /// The reference does not start with a recognised prefix.
    #[error("unknown secret reference prefix: {0}")]
    UnknownPrefix(String),

    /// The reference path has fewer than two segments.
    #[error("invalid secret reference path (need at least name/key): {0}")]
    InvalidPath(String),

    /// A two-segment path needs a configured default namespace.
    #[error("no default namespace configured and reference is missing one: {0}")]
    MissingNamespace(String),

    /// Sub-key navigation descended into a non-mapping value.
    #[error("cannot navigate sub-key [{key}]: value is not a mapping")]
    SubKeyNavigation { key: String },

    /// The stored entry could not be parsed for sub-key navigation.
    #[error("failed to parse stored entry for sub-key navigation: {0}")]
    EntryParse(String),
}
