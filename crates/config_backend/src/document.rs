//! The document contract shared by all backends.

use crate::errors::DecodeError;
use crate::JsonMap;

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

/// One candidate configuration document within a snapshot.
///
/// Documents are immutable for the duration of a request; decoding is lazy
/// and only ever performed for documents selected by the discovery filter.
pub trait Document {
    /// Short name, e.g. `accounts-production.yaml`. For git-backed
    /// documents this is the path within the repository tree, so documents
    /// in subdirectories never match the discovery rules.
    fn name(&self) -> &str;

    /// Fully qualified name: absolute path or repository-qualified URI.
    fn qualified_name(&self) -> String;

    /// Containing directory or repository root.
    fn location(&self) -> String;

    /// `Some(extension)` when the document can be decoded.
    fn readable_suffix(&self) -> Option<&'static str> {
        readable_suffix(self.name())
    }

    /// Decode the document into a mapping.
    fn to_map(&self) -> Result<JsonMap, DecodeError>;
}

/// Recognised decodable extensions, returned with their leading dot.
pub fn readable_suffix(name: &str) -> Option<&'static str> {
    if name.ends_with(".yml") {
        Some(".yml")
    } else if name.ends_with(".yaml") {
        Some(".yaml")
    } else {
        None
    }
}
