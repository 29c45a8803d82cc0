use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while acquiring or iterating a backend snapshot.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached or is in an unusable state.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A label (branch) was requested from a backend without label support.
    #[error("labels and branches are not supported by the {backend} backend")]
    LabelsUnsupported { backend: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Git(#[from] git2::Error),

    /// A matched document failed to decode; fatal for the request.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors raised while decoding a single document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Documents must decode to a mapping at the top level.
    #[error("document root is not a mapping")]
    NotAMapping,

    /// The document carries encryption metadata but no decrypter was
    /// configured.
    #[error("document is encrypted and no decrypter is configured")]
    NoDecrypter,

    /// The configured decrypter refused the document.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// The document's content was never materialised (non-readable entry).
    #[error("document has no decodable content")]
    NoContent,

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}
