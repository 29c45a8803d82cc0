//! Configuration document backends.
//!
//! A backend produces, per request, a snapshot of candidate configuration
//! documents: an opaque version string plus an iterator over the documents
//! present at that version. Two implementations exist:
//!
//! - [`git::GitBackend`]: a cloned git repository; the snapshot is the HEAD
//!   commit of the requested (or default) branch and the version is the
//!   commit hash.
//! - [`file::FileBackend`]: a local directory; the version is always empty
//!   and branch selection is rejected.
//!
//! Reading documents happens through the [`Document`] trait; decoding YAML
//! content (including decryption of encrypted documents) lives in
//! [`decoder`]. Backends are shared across requests: the git backend guards
//! its repository handle with a mutex, the file backend is stateless.
//!
//! Two capability traits keep the read path and the optional background
//! write path apart: every backend implements [`Backend`], and backends
//! that can re-synchronise with their origin additionally implement
//! [`Refreshable`].

pub mod decoder;
pub mod document;
pub mod errors;
pub mod file;
pub mod git;
pub mod setup;

pub use decoder::{decode_document, Decrypter, ENCRYPTION_METADATA_KEY};
pub use document::{readable_suffix, Document};
pub use errors::{BackendError, DecodeError};
pub use file::FileBackend;
pub use git::GitBackend;
pub use setup::{init_backends, Backends};

/// Mapping produced by decoding a document.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A point-in-time view of one backend's documents.
pub struct Snapshot {
    /// Empty, or a content-addressed identifier such as a commit hash.
    pub version: String,
    documents: Vec<Box<dyn Document>>,
}

impl Snapshot {
    pub fn new(version: String, documents: Vec<Box<dyn Document>>) -> Self {
        Self { version, documents }
    }

    /// Visit every document in snapshot order, stopping at the first error
    /// the callback returns.
    pub fn for_each<F>(&self, mut f: F) -> Result<(), BackendError>
    where
        F: FnMut(&dyn Document) -> Result<(), BackendError>,
    {
        for document in &self.documents {
            f(document.as_ref())?;
        }
        Ok(())
    }

    /// Number of documents in the snapshot.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// A source of configuration documents.
pub trait Backend: Send + Sync {
    /// Relative priority when several backends are configured; lower values
    /// take precedence.
    fn order(&self) -> i32;

    /// Acquire a snapshot, optionally re-synchronising with the origin
    /// first. A non-empty `branch` selects a label; backends without label
    /// support reject it with [`BackendError::LabelsUnsupported`].
    fn snapshot(&self, branch: &str, refresh: bool) -> Result<Snapshot, BackendError>;

    /// Release any resources held by the backend.
    fn close(&self) {}
}

/// Optional capability: re-synchronise with the origin outside a request,
/// e.g. from a scheduled background task.
pub trait Refreshable: Send + Sync {
    fn refresh(&self) -> Result<(), BackendError>;
}
