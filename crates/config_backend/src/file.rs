//! Filesystem backend.
//!
//! Serves documents straight from a configured directory. Snapshots carry no
//! version and label selection is rejected: a directory has no branches.

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use app_config::FileSettings;

use crate::decoder::{decode_document, Decrypter};
use crate::document::Document;
use crate::errors::{BackendError, DecodeError};
use crate::{Backend, JsonMap, Snapshot};

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

pub struct FileBackend {
    settings: FileSettings,
    decrypter: Option<Arc<dyn Decrypter>>,
}

impl FileBackend {
    pub fn new(settings: FileSettings, decrypter: Option<Arc<dyn Decrypter>>) -> Self {
        debug!("Reading configuration documents from {}", settings.path);
        Self {
            settings,
            decrypter,
        }
    }
}

impl Backend for FileBackend {
    fn order(&self) -> i32 {
        self.settings.order
    }

    fn snapshot(&self, branch: &str, _refresh: bool) -> Result<Snapshot, BackendError> {
        if !branch.is_empty() {
            return Err(BackendError::LabelsUnsupported { backend: "file" });
        }

        let mut entries = std::fs::read_dir(&self.settings.path)?
            .collect::<Result<Vec<_>, _>>()?;
        // Directory iteration order is platform-dependent; keep discovery
        // deterministic.
        entries.sort_by_key(|entry| entry.file_name());

        let documents = entries
            .into_iter()
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| {
                Box::new(FileDocument {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    dir: self.settings.path.clone(),
                    decrypter: self.decrypter.clone(),
                }) as Box<dyn Document>
            })
            .collect();

        Ok(Snapshot::new(String::new(), documents))
    }
}

struct FileDocument {
    name: String,
    dir: String,
    decrypter: Option<Arc<dyn Decrypter>>,
}

impl Document for FileDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn qualified_name(&self) -> String {
        format!("{}/{}", self.dir.trim_end_matches('/'), self.name)
    }

    fn location(&self) -> String {
        self.dir.clone()
    }

    fn to_map(&self) -> Result<JsonMap, DecodeError> {
        let bytes = std::fs::read(Path::new(&self.dir).join(&self.name))?;
        decode_document(&bytes, self.decrypter.as_deref())
    }
}
