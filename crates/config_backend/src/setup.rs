//! Backend construction from application settings.

use std::sync::Arc;
use tracing::info;

use app_config::AppSettings;

use crate::decoder::Decrypter;
use crate::errors::BackendError;
use crate::file::FileBackend;
use crate::git::GitBackend;
use crate::{Backend, Refreshable};

#[cfg(test)]
#[path = "setup_tests.rs"]
mod tests;

/// The configured backends, split by capability.
pub struct Backends {
    /// Read path, sorted by ascending order value (highest precedence
    /// first).
    pub stores: Vec<Arc<dyn Backend>>,
    /// Backends that support scheduled background re-synchronisation.
    pub refreshables: Vec<Arc<dyn Refreshable>>,
}

/// Build every enabled backend.
pub fn init_backends(
    settings: &AppSettings,
    decrypter: Option<Arc<dyn Decrypter>>,
) -> Result<Backends, BackendError> {
    let mut stores: Vec<Arc<dyn Backend>> = Vec::new();
    let mut refreshables: Vec<Arc<dyn Refreshable>> = Vec::new();

    if settings.git.disabled {
        info!("Git backend is disabled");
    } else {
        info!("Enabling git backend");
        let git = Arc::new(GitBackend::new(settings.git.clone(), decrypter.clone())?);
        stores.push(git.clone());
        refreshables.push(git);
    }

    if settings.file.disabled {
        info!("File backend is disabled");
    } else {
        info!("Enabling file backend");
        stores.push(Arc::new(FileBackend::new(
            settings.file.clone(),
            decrypter,
        )));
    }

    // Priorities are static, so one sort at setup fixes the precedence for
    // every request.
    stores.sort_by_key(|backend| backend.order());

    Ok(Backends {
        stores,
        refreshables,
    })
}
