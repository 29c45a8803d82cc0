//! HTTP surface of the configuration server.
//!
//! This crate owns request/response translation only: path and query
//! parameters become a [`confserve_core::ResolutionRequest`], pipeline
//! results become JSON bodies and `X-Resolution-*` headers, and pipeline
//! errors become the `{"message": …}` envelope. The resolution logic
//! itself lives in `confserve_core`.

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod server;

pub use errors::ApiError;
pub use routes::create_router;
pub use server::ApiServer;

use std::sync::Arc;

use app_config::AppSettings;
use config_backend::Backend;
use secret_store::{SecretResolver, SecretStore};
use template_engine::TemplateEngine;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub backends: Arc<Vec<Arc<dyn Backend>>>,
    pub engine: Arc<TemplateEngine>,
    pub secret_resolver: Option<Arc<SecretResolver>>,
}

impl AppState {
    /// Assemble the state from settings, backends and an optional secret
    /// store client (injected by the deployment; without one, prefixed
    /// placeholders fall back to ordinary property handling).
    pub fn new(
        settings: AppSettings,
        backends: Vec<Arc<dyn Backend>>,
        secret_store: Option<Arc<dyn SecretStore>>,
    ) -> Self {
        let secret_resolver = match secret_store {
            Some(store) if !settings.secrets.disabled => {
                Some(Arc::new(SecretResolver::new(store, &settings.secrets)))
            }
            _ => None,
        };

        Self {
            settings: Arc::new(settings),
            backends: Arc::new(backends),
            engine: Arc::new(TemplateEngine::new()),
            secret_resolver,
        }
    }
}
