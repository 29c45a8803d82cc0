//! HTTP routing.
//!
//! - GET   `/{application}/{profiles}`: resolve
//! - GET   `/{application}/{profiles}/{labels}`: resolve on a label
//! - PATCH `/{application}/{profiles}`: resolve with injections
//! - PATCH `/{application}/{profiles}/{labels}`: as above, with a label
//! - GET   `/liveness`, `/readiness`: process health
//!
//! `{application}` and `{profiles}` are comma-separated lists.

use axum::routing::get;
use axum::Router;

use crate::{handlers, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/liveness", get(handlers::liveness))
        .route("/readiness", get(handlers::readiness))
        .route(
            "/:application/:profiles",
            get(handlers::resolve_get).patch(handlers::resolve_patch),
        )
        .route(
            "/:application/:profiles/:labels",
            get(handlers::resolve_get_labeled).patch(handlers::resolve_patch_labeled),
        )
        .with_state(state)
}
