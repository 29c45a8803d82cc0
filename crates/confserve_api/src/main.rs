//! Configuration server binary.
//!
//! # Environment
//!
//! - `APP_CONFIG_FILE_YML_PATH`: settings file path (default `application.yml`)
//! - `RUST_LOG`: log filter (default `info`)

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use app_config::AppSettings;
use config_backend::{init_backends, Refreshable};
use confserve_api::{ApiServer, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let settings_path = app_config::settings_path_from_env();
    let settings = AppSettings::load(&settings_path)?;

    let backends = init_backends(&settings, None)?;
    spawn_background_refresh(settings.git.refresh_rate_millis, &backends.refreshables);

    // The secret store client is deployment-specific; without one,
    // store-prefixed placeholders degrade to their textual defaults.
    let state = AppState::new(settings, backends.stores, None);

    ApiServer::new(state).serve().await
}

/// Re-synchronise refresh-capable backends on a fixed interval. Failures
/// are logged and never stop the task.
fn spawn_background_refresh(interval_millis: u64, refreshables: &[Arc<dyn Refreshable>]) {
    if interval_millis == 0 {
        return;
    }

    for refreshable in refreshables {
        let refreshable = refreshable.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_millis));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let refreshable = refreshable.clone();
                match tokio::task::spawn_blocking(move || refreshable.refresh()).await {
                    Ok(Ok(())) => debug!("Background refresh complete"),
                    Ok(Err(e)) => warn!("Background refresh failed: {e}"),
                    Err(e) => warn!("Background refresh task panicked: {e}"),
                }
            }
        });
    }
}
