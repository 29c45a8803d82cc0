//! Application settings for the configuration server.
//!
//! Settings are read from a single YAML document whose path comes from the
//! `APP_CONFIG_FILE_YML_PATH` environment variable (default `application.yml`).
//! A missing settings file is not an error: every section carries usable
//! defaults so the server can start bare and serve from an empty backend set.

pub mod errors;
pub mod settings;

pub use errors::SettingsError;
pub use settings::{
    AppSettings, Defaults, FileSettings, GitSettings, SecretStoreSettings, ServerSettings,
    TemplateSettings,
};

/// Environment variable naming the settings file.
pub const SETTINGS_PATH_ENV: &str = "APP_CONFIG_FILE_YML_PATH";

/// Fallback settings file path when the environment variable is unset.
pub const DEFAULT_SETTINGS_PATH: &str = "application.yml";

/// Resolve the settings file path from the environment.
pub fn settings_path_from_env() -> String {
    std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string())
}
