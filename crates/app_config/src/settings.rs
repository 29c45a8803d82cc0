//! Settings schema and loading.
//!
//! The YAML document mirrors the section layout below; all keys are
//! camelCase and every field is optional:
//!
//! ```yaml
//! server:
//!   port: 8080
//! defaults:
//!   resolvePropertySources: true
//! git:
//!   uri: git@github.com:example/cloud-config.git
//!   basedir: /tmp/confserve-git
//!   cloneOnStart: true
//! file:
//!   disabled: false
//!   path: /etc/confserve/config
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::SettingsError;

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// Top-level application settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub defaults: Defaults,
    pub git: GitSettings,
    pub file: FileSettings,
    pub secrets: SecretStoreSettings,
    pub templates: TemplateSettings,
}

impl AppSettings {
    /// Load settings from a YAML file.
    ///
    /// A missing file yields the default settings; read and parse failures
    /// are errors.
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        if !Path::new(path).exists() {
            info!("No settings file found at {path}, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading settings from {path}");
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;

        serde_yaml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub port: u16,
    pub host: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Server-side defaults for the per-request query parameters.
///
/// Each field is used only when the matching query parameter is absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    pub resolve_property_sources: bool,
    pub flatten_hierarchical_config: bool,
    pub flattened_indexed_lists: bool,
    pub log_responses: bool,
    pub pretty_print_json: bool,
}

/// Git backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitSettings {
    pub disabled: bool,
    pub order: i32,

    pub uri: String,
    pub private_key: String,
    pub known_hosts_file: String,

    pub basedir: String,
    pub disable_base_dir_cleaning: bool,

    /// When labels are disabled, requests naming one are rejected and the
    /// clone may be shallow.
    pub disable_labels: bool,
    pub default_branch_name: String,

    pub clone_on_start: bool,
    pub force_pull: bool,

    /// Background re-synchronisation interval; `0` disables the task.
    pub refresh_rate_millis: u64,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            disabled: false,
            order: 0,
            uri: String::new(),
            private_key: String::new(),
            known_hosts_file: String::new(),
            basedir: String::new(),
            disable_base_dir_cleaning: false,
            disable_labels: false,
            default_branch_name: "master".to_string(),
            clone_on_start: false,
            force_pull: false,
            refresh_rate_millis: 0,
        }
    }
}

/// Filesystem backend settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileSettings {
    pub disabled: bool,
    pub order: i32,
    pub path: String,
}

/// External secret/config store settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretStoreSettings {
    pub disabled: bool,
    /// Namespace assumed when a placeholder path carries only `name/key`.
    pub default_namespace: String,
    /// Entry cache lifetime; `0` disables caching.
    pub cache_ttl_seconds: u64,
}

/// Template expansion settings.
///
/// The delimiters decide whether a string value is handed to the template
/// engine at all; the engine's own syntax is fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateSettings {
    pub left_delim: String,
    pub right_delim: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            left_delim: "{{".to_string(),
            right_delim: "}}".to_string(),
        }
    }
}
