//! Reference parsing and resolution.
//!
//! Reference formats (after one of the recognised prefixes):
//!
//! - `name/key`: uses the configured default namespace
//! - `namespace/name/key`
//! - `namespace/name/key/sub…`: navigate into a YAML-valued entry
//!
//! A trailing `:default` is disambiguated from the prefix colon by locating
//! the last `:` and checking that the text before it has a valid path shape
//! (one or two `/` separators). Defaults containing `/` are therefore not
//! supported.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use app_config::SecretStoreSettings;

use crate::cache::{CacheKey, TtlCache};
use crate::errors::SecretStoreError;
use crate::{SecretStore, PREFIX_CONFIG_MAP, PREFIX_CONFIG_MAP_SHORT, PREFIX_SECRET};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Which kind of store document a reference addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Secret,
    ConfigMap,
}

/// A parsed store reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretReference {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    pub key: String,
    pub sub_keys: Vec<String>,
}

/// Resolves prefixed placeholders against an injected store, with caching.
pub struct SecretResolver {
    store: Arc<dyn SecretStore>,
    default_namespace: String,
    cache: Option<TtlCache>,
}

impl SecretResolver {
    pub fn new(store: Arc<dyn SecretStore>, settings: &SecretStoreSettings) -> Self {
        let cache = if settings.cache_ttl_seconds > 0 {
            debug!(
                "Secret store caching enabled, ttl {}s",
                settings.cache_ttl_seconds
            );
            Some(TtlCache::new(Duration::from_secs(settings.cache_ttl_seconds)))
        } else {
            None
        };

        Self {
            store,
            default_namespace: settings.default_namespace.clone(),
            cache,
        }
    }

    /// Whether a placeholder starts with a recognised store prefix.
    pub fn can_resolve(placeholder: &str) -> bool {
        recognised_prefix(placeholder).is_some()
    }

    /// Split a prefixed placeholder into its reference part and an optional
    /// trailing default value.
    pub fn split_default(placeholder: &str) -> (&str, Option<&str>) {
        let Some(prefix) = recognised_prefix(placeholder) else {
            return (placeholder, None);
        };

        let rest = &placeholder[prefix.len()..];
        if let Some(idx) = rest.rfind(':') {
            let path_part = &rest[..idx];
            let separators = path_part.matches('/').count();
            if (1..=2).contains(&separators) {
                return (&placeholder[..prefix.len() + idx], Some(&rest[idx + 1..]));
            }
        }

        (placeholder, None)
    }

    /// Resolve a reference (without any default suffix) to a string value.
    ///
    /// `Ok(None)` means the document, key or sub-key was absent.
    pub fn resolve(&self, placeholder: &str) -> Result<Option<String>, SecretStoreError> {
        let reference = self.parse(placeholder)?;

        let Some(raw) = self.fetch(&reference)? else {
            return Ok(None);
        };

        if reference.sub_keys.is_empty() {
            return Ok(Some(raw));
        }

        navigate_entry(&raw, &reference.sub_keys)
    }

    /// Parse a prefixed reference into its parts.
    pub fn parse(&self, placeholder: &str) -> Result<SecretReference, SecretStoreError> {
        let (kind, prefix) = match recognised_prefix(placeholder) {
            Some(PREFIX_SECRET) => (ResourceKind::Secret, PREFIX_SECRET),
            Some(prefix) => (ResourceKind::ConfigMap, prefix),
            None => return Err(SecretStoreError::UnknownPrefix(placeholder.to_string())),
        };

        let path = &placeholder[prefix.len()..];
        let parts: Vec<&str> = path.split('/').collect();

        if parts.len() < 2 {
            return Err(SecretStoreError::InvalidPath(path.to_string()));
        }

        if parts.len() == 2 {
            if self.default_namespace.is_empty() {
                return Err(SecretStoreError::MissingNamespace(path.to_string()));
            }
            return Ok(SecretReference {
                kind,
                namespace: self.default_namespace.clone(),
                name: parts[0].to_string(),
                key: parts[1].to_string(),
                sub_keys: Vec::new(),
            });
        }

        Ok(SecretReference {
            kind,
            namespace: parts[0].to_string(),
            name: parts[1].to_string(),
            key: parts[2].to_string(),
            sub_keys: parts[3..].iter().map(|s| s.to_string()).collect(),
        })
    }

    fn fetch(&self, reference: &SecretReference) -> Result<Option<String>, SecretStoreError> {
        let cache_key = CacheKey {
            kind: reference.kind,
            namespace: reference.namespace.clone(),
            name: reference.name.clone(),
            key: reference.key.clone(),
        };

        if let Some(cache) = &self.cache {
            if let Some(value) = cache.get(&cache_key) {
                return Ok(Some(value));
            }
        }

        debug!(
            "Fetching store entry [{}/{}] key [{}]",
            reference.namespace, reference.name, reference.key
        );
        let value = match reference.kind {
            ResourceKind::Secret => {
                self.store
                    .get_secret(&reference.namespace, &reference.name, &reference.key)?
            }
            ResourceKind::ConfigMap => {
                self.store
                    .get_config(&reference.namespace, &reference.name, &reference.key)?
            }
        };

        if let (Some(cache), Some(value)) = (&self.cache, &value) {
            cache.set(cache_key, value.clone());
        }

        Ok(value)
    }
}

fn recognised_prefix(placeholder: &str) -> Option<&'static str> {
    [PREFIX_SECRET, PREFIX_CONFIG_MAP, PREFIX_CONFIG_MAP_SHORT]
        .into_iter()
        .find(|prefix| placeholder.starts_with(prefix))
}

/// Parse a fetched entry as YAML and walk the sub-keys into it.
fn navigate_entry(raw: &str, sub_keys: &[String]) -> Result<Option<String>, SecretStoreError> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(raw)
        .map_err(|e| SecretStoreError::EntryParse(e.to_string()))?;

    let mut current = &parsed;
    for key in sub_keys {
        let mapping = current
            .as_mapping()
            .ok_or_else(|| SecretStoreError::SubKeyNavigation { key: key.clone() })?;
        match mapping
            .iter()
            .find(|(entry_key, _)| entry_key.as_str() == Some(key.as_str()))
        {
            Some((_, value)) => current = value,
            None => return Ok(None),
        }
    }

    Ok(Some(stringify(current)?))
}

fn stringify(value: &serde_yaml::Value) -> Result<String, SecretStoreError> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => serde_json::to_string(other)
            .map_err(|e| SecretStoreError::EntryParse(e.to_string())),
    }
}
