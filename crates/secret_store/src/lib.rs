//! External secret/config store resolution.
//!
//! Placeholders prefixed `k8s/secret:`, `k8s/configmap:` or `k8s/cm:` are
//! resolved against a cluster store through the narrow [`SecretStore`]
//! adapter. The store client itself (in-cluster plumbing, authentication)
//! is injected by the deployment; this crate owns reference parsing,
//! sub-key navigation into YAML-valued entries, and a TTL cache shared by
//! all requests.

mod cache;

pub mod errors;
pub mod resolver;

pub use errors::SecretStoreError;
pub use resolver::{ResourceKind, SecretReference, SecretResolver};

/// Placeholder prefix selecting a secret document.
pub const PREFIX_SECRET: &str = "k8s/secret:";

/// Placeholder prefix selecting a config document.
pub const PREFIX_CONFIG_MAP: &str = "k8s/configmap:";

/// Shorthand for [`PREFIX_CONFIG_MAP`].
pub const PREFIX_CONFIG_MAP_SHORT: &str = "k8s/cm:";

/// Narrow adapter over the cluster secret/config store.
///
/// `Ok(None)` means the document or key does not exist; errors are reserved
/// for store failures. Implementations may block on network I/O.
pub trait SecretStore: Send + Sync {
    fn get_secret(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<String>, SecretStoreError>;

    fn get_config(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<String>, SecretStoreError>;
}
