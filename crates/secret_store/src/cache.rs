//! TTL cache for fetched store entries.
//!
//! Shared by every request: many concurrent readers, one writer per entry.
//! Expired entries are overwritten on the next successful fetch rather than
//! evicted eagerly.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::resolver::ResourceKind;

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    pub key: String,
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

pub(crate) struct TtlCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if Instant::now() > entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: CacheKey, value: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key,
                CacheEntry {
                    value,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }
}
