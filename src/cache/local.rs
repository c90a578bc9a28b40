use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheStore, HealthCheck};
use crate::error::CacheResult;

#[derive(Clone, Debug)]
struct CachedEntry {
    value: Arc<str>,
    expires_at: Instant,
}

impl CachedEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Single-instance cache living in the server process.
#[derive(Clone, Default)]
pub struct LocalCache {
    entries: Arc<DashMap<String, CachedEntry>>,
}

impl LocalCache {
    pub fn new() -> Self {
        LocalCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for LocalCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let value = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.to_string()),
            Some(_) => None,
            None => return Ok(None),
        };
        if value.is_none() {
            // guard dropped above, safe to take the write lock
            self.entries.remove_if(key, |_, entry| entry.is_expired());
        }
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            CachedEntry {
                value: Arc::from(value),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for LocalCache {
    fn is_available(&self) -> bool {
        true
    }

    async fn check(&self) -> bool {
        true
    }
}
