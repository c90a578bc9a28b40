//! Key-value cache in front of the document store.
//!
//! Two capabilities are split on purpose: [`CacheStore`] moves bytes around,
//! [`HealthCheck`] tells callers whether it is worth trying at all. Whoever
//! builds the leaderboard cache hands both in, so there is no process-wide
//! health flag.
use async_trait::async_trait;
use std::time::Duration;

use crate::error::{CacheError, CacheResult};

pub mod local;
pub mod redis;

pub use self::local::LocalCache;
pub use self::redis::RedisCache;

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Last known state, no I/O.
    fn is_available(&self) -> bool;

    /// Check the backend and update the known state.
    async fn check(&self) -> bool;
}

/// Stand-in used when caching is turned off. Never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

#[async_trait]
impl CacheStore for DisabledCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable)
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Unavailable)
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Unavailable)
    }
}

#[async_trait]
impl HealthCheck for DisabledCache {
    fn is_available(&self) -> bool {
        false
    }

    async fn check(&self) -> bool {
        false
    }
}
