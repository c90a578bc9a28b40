//! Leaderboard read-through cache with stale-while-revalidate semantics.
//!
//! - hit: the cached snapshot is returned at once and a detached task
//!   recomputes it from the document store, whatever its age.
//! - miss (or cache unavailable / failing): the store answers, and the cache
//!   is populated on a best-effort basis.
//! - every successful submission deletes the cached snapshot.
//!
//! Cache failures never reach the caller. Store failures on the miss path do.
use crate::cache::{CacheStore, HealthCheck};
use crate::config::Settings;
use crate::core::scan::ScanResult;
use crate::error::{AppResult, CacheResult};
use crate::storage::ScanStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strum::{Display, IntoStaticStr};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const LEADERBOARD_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CacheOutcome {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardMetadata {
    pub total: usize,
    pub timestamp: DateTime<Utc>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPayload {
    pub data: Vec<ScanResult>,
    pub metadata: LeaderboardMetadata,
}

impl LeaderboardPayload {
    fn from_store(mut data: Vec<ScanResult>) -> Self {
        data.truncate(LEADERBOARD_SIZE);
        LeaderboardPayload {
            metadata: LeaderboardMetadata {
                total: data.len(),
                timestamp: Utc::now(),
                source: Source::Database,
            },
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Bumped whenever the cached payload format changes.
    pub key_version: u32,
    /// Expiry set on the cache entry.
    pub fresh: Duration,
    /// Only advertised to HTTP caches, never enforced here.
    pub stale: Duration,
}

impl CachePolicy {
    pub fn key(&self) -> String {
        format!("leaderboard:top{}:v{}", LEADERBOARD_SIZE, self.key_version)
    }

    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, stale-while-revalidate={}",
            self.fresh.as_secs(),
            self.stale.as_secs()
        )
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy {
            key_version: 1,
            fresh: Duration::from_secs(60),
            stale: Duration::from_secs(300),
        }
    }
}

impl From<&Settings> for CachePolicy {
    fn from(settings: &Settings) -> Self {
        CachePolicy {
            key_version: settings.cache_key_version,
            fresh: settings.cache_fresh(),
            stale: settings.cache_stale(),
        }
    }
}

/// Result of a leaderboard read.
#[derive(Debug)]
pub struct LeaderboardRead {
    pub payload: LeaderboardPayload,
    pub outcome: CacheOutcome,
    /// Background refresh spawned by a hit. Dropping the handle detaches it.
    pub refresh: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct LeaderboardCache {
    store: Arc<dyn ScanStore>,
    cache: Arc<dyn CacheStore>,
    health: Arc<dyn HealthCheck>,
    policy: CachePolicy,
    refreshes: Arc<AtomicU64>,
}

impl LeaderboardCache {
    pub fn new(
        store: Arc<dyn ScanStore>,
        cache: Arc<dyn CacheStore>,
        health: Arc<dyn HealthCheck>,
        policy: CachePolicy,
    ) -> Self {
        LeaderboardCache {
            store,
            cache,
            health,
            policy,
            refreshes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn is_cache_available(&self) -> bool {
        self.health.is_available()
    }

    /// Number of background refreshes spawned so far.
    pub fn refreshes_spawned(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub async fn read(&self) -> AppResult<LeaderboardRead> {
        if let Some(mut payload) = self.lookup().await {
            payload.metadata.source = Source::Cache;
            return Ok(LeaderboardRead {
                payload,
                outcome: CacheOutcome::Hit,
                refresh: Some(self.spawn_refresh()),
            });
        }

        let payload = compute(self.store.as_ref()).await?;
        if self.health.is_available() {
            if let Err(e) = write(self.cache.as_ref(), &self.policy, &payload).await {
                debug!(error = %e, "Could not populate leaderboard cache.");
            }
        }

        Ok(LeaderboardRead {
            payload,
            outcome: CacheOutcome::Miss,
            refresh: None,
        })
    }

    /// Drop the cached snapshot so the next read observes the latest submissions.
    ///
    /// Attempted even while the cache is flagged unavailable: the flag may be
    /// stale and an entry written before the outage can still be alive.
    pub async fn invalidate(&self) {
        match self.cache.delete(&self.policy.key()).await {
            Ok(()) => debug!(key = %self.policy.key(), "Leaderboard cache invalidated."),
            Err(e) => warn!(error = %e, "Could not invalidate leaderboard cache."),
        }
    }

    async fn lookup(&self) -> Option<LeaderboardPayload> {
        if !self.health.is_available() {
            return None;
        }

        let cached = match self.cache.get(&self.policy.key()).await {
            Ok(Some(cached)) => cached,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "Leaderboard cache lookup failed, falling back to store.");
                return None;
            }
        };

        match serde_json::from_str::<LeaderboardPayload>(&cached) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cached leaderboard.");
                None
            }
        }
    }

    // Concurrent hits each spawn their own refresh; nothing coalesces them.
    fn spawn_refresh(&self) -> JoinHandle<()> {
        self.refreshes.fetch_add(1, Ordering::Relaxed);

        let store = self.store.clone();
        let cache = self.cache.clone();
        let policy = self.policy.clone();
        tokio::spawn(async move {
            let payload = match compute(store.as_ref()).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "Background leaderboard refresh failed.");
                    return;
                }
            };
            match write(cache.as_ref(), &policy, &payload).await {
                Ok(()) => debug!(total = payload.metadata.total, "Leaderboard cache refreshed."),
                Err(e) => warn!(error = %e, "Could not store refreshed leaderboard."),
            }
        })
    }
}

async fn compute(store: &dyn ScanStore) -> AppResult<LeaderboardPayload> {
    let data = store.top(LEADERBOARD_SIZE).await?;
    Ok(LeaderboardPayload::from_store(data))
}

async fn write(
    cache: &dyn CacheStore,
    policy: &CachePolicy,
    payload: &LeaderboardPayload,
) -> CacheResult<()> {
    let serialized = serde_json::to_string(payload)?;
    cache
        .set_ex(&policy.key(), &serialized, policy.fresh)
        .await
}
