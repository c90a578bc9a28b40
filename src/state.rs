use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheStore, DisabledCache, HealthCheck, LocalCache, RedisCache};
use crate::config::Settings;
use crate::core::leaderboard::{CachePolicy, LeaderboardCache};
use crate::error::AppResult;
use crate::storage::{MemoryStore, MongoStore, ScanStore};

pub struct AppState {
    pub store: Arc<dyn ScanStore>,
    pub leaderboard: LeaderboardCache,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ScanStore>,
        cache: Arc<dyn CacheStore>,
        health: Arc<dyn HealthCheck>,
        policy: CachePolicy,
    ) -> Arc<Self> {
        let leaderboard = LeaderboardCache::new(store.clone(), cache, health.clone(), policy);
        Arc::new(AppState {
            store,
            leaderboard,
            health,
        })
    }

    /// Wire the document store and cache described by the settings.
    pub async fn from_settings(settings: &Settings) -> AppResult<Arc<Self>> {
        let store: Arc<dyn ScanStore> = match &settings.mongodb_uri {
            Some(uri) => Arc::new(MongoStore::connect(uri, &settings.mongodb_database).await?),
            None => {
                warn!("No MONGODB_URI set, scan results are kept in memory only.");
                Arc::new(MemoryStore::new())
            }
        };

        let (cache, health): (Arc<dyn CacheStore>, Arc<dyn HealthCheck>) =
            match (&settings.redis_url, settings.local_cache) {
                (Some(url), _) => {
                    info!("Using redis leaderboard cache.");
                    let redis = Arc::new(RedisCache::new(url, settings.cache_timeout())?);
                    (redis.clone() as Arc<dyn CacheStore>, redis as Arc<dyn HealthCheck>)
                }
                (None, true) => {
                    info!("Using in-process leaderboard cache.");
                    let local = Arc::new(LocalCache::new());
                    (local.clone() as Arc<dyn CacheStore>, local as Arc<dyn HealthCheck>)
                }
                (None, false) => {
                    warn!("No REDIS_URL set, leaderboard is served uncached.");
                    (
                        Arc::new(DisabledCache) as Arc<dyn CacheStore>,
                        Arc::new(DisabledCache) as Arc<dyn HealthCheck>,
                    )
                }
            };

        Ok(AppState::new(store, cache, health, CachePolicy::from(settings)))
    }
}
