#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use naughty_nice::cache::{CacheStore, HealthCheck, LocalCache};
use naughty_nice::core::leaderboard::{CachePolicy, LeaderboardCache};
use naughty_nice::core::scan::{ScanResult, Verdict};
use naughty_nice::error::{AppError, AppResult, CacheError, CacheResult};
use naughty_nice::storage::{MemoryStore, ScanStore};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub fn scan(name: &str, score: u8) -> ScanResult {
    ScanResult {
        id: Uuid::new_v4(),
        name: name.to_string(),
        verdict: Verdict::from_score(score),
        message: format!("{name} scored {score}"),
        score,
        country: None,
        timestamp: Utc::now(),
    }
}

/// Document store counting leaderboard queries, with switchable latency and failures.
#[derive(Default)]
pub struct FakeStore {
    pub inner: MemoryStore,
    pub top_calls: AtomicUsize,
    pub delay_ms: AtomicU64,
    pub failing: AtomicBool,
}

impl FakeStore {
    pub fn top_calls(&self) -> usize {
        self.top_calls.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScanStore for FakeStore {
    async fn insert(&self, scan: &ScanResult) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Store("store is down".to_string()));
        }
        self.inner.insert(scan).await
    }

    async fn top(&self, limit: usize) -> AppResult<Vec<ScanResult>> {
        self.top_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Store("store is down".to_string()));
        }
        self.inner.top(limit).await
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Cache whose availability and failures are driven by the test.
pub struct FakeCache {
    pub inner: LocalCache,
    pub available: AtomicBool,
    pub failing: AtomicBool,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl Default for FakeCache {
    fn default() -> Self {
        FakeCache {
            inner: LocalCache::new(),
            available: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            sets: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }
}

impl FakeCache {
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn fail(&self) -> CacheResult<()> {
        match self.failing.load(Ordering::SeqCst) {
            true => Err(CacheError::Timeout),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl CacheStore for FakeCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.fail()?;
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.fail()?;
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_ex(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.fail()?;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }
}

#[async_trait]
impl HealthCheck for FakeCache {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn check(&self) -> bool {
        self.is_available()
    }
}

pub fn leaderboard(store: Arc<FakeStore>, cache: Arc<FakeCache>) -> LeaderboardCache {
    LeaderboardCache::new(store, cache.clone(), cache, CachePolicy::default())
}
