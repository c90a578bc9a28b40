//! Document store holding every submitted scan result.
use async_trait::async_trait;
use std::cmp::Ordering;

use crate::core::scan::ScanResult;
use crate::error::AppResult;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Authoritative store for scan results. Records are append-only.
#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn insert(&self, scan: &ScanResult) -> AppResult<()>;

    /// Best `limit` results, highest score first. Ties go to the earliest submission.
    async fn top(&self, limit: usize) -> AppResult<Vec<ScanResult>>;

    /// Cheap round-trip used to check the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Leaderboard ordering shared by every store implementation.
pub fn leaderboard_order(a: &ScanResult, b: &ScanResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}
