use async_trait::async_trait;
use itertools::Itertools;
use std::sync::{Arc, RwLock};

use crate::core::scan::ScanResult;
use crate::error::{AppError, AppResult};
use crate::storage::{leaderboard_order, ScanStore};

type SharedScans = Arc<RwLock<Vec<ScanResult>>>;

/// In-process store, used when no MongoDB is configured.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: SharedScans,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|data| data.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn insert(&self, scan: &ScanResult) -> AppResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| AppError::Store("memory store lock poisoned".to_string()))?;
        data.push(scan.clone());
        Ok(())
    }

    async fn top(&self, limit: usize) -> AppResult<Vec<ScanResult>> {
        let data = self
            .data
            .read()
            .map_err(|_| AppError::Store("memory store lock poisoned".to_string()))?;
        Ok(data
            .iter()
            .sorted_by(|a, b| leaderboard_order(a, b))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
