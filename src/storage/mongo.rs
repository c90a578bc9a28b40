use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::core::scan::{ScanResult, Verdict};
use crate::error::AppResult;
use crate::storage::ScanStore;

pub const SCAN_RESULTS_COLLECTION: &str = "scan_results";

/// Stored shape of a [`ScanResult`].
///
/// The timestamp is a native BSON date so the `timestamp: 1` tie-break
/// compares instants rather than RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDocument {
    pub id: Uuid,
    pub name: String,
    pub verdict: Verdict,
    pub message: String,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl From<&ScanResult> for ScanDocument {
    fn from(scan: &ScanResult) -> Self {
        ScanDocument {
            id: scan.id,
            name: scan.name.clone(),
            verdict: scan.verdict,
            message: scan.message.clone(),
            score: scan.score,
            country: scan.country.clone(),
            timestamp: scan.timestamp,
        }
    }
}

impl From<ScanDocument> for ScanResult {
    fn from(document: ScanDocument) -> Self {
        ScanResult {
            id: document.id,
            name: document.name,
            verdict: document.verdict,
            message: document.message,
            score: document.score,
            country: document.country,
            timestamp: document.timestamp,
        }
    }
}

pub struct MongoStore {
    database: Database,
    collection: Collection<ScanDocument>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> AppResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database);
        let collection = database.collection::<ScanDocument>(SCAN_RESULTS_COLLECTION);

        let store = MongoStore {
            database,
            collection,
        };
        store.ping().await?;
        store.ensure_indexes().await?;

        info!(
            database = %store.database.name(),
            collection = SCAN_RESULTS_COLLECTION,
            "Connected to document store."
        );
        Ok(store)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "score": -1, "timestamp": 1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl ScanStore for MongoStore {
    async fn insert(&self, scan: &ScanResult) -> AppResult<()> {
        self.collection.insert_one(ScanDocument::from(scan)).await?;
        Ok(())
    }

    async fn top(&self, limit: usize) -> AppResult<Vec<ScanResult>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "score": -1, "timestamp": 1 })
            .limit(limit as i64)
            .await?;
        let documents: Vec<ScanDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(ScanResult::from).collect())
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
