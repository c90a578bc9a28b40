use ::redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError, RedisResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::time;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, HealthCheck};
use crate::error::{AppError, AppResult, CacheError, CacheResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis-backed cache.
///
/// The connection is established lazily by [`HealthCheck::check`], so the
/// server starts (and serves uncached) while Redis is down. Any I/O failure
/// marks the cache unavailable until the next successful health check.
pub struct RedisCache {
    client: Client,
    connection: RwLock<Option<ConnectionManager>>,
    available: AtomicBool,
    timeout: Duration,
}

impl RedisCache {
    pub fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Config(format!("invalid redis url: {e}")))?;
        Ok(RedisCache {
            client,
            connection: RwLock::new(None),
            available: AtomicBool::new(false),
            timeout,
        })
    }

    // The lock is only held to clone the manager out, never across an await.
    fn current(&self) -> Option<ConnectionManager> {
        self.connection.read().ok().and_then(|conn| conn.clone())
    }

    fn connection(&self) -> CacheResult<ConnectionManager> {
        match self.is_available() {
            true => self.current().ok_or(CacheError::Unavailable),
            false => Err(CacheError::Unavailable),
        }
    }

    async fn connect(&self) -> CacheResult<ConnectionManager> {
        let manager = time::timeout(CONNECT_TIMEOUT, self.client.get_connection_manager())
            .await
            .map_err(|_| CacheError::Timeout)??;
        if let Ok(mut conn) = self.connection.write() {
            *conn = Some(manager.clone());
        }
        Ok(manager)
    }

    fn set_available(&self, available: bool) {
        let previous = self.available.swap(available, Ordering::SeqCst);
        match (previous, available) {
            (false, true) => info!("Redis cache is available."),
            (true, false) => warn!("Redis cache is unavailable, serving leaderboard uncached."),
            _ => {}
        }
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = RedisResult<T>> + Send,
    ) -> CacheResult<T> {
        match time::timeout(self.timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if is_connection_error(&e) {
                    self.set_available(false);
                }
                Err(e.into())
            }
            Err(_) => {
                self.set_available(false);
                Err(CacheError::Timeout)
            }
        }
    }
}

fn is_connection_error(error: &RedisError) -> bool {
    error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection()?;
        self.bounded(conn.get::<_, Option<String>>(key)).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection()?;
        // redis rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.bounded(conn.set_ex::<_, _, ()>(key, value, seconds))
            .await
    }

    // Not gated on the availability flag: a live manager still gets the DEL.
    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.current().ok_or(CacheError::Unavailable)?;
        self.bounded(conn.del::<_, ()>(key)).await
    }
}

#[async_trait]
impl HealthCheck for RedisCache {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn check(&self) -> bool {
        let mut conn = match self.current() {
            Some(conn) => conn,
            None => match self.connect().await {
                Ok(conn) => conn,
                Err(e) => {
                    debug!(error = %e, "Could not connect to redis.");
                    self.set_available(false);
                    return false;
                }
            },
        };

        let ping = async move {
            let pong: RedisResult<String> = ::redis::cmd("PING").query_async(&mut conn).await;
            pong
        };
        let healthy = matches!(time::timeout(self.timeout, ping).await, Ok(Ok(_)));
        self.set_available(healthy);
        healthy
    }
}
