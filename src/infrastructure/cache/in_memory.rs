//! In-memory cache and token bucket implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::domain::cache::Cache;
use crate::domain::rate_limit::{BucketState, RateLimitDecision, TokenBucket, TokenBucketStore};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    /// Expiration timestamp (millis since epoch), `None` never expires
    expires_at: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct BucketEntry {
    state: BucketState,
    expires_at: u64,
}

/// Process-local cache for single-instance deployments and tests.
///
/// TTLs are tracked per entry. Token bucket takes are serialized by a
/// mutex, which makes refill-and-decrement atomic within the process.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
    buckets: MokaCache<String, BucketEntry>,
    bucket_lock: Mutex<()>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(config.max_capacity).build(),
            buckets: MokaCache::builder().max_capacity(config.max_capacity).build(),
            bucket_lock: Mutex::new(()),
        }
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn is_expired(entry: &CacheEntry) -> bool {
        entry
            .expires_at
            .is_some_and(|expires_at| Self::current_time_millis() > expires_at)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if Self::is_expired(&entry) {
                    self.cache.remove(key).await;
                    return Ok(None);
                }

                Ok(Some(entry.data))
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let entry = CacheEntry {
            data: value.to_string(),
            expires_at: Some(Self::current_time_millis() + ttl.as_millis() as u64),
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn set_raw_persistent(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let entry = CacheEntry {
            data: value.to_string(),
            expires_at: None,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }
}

#[async_trait]
impl TokenBucketStore for InMemoryCache {
    async fn take_token(
        &self,
        client_key: &str,
        bucket: &TokenBucket,
        now_ms: i64,
    ) -> Result<RateLimitDecision, DomainError> {
        let _guard = self.bucket_lock.lock().await;

        let now = Self::current_time_millis();
        let stored = self
            .buckets
            .get(client_key)
            .await
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.state);

        let (decision, next) = bucket.take(stored, now_ms);

        if let Some(state) = next {
            let entry = BucketEntry {
                state,
                expires_at: now + bucket.window().as_millis() as u64,
            };
            self.buckets.insert(client_key.to_string(), entry).await;
        }

        Ok(decision)
    }
}
