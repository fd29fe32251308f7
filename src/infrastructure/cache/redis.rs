//! Redis cache and token bucket implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use crate::domain::cache::{Cache, CacheKeys};
use crate::domain::rate_limit::{
    RateLimitDecision, TokenBucket, TokenBucketStore, DEFAULT_LAST_REFILL_AGE_MS,
};
use crate::domain::DomainError;

/// Refill-and-take executed server side so concurrent requests from one
/// client can never observe the same token count.
///
/// KEYS: tokens, last refill. ARGV: capacity, refill rate, window seconds,
/// now in ms, default last refill age in ms. Returns {admitted, remaining}.
const TAKE_TOKEN_SCRIPT: &str = r#"
local capacity = tonumber(ARGV[1])
local rate = tonumber(ARGV[2])
local window = tonumber(ARGV[3])
local now = tonumber(ARGV[4])

local tokens = tonumber(redis.call('GET', KEYS[1]))
if tokens == nil then
    tokens = capacity
end

local last_refill = tonumber(redis.call('GET', KEYS[2]))
if last_refill == nil then
    last_refill = now - tonumber(ARGV[5])
end

local elapsed = math.max(0, now - last_refill) / 1000
local refilled = math.min(capacity, tokens + math.floor(elapsed * rate))

if refilled < 1 then
    return {0, refilled}
end

redis.call('SET', KEYS[1], refilled - 1, 'EX', window)
redis.call('SET', KEYS[2], now, 'EX', window)
return {1, refilled - 1}
"#;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Redis-backed shared cache.
///
/// Also serves as the token bucket store; bucket state is primary data
/// there, not a cached copy.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
    take_token: Script,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Creates a new Redis cache connection
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            connection,
            config,
            take_token: Script::new(TAKE_TOKEN_SCRIPT),
        })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&prefixed_key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn set_raw_persistent(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(&prefixed_key, value)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let exists: bool = conn.exists(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to check existence of key '{}': {}", key, e))
        })?;

        Ok(exists)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))
    }
}

#[async_trait]
impl TokenBucketStore for RedisCache {
    async fn take_token(
        &self,
        client_key: &str,
        bucket: &TokenBucket,
        now_ms: i64,
    ) -> Result<RateLimitDecision, DomainError> {
        let mut conn = self.connection.clone();

        let (admitted, remaining): (i64, i64) = self
            .take_token
            .key(self.prefix_key(&CacheKeys::rate_limit_tokens(client_key)))
            .key(self.prefix_key(&CacheKeys::rate_limit_last_access(client_key)))
            .arg(bucket.capacity)
            .arg(bucket.refill_rate_per_second)
            .arg(bucket.window().as_secs())
            .arg(now_ms)
            .arg(DEFAULT_LAST_REFILL_AGE_MS)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache(format!(
                    "Failed to take rate limit token for '{}': {}",
                    client_key, e
                ))
            })?;

        Ok(if admitted == 1 {
            RateLimitDecision::allowed(bucket.capacity, remaining)
        } else {
            RateLimitDecision::rejected(bucket.capacity, remaining)
        })
    }
}
