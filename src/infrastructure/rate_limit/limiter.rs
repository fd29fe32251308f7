//! Per-client token bucket admission control
//!
//! Bucket state lives in the shared key-value store and is the primary
//! copy, so a store outage is a hard error rather than a silent admit.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::rate_limit::{RateLimitDecision, TokenBucket, TokenBucketStore};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_rate_limit_decision;

/// Which API a request belongs to; each has its own bucket parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    Web,
    Public,
}

impl RateLimitScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Public => "public",
        }
    }
}

/// Admits or rejects requests per client
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn TokenBucketStore>,
    web: TokenBucket,
    public: TokenBucket,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn TokenBucketStore>, web: TokenBucket, public: TokenBucket) -> Self {
        Self { store, web, public }
    }

    pub fn bucket(&self, scope: RateLimitScope) -> &TokenBucket {
        match scope {
            RateLimitScope::Web => &self.web,
            RateLimitScope::Public => &self.public,
        }
    }

    /// Take one token from the client's bucket for `scope`
    pub async fn admit(
        &self,
        scope: RateLimitScope,
        client: &str,
    ) -> Result<RateLimitDecision, DomainError> {
        let client_key = format!("{}:{}", scope.as_str(), client);
        let decision = self
            .store
            .take_token(&client_key, self.bucket(scope), Utc::now().timestamp_millis())
            .await?;

        record_rate_limit_decision(scope.as_str(), decision.allowed);

        if !decision.allowed {
            debug!(client = %client, scope = scope.as_str(), "Rate limit exceeded");
        }

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCache;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl TokenBucketStore for FailingStore {
        async fn take_token(
            &self,
            _client_key: &str,
            _bucket: &TokenBucket,
            _now_ms: i64,
        ) -> Result<RateLimitDecision, DomainError> {
            Err(DomainError::cache("connection refused"))
        }
    }

    fn limiter(store: Arc<dyn TokenBucketStore>) -> RateLimiter {
        RateLimiter::new(
            store,
            TokenBucket::new(3, 1.0, 60),
            TokenBucket::new(2, 1.0, 60),
        )
    }

    #[tokio::test]
    async fn test_exhausts_after_capacity() {
        let limiter = limiter(Arc::new(InMemoryCache::new()));

        for _ in 0..2 {
            assert!(limiter.admit(RateLimitScope::Public, "1.2.3.4").await.unwrap().allowed);
        }

        let decision = limiter.admit(RateLimitScope::Public, "1.2.3.4").await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.limit, 2);
    }

    #[tokio::test]
    async fn test_scopes_have_separate_buckets() {
        let limiter = limiter(Arc::new(InMemoryCache::new()));

        for _ in 0..2 {
            limiter.admit(RateLimitScope::Public, "1.2.3.4").await.unwrap();
        }

        let web = limiter.admit(RateLimitScope::Web, "1.2.3.4").await.unwrap();
        assert!(web.allowed);
        assert_eq!(web.remaining, 2);
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error() {
        let limiter = limiter(Arc::new(FailingStore));

        let result = limiter.admit(RateLimitScope::Web, "1.2.3.4").await;
        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }
}
