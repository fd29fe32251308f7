//! Shared-store seam for token buckets

use std::fmt::Debug;

use async_trait::async_trait;

use super::bucket::{RateLimitDecision, TokenBucket};
use crate::domain::DomainError;

/// Store that owns token bucket state for every client.
///
/// Implementations must perform refill-and-decrement as one atomic step:
/// two concurrent callers for the same client may never both observe the
/// same token count.
#[async_trait]
pub trait TokenBucketStore: Send + Sync + Debug {
    /// Refill the bucket for `client_key` up to `now_ms` and try to take one token
    async fn take_token(
        &self,
        client_key: &str,
        bucket: &TokenBucket,
        now_ms: i64,
    ) -> Result<RateLimitDecision, DomainError>;
}
