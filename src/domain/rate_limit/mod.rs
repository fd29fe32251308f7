//! Rate limit domain - token bucket admission control

mod bucket;
mod store;

pub use bucket::{BucketState, RateLimitDecision, TokenBucket, DEFAULT_LAST_REFILL_AGE_MS};
pub use store::TokenBucketStore;
