//! Token bucket arithmetic

use std::time::Duration;

use serde::Deserialize;

/// How far in the past an unseen client's last refill is assumed to be
pub const DEFAULT_LAST_REFILL_AGE_MS: i64 = 60 * 60 * 1000;

/// Token bucket parameters for one class of clients
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TokenBucket {
    /// Maximum burst size
    pub capacity: u32,
    /// Tokens added per second
    pub refill_rate_per_second: f64,
    /// TTL applied to the stored bucket state on every admitted request
    pub window_seconds: u64,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_rate_per_second: f64, window_seconds: u64) -> Self {
        Self {
            capacity,
            refill_rate_per_second,
            window_seconds,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds.max(1))
    }

    /// Refill `state` up to `now_ms` and try to take one token.
    ///
    /// Returns the decision and, when admitted, the state to persist.
    /// A rejected request leaves the stored state untouched.
    pub fn take(
        &self,
        state: Option<BucketState>,
        now_ms: i64,
    ) -> (RateLimitDecision, Option<BucketState>) {
        let capacity = i64::from(self.capacity);
        let tokens = state.map(|s| s.tokens).unwrap_or(capacity);
        let last_refill_ms = state
            .map(|s| s.last_refill_ms)
            .unwrap_or(now_ms - DEFAULT_LAST_REFILL_AGE_MS);

        let elapsed_secs = (now_ms - last_refill_ms).max(0) as f64 / 1000.0;
        let tokens_added = (elapsed_secs * self.refill_rate_per_second).floor() as i64;
        let refilled = tokens.saturating_add(tokens_added).min(capacity);

        if refilled < 1 {
            return (
                RateLimitDecision::rejected(self.capacity, refilled),
                None,
            );
        }

        let remaining = refilled - 1;

        (
            RateLimitDecision::allowed(self.capacity, remaining),
            Some(BucketState {
                tokens: remaining,
                last_refill_ms: now_ms,
            }),
        )
    }
}

/// Stored state of one client's bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketState {
    pub tokens: i64,
    pub last_refill_ms: i64,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
}

impl RateLimitDecision {
    pub fn allowed(limit: u32, remaining: i64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: remaining.max(0) as u32,
        }
    }

    pub fn rejected(limit: u32, remaining: i64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: remaining.max(0) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(bucket: &TokenBucket, mut state: Option<BucketState>, now_ms: i64) -> (u32, Option<BucketState>) {
        let mut admitted = 0;
        loop {
            let (decision, next) = bucket.take(state, now_ms);
            if !decision.allowed {
                return (admitted, state);
            }
            admitted += 1;
            state = next;
        }
    }

    #[test]
    fn test_fresh_client_starts_full() {
        let bucket = TokenBucket::new(10, 1.0, 60);
        let (decision, state) = bucket.take(None, 1_000_000);

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 9);
        assert_eq!(
            state,
            Some(BucketState {
                tokens: 9,
                last_refill_ms: 1_000_000
            })
        );
    }

    #[test]
    fn test_exactly_capacity_admitted_without_elapsed_time() {
        let bucket = TokenBucket::new(5, 1.0, 60);
        let (admitted, state) = drain(&bucket, None, 1_000_000);

        assert_eq!(admitted, 5);

        let (decision, next) = bucket.take(state, 1_000_000);
        assert!(!decision.allowed);
        assert!(next.is_none());
    }

    #[test]
    fn test_full_refill_after_capacity_over_rate_seconds() {
        let bucket = TokenBucket::new(5, 0.5, 60);
        let (_, state) = drain(&bucket, None, 1_000_000);

        // 5 tokens at 0.5/s need 10 seconds
        let (admitted, _) = drain(&bucket, state, 1_000_000 + 10_000);
        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_partial_refill_is_floored() {
        let bucket = TokenBucket::new(5, 1.0, 60);
        let state = Some(BucketState {
            tokens: 0,
            last_refill_ms: 0,
        });

        let (decision, _) = bucket.take(state, 999);
        assert!(!decision.allowed);

        let (decision, next) = bucket.take(state, 2_500);
        assert!(decision.allowed);
        assert_eq!(next.unwrap().tokens, 1);
    }

    #[test]
    fn test_refill_never_exceeds_capacity() {
        let bucket = TokenBucket::new(3, 100.0, 60);
        let state = Some(BucketState {
            tokens: 1,
            last_refill_ms: 0,
        });

        let (decision, next) = bucket.take(state, 1_000_000);
        assert!(decision.allowed);
        assert_eq!(next.unwrap().tokens, 2);
    }

    #[test]
    fn test_clock_going_backwards_adds_nothing() {
        let bucket = TokenBucket::new(3, 1.0, 60);
        let state = Some(BucketState {
            tokens: 0,
            last_refill_ms: 10_000,
        });

        let (decision, _) = bucket.take(state, 5_000);
        assert!(!decision.allowed);
    }
}
