//! Rate limiter service

mod limiter;

pub use limiter::{RateLimitScope, RateLimiter};
