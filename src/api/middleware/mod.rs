//! API middleware and request extractors
//!
//! Request pipeline: rate limit, authenticate, resolve the document,
//! load its content. Each stage rejects before the next one runs.

pub mod auth;
pub mod document;
pub mod metrics;
pub mod rate_limit;

pub use auth::{Caller, RequireApiKey, RequireSession};
pub use document::{DocumentContext, OwnedDocument};
pub use metrics::metrics_middleware;
pub use rate_limit::{public_rate_limit, web_rate_limit};
