//! Infrastructure layer - adapters for the domain traits and the services built on them

pub mod api_key;
pub mod cache;
pub mod document;
pub mod identity;
pub mod logging;
pub mod observability;
pub mod rate_limit;
pub mod session;
pub mod storage;
pub mod subscription;
pub mod user;
