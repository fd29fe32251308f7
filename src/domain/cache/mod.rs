//! Cache domain - Shared key-value cache abstraction

mod key;
mod repository;

pub use key::CacheKeys;
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
