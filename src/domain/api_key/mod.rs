//! API key domain

mod entity;
mod repository;

pub use entity::ApiKey;
pub use repository::ApiKeyRepository;
