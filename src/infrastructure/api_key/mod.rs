//! API Key infrastructure implementations
//!
//! Key generation, registry implementations and the validation service.

mod generator;
mod postgres_repository;
mod repository;
mod service;

pub use generator::{ApiKeyGenerator, GeneratedApiKey};
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, CreateApiKeyResult};
