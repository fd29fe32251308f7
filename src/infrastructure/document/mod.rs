//! Document storage: registries, object stores, and the services over them

mod in_memory_object_store;
mod in_memory_repository;
mod postgres_repository;
mod s3_object_store;
mod service;
mod store;

pub use in_memory_object_store::InMemoryObjectStore;
pub use in_memory_repository::InMemoryDocumentRepository;
pub use postgres_repository::PostgresDocumentRepository;
pub use s3_object_store::{S3Config, S3ObjectStore};
pub use service::{DocumentService, FileLimits};
pub use store::{DocumentStore, DOCUMENT_CACHE_TTL};
