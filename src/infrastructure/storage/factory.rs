//! Storage factory for runtime registry and object store selection

use std::sync::Arc;

use tracing::info;

use crate::domain::api_key::ApiKeyRepository;
use crate::domain::document::{DocumentRepository, ObjectStore};
use crate::domain::session::SessionRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::api_key::{InMemoryApiKeyRepository, PostgresApiKeyRepository};
use crate::infrastructure::document::{
    InMemoryDocumentRepository, InMemoryObjectStore, PostgresDocumentRepository, S3Config,
    S3ObjectStore,
};
use crate::infrastructure::session::{InMemorySessionRepository, PostgresSessionRepository};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::migrations::run_migrations;
use super::postgres::{connect, PostgresConfig};

/// Supported registry backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Object storage configuration for document bodies
#[derive(Debug, Clone)]
pub enum ObjectStorageConfig {
    InMemory,
    S3(S3Config),
}

/// Durable registries for users, sessions, API keys and document metadata
#[derive(Debug, Clone)]
pub struct Registries {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub documents: Arc<dyn DocumentRepository>,
}

impl Registries {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            api_keys: Arc::new(InMemoryApiKeyRepository::new()),
            documents: Arc::new(InMemoryDocumentRepository::new()),
        }
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build every registry on the configured backend, migrating Postgres first
    pub async fn create(config: &StorageConfig) -> Result<Registries, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory registries");
                Ok(Registries::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect(pg_config).await?;
                run_migrations(&pool).await?;

                Ok(Registries {
                    users: Arc::new(PostgresUserRepository::new(pool.clone())),
                    sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
                    api_keys: Arc::new(PostgresApiKeyRepository::new(pool.clone())),
                    documents: Arc::new(PostgresDocumentRepository::new(pool)),
                })
            }
        }
    }

    pub async fn create_object_store(
        config: &ObjectStorageConfig,
    ) -> Result<Arc<dyn ObjectStore>, DomainError> {
        match config {
            ObjectStorageConfig::InMemory => {
                info!("Using in-memory object storage");
                Ok(Arc::new(InMemoryObjectStore::new()))
            }
            ObjectStorageConfig::S3(s3_config) => {
                Ok(Arc::new(S3ObjectStore::connect(s3_config).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::ExternalIdentity;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(
            StorageType::from_str("memory"),
            Some(StorageType::InMemory)
        );
        assert_eq!(
            StorageType::from_str("in_memory"),
            Some(StorageType::InMemory)
        );
        assert_eq!(
            StorageType::from_str("postgresql"),
            Some(StorageType::Postgres)
        );
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("unknown"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(
            StorageConfig::in_memory().storage_type(),
            StorageType::InMemory
        );

        let postgres = StorageConfig::postgres(
            PostgresConfig::new("postgres://localhost/test").with_max_connections(20),
        );
        assert_eq!(postgres.storage_type(), StorageType::Postgres);

        if let StorageConfig::Postgres(pg_config) = postgres {
            assert_eq!(pg_config.max_connections, 20);
        } else {
            panic!("Expected Postgres config");
        }
    }

    #[tokio::test]
    async fn test_create_in_memory_registries() {
        let registries = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();

        let user = registries
            .users
            .upsert_identity(&ExternalIdentity {
                subject: "sub".to_string(),
                email: "a@example.com".to_string(),
                name: "A".to_string(),
            })
            .await
            .unwrap();

        assert!(registries.users.get(user.id()).await.unwrap().is_some());
        assert_eq!(registries.documents.count_for_user(user.id()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_in_memory_object_store() {
        let store = StorageFactory::create_object_store(&ObjectStorageConfig::InMemory)
            .await
            .unwrap();

        store.put("a/b.json", bytes::Bytes::from_static(b"{}")).await.unwrap();
        assert_eq!(store.get("a/b.json").await.unwrap().as_ref(), b"{}");
    }
}
