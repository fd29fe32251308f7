//! In-memory object storage

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::document::ObjectStore;
use crate::domain::DomainError;

/// Process-local ObjectStore for development and tests
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, DomainError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| DomainError::storage(format!("Object '{}' does not exist", key)))
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), DomainError> {
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}
