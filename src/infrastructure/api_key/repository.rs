//! In-memory API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::{ApiKey, ApiKeyRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository, keyed by key hash
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<String, ApiKey>>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;

        if keys.contains_key(api_key.key_hash()) {
            return Err(DomainError::internal("API key hash collision"));
        }

        keys.insert(api_key.key_hash().to_string(), api_key.clone());
        Ok(api_key)
    }

    async fn get(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        Ok(self.keys.read().await.get(key_hash).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        let mut owned: Vec<ApiKey> = keys
            .values()
            .filter(|k| k.is_owned_by(user_id))
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }

    async fn touch_last_used(&self, key_hash: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(key) = self.keys.write().await.get_mut(key_hash) {
            key.record_usage(at);
        }
        Ok(())
    }

    async fn delete(&self, key_hash: &str) -> Result<bool, DomainError> {
        Ok(self.keys.write().await.remove(key_hash).is_some())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let mut keys = self.keys.write().await;
        let before = keys.len();
        keys.retain(|_, k| !k.is_owned_by(user_id));
        Ok(before - keys.len())
    }
}
