//! API key repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::ApiKey;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Durable registry of API keys
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Look up a key by the hash of its secret
    async fn get(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError>;

    async fn touch_last_used(&self, key_hash: &str, at: DateTime<Utc>) -> Result<(), DomainError>;

    async fn delete(&self, key_hash: &str) -> Result<bool, DomainError>;

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, DomainError>;
}
