//! API Key service
//!
//! Issues and validates long-lived keys for the public API. There is no
//! cache tier: every validation is one registry lookup.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::api_key::{ApiKey, ApiKeyRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Result of creating a new API key
#[derive(Debug)]
pub struct CreateApiKeyResult {
    pub api_key: ApiKey,
    /// The full secret key (only returned once)
    pub secret: String,
}

/// API Key service for managing API keys
#[derive(Debug, Clone)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    generator: ApiKeyGenerator,
}

impl ApiKeyService {
    pub fn new(repository: Arc<dyn ApiKeyRepository>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Issue a new key owned by `user_id`
    pub async fn create(&self, user_id: &UserId) -> Result<CreateApiKeyResult, DomainError> {
        let generated = self.generator.generate();
        let api_key = self
            .repository
            .create(ApiKey::new(generated.hash, *user_id))
            .await?;

        info!(user_id = %user_id, "Created API key");

        Ok(CreateApiKeyResult {
            api_key,
            secret: generated.key,
        })
    }

    /// Resolve a raw key to its owner.
    ///
    /// The last-used timestamp is updated in the background; failures
    /// there are logged and never fail the request.
    pub async fn validate(&self, raw_key: &str) -> Result<UserId, DomainError> {
        let key_hash = ApiKeyGenerator::hash_key(raw_key);

        let api_key = self
            .repository
            .get(&key_hash)
            .await?
            .ok_or_else(|| DomainError::unauthorized("api key not valid"))?;

        debug!(user_id = %api_key.user_id(), "Validated API key");

        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            if let Err(e) = repository.touch_last_used(&key_hash, Utc::now()).await {
                warn!(error = %e, "Failed to record API key usage");
            }
        });

        Ok(*api_key.user_id())
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list_for_user(user_id).await
    }

    /// Delete a key after checking it belongs to `user_id`
    pub async fn delete(&self, user_id: &UserId, key_hash: &str) -> Result<(), DomainError> {
        let api_key = self
            .repository
            .get(key_hash)
            .await?
            .ok_or_else(|| DomainError::not_found("api key not found"))?;

        if !api_key.is_owned_by(user_id) {
            return Err(DomainError::forbidden("api key does not belong to user"));
        }

        self.repository.delete(key_hash).await?;
        info!(user_id = %user_id, "Deleted API key");
        Ok(())
    }

    /// Remove every key of a user
    pub async fn delete_all(&self, user_id: &UserId) -> Result<usize, DomainError> {
        self.repository.delete_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;
    use std::time::Duration;

    fn create_service() -> (ApiKeyService, Arc<InMemoryApiKeyRepository>) {
        let repository = Arc::new(InMemoryApiKeyRepository::new());
        (ApiKeyService::new(repository.clone()), repository)
    }

    #[tokio::test]
    async fn test_create_stores_hash_only() {
        let (service, repository) = create_service();
        let owner = UserId::new();

        let created = service.create(&owner).await.unwrap();

        assert!(repository.get(&created.secret).await.unwrap().is_none());
        let stored = repository
            .get(created.api_key.key_hash())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_owned_by(&owner));
    }

    #[tokio::test]
    async fn test_validate_api_key() {
        let (service, repository) = create_service();
        let owner = UserId::new();
        let created = service.create(&owner).await.unwrap();

        let resolved = service.validate(&created.secret).await.unwrap();
        assert_eq!(resolved, owner);

        // usage is recorded in the background
        let mut touched = false;
        for _ in 0..50 {
            let stored = repository
                .get(created.api_key.key_hash())
                .await
                .unwrap()
                .unwrap();
            if stored.last_used_at().is_some() {
                touched = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(touched);
    }

    #[tokio::test]
    async fn test_validate_invalid_key() {
        let (service, _) = create_service();

        let result = service.validate("deadbeef").await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let (service, _) = create_service();
        let owner = UserId::new();
        let created = service.create(&owner).await.unwrap();
        let hash = created.api_key.key_hash().to_string();

        let result = service.delete(&UserId::new(), &hash).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        service.delete(&owner, &hash).await.unwrap();
        assert!(service.validate(&created.secret).await.is_err());

        let result = service.delete(&owner, &hash).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_and_delete_all() {
        let (service, _) = create_service();
        let owner = UserId::new();
        let other = UserId::new();

        service.create(&owner).await.unwrap();
        service.create(&owner).await.unwrap();
        service.create(&other).await.unwrap();

        assert_eq!(service.list(&owner).await.unwrap().len(), 2);
        assert_eq!(service.delete_all(&owner).await.unwrap(), 2);
        assert!(service.list(&owner).await.unwrap().is_empty());
        assert_eq!(service.list(&other).await.unwrap().len(), 1);
    }
}
