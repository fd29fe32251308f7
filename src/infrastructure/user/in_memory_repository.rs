//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::identity::ExternalIdentity;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_by_provider_id(&self, provider_id: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.provider_id() == provider_id)
            .cloned())
    }

    async fn upsert_identity(&self, identity: &ExternalIdentity) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if let Some(existing) = users
            .values_mut()
            .find(|u| u.provider_id() == identity.subject)
        {
            existing.apply_identity(identity);
            return Ok(existing.clone());
        }

        let user = User::from_identity(identity);
        users.insert(*user.id(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(DomainError::not_found(format!("User '{}' not found", user.id()))),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.users.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> ExternalIdentity {
        ExternalIdentity {
            subject: "sub-1".to_string(),
            email: email.to_string(),
            name: "Ada".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let repo = InMemoryUserRepository::new();

        let created = repo.upsert_identity(&identity("a@example.com")).await.unwrap();
        let updated = repo.upsert_identity(&identity("b@example.com")).await.unwrap();

        assert_eq!(created.id(), updated.id());
        assert_eq!(updated.email(), "b@example.com");

        let by_provider = repo.get_by_provider_id("sub-1").await.unwrap().unwrap();
        assert_eq!(by_provider.email(), "b@example.com");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.upsert_identity(&identity("a@example.com")).await.unwrap();

        user.set_subscribed(true);
        repo.update(&user).await.unwrap();
        assert!(repo.get(user.id()).await.unwrap().unwrap().subscribed());

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(repo.get(user.id()).await.unwrap().is_none());
        assert!(repo.update(&user).await.is_err());
    }
}
