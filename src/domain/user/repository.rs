//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::identity::ExternalIdentity;
use crate::domain::DomainError;

/// Durable registry of users
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by the identity provider's subject id
    async fn get_by_provider_id(&self, provider_id: &str) -> Result<Option<User>, DomainError>;

    /// Insert the user on first login, or refresh email/name on later ones
    async fn upsert_identity(&self, identity: &ExternalIdentity) -> Result<User, DomainError>;

    /// Persist mutable fields (billing reference, subscription flag)
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;
}
