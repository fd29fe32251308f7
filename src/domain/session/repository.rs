//! Session repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::Session;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Durable registry of sessions
#[async_trait]
pub trait SessionRepository: Send + Sync + Debug {
    async fn create(&self, session: Session) -> Result<Session, DomainError>;

    async fn get(&self, id: &str) -> Result<Option<Session>, DomainError>;

    /// Move a session's expiry, returning the updated record
    async fn update_expiry(
        &self,
        id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DomainError>;

    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Drop every session owned by a user, returning their ids
    async fn delete_for_user(&self, user_id: &UserId) -> Result<Vec<String>, DomainError>;
}
