//! In-memory session repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::session::{Session, SessionRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of SessionRepository
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn update_expiry(
        &self,
        id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| DomainError::unauthorized("session not found"))?;

        session.expires_at = expires_at;
        Ok(session.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<Vec<String>, DomainError> {
        let mut sessions = self.sessions.write().await;
        let ids: Vec<String> = sessions
            .values()
            .filter(|s| &s.user_id == user_id)
            .map(|s| s.id.clone())
            .collect();

        for id in &ids {
            sessions.remove(id);
        }

        Ok(ids)
    }
}
