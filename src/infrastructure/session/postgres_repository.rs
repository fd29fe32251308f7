//! PostgreSQL session repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::session::{Session, SessionRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of SessionRepository
#[derive(Debug, Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        sqlx::query("INSERT INTO user_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&session.id)
            .bind(session.user_id.as_uuid())
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create session: {}", e)))?;

        Ok(session)
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query("SELECT id, user_id, expires_at FROM user_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get session: {}", e)))?;

        Ok(row.map(|row| Session {
            id: row.get("id"),
            user_id: UserId::from_uuid(row.get("user_id")),
            expires_at: row.get("expires_at"),
        }))
    }

    async fn update_expiry(
        &self,
        id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE user_sessions SET expires_at = $2
            WHERE id = $1
            RETURNING id, user_id, expires_at
            "#,
        )
        .bind(id)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to extend session: {}", e)))?
        .ok_or_else(|| DomainError::unauthorized("session not found"))?;

        Ok(Session {
            id: row.get("id"),
            user_id: UserId::from_uuid(row.get("user_id")),
            expires_at: row.get("expires_at"),
        })
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar("DELETE FROM user_sessions WHERE user_id = $1 RETURNING id")
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user sessions: {}", e)))
    }
}
