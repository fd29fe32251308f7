//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::api_key::{ApiKey, ApiKeyRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of ApiKeyRepository
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (key_hash, user_id, created_at, last_used_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(api_key.key_hash())
        .bind(api_key.user_id().as_uuid())
        .bind(api_key.created_at())
        .bind(api_key.last_used_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create API key: {}", e)))?;

        Ok(api_key)
    }

    async fn get(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(
            "SELECT key_hash, user_id, created_at, last_used_at FROM api_keys WHERE key_hash = $1",
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        Ok(row.as_ref().map(row_to_api_key))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT key_hash, user_id, created_at, last_used_at
            FROM api_keys
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        Ok(rows.iter().map(row_to_api_key).collect())
    }

    async fn touch_last_used(&self, key_hash: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE api_keys SET last_used_at = $2 WHERE key_hash = $1")
            .bind(key_hash)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record API key usage: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, key_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE key_hash = $1")
            .bind(key_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API keys: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}

fn row_to_api_key(row: &sqlx::postgres::PgRow) -> ApiKey {
    ApiKey::restore(
        row.get("key_hash"),
        UserId::from_uuid(row.get("user_id")),
        row.get("created_at"),
        row.get("last_used_at"),
    )
}
