//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::identity::ExternalIdentity;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str =
    "id, provider_id, email, name, stripe_customer_id, subscribed, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_provider_id(&self, provider_id: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE provider_id = $1",
            USER_COLUMNS
        ))
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by provider id: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn upsert_identity(&self, identity: &ExternalIdentity) -> Result<User, DomainError> {
        let candidate = User::from_identity(identity);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, provider_id, email, name, subscribed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, $5, $5)
            ON CONFLICT (provider_id)
            DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name, updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(candidate.id().as_uuid())
        .bind(candidate.provider_id())
        .bind(candidate.email())
        .bind(candidate.name())
        .bind(candidate.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to upsert user: {}", e)))?;

        row_to_user(&row)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, stripe_customer_id = $4, subscribed = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.name())
        .bind(user.stripe_customer_id())
        .bind(user.subscribed())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", user.id())));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Invalid user row: {}", e)))?;

    Ok(User::restore(
        UserId::from_uuid(id),
        row.get("provider_id"),
        row.get("email"),
        row.get("name"),
        row.get("stripe_customer_id"),
        row.get("subscribed"),
        row.get("created_at"),
        row.get("updated_at"),
    ))
}
