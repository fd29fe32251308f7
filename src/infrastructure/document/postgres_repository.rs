//! PostgreSQL document metadata repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::document::{DocumentId, DocumentMetadata, DocumentRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of DocumentRepository
#[derive(Debug, Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn create(&self, document: DocumentMetadata) -> Result<DocumentMetadata, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO json_files (id, user_id, file_name, url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.user_id.as_uuid())
        .bind(&document.file_name)
        .bind(&document.url)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create json file: {}", e)))?;

        Ok(document)
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<DocumentMetadata>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, file_name, url, created_at, updated_at
            FROM json_files
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get json file: {}", e)))?;

        Ok(row.as_ref().map(row_to_document))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<DocumentMetadata>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, file_name, url, created_at, updated_at
            FROM json_files
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list json files: {}", e)))?;

        Ok(rows.iter().map(row_to_document).collect())
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM json_files WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count json files: {}", e)))?;

        Ok(count as usize)
    }

    async fn rename(
        &self,
        id: &DocumentId,
        file_name: &str,
    ) -> Result<DocumentMetadata, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE json_files SET file_name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, file_name, url, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(file_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to rename json file: {}", e)))?
        .ok_or_else(|| DomainError::not_found("json file not found"))?;

        Ok(row_to_document(&row))
    }

    async fn touch(&self, id: &DocumentId) -> Result<(), DomainError> {
        sqlx::query("UPDATE json_files SET updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update json file: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM json_files WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete json file: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> DocumentMetadata {
    DocumentMetadata {
        id: DocumentId::from_uuid(row.get("id")),
        user_id: UserId::from_uuid(row.get("user_id")),
        file_name: row.get("file_name"),
        url: row.get("url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
