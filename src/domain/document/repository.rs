//! Document metadata repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{DocumentId, DocumentMetadata};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Durable registry of document metadata
#[async_trait]
pub trait DocumentRepository: Send + Sync + Debug {
    async fn create(&self, document: DocumentMetadata) -> Result<DocumentMetadata, DomainError>;

    async fn get(&self, id: &DocumentId) -> Result<Option<DocumentMetadata>, DomainError>;

    /// Documents owned by a user, most recently modified first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<DocumentMetadata>, DomainError>;

    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        Ok(self.list_for_user(user_id).await?.len())
    }

    async fn rename(
        &self,
        id: &DocumentId,
        file_name: &str,
    ) -> Result<DocumentMetadata, DomainError>;

    /// Bump the modified time after the body changed
    async fn touch(&self, id: &DocumentId) -> Result<(), DomainError>;

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError>;
}
