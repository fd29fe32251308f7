//! In-memory document metadata repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::document::{DocumentId, DocumentMetadata, DocumentRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of DocumentRepository
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: Arc<RwLock<HashMap<DocumentId, DocumentMetadata>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: DocumentMetadata) -> Result<DocumentMetadata, DomainError> {
        self.documents
            .write()
            .await
            .insert(document.id, document.clone());
        Ok(document)
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<DocumentMetadata>, DomainError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<DocumentMetadata>, DomainError> {
        let documents = self.documents.read().await;
        let mut owned: Vec<DocumentMetadata> = documents
            .values()
            .filter(|d| d.is_owned_by(user_id))
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn rename(
        &self,
        id: &DocumentId,
        file_name: &str,
    ) -> Result<DocumentMetadata, DomainError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("json file not found"))?;

        document.file_name = file_name.to_string();
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn touch(&self, id: &DocumentId) -> Result<(), DomainError> {
        if let Some(document) = self.documents.write().await.get_mut(id) {
            document.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        Ok(self.documents.write().await.remove(id).is_some())
    }
}
