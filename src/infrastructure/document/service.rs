//! Document lifecycle service
//!
//! Owns the pairing of registry metadata with the body held in the
//! [`DocumentStore`].

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use crate::domain::document::{DocumentId, DocumentMetadata, DocumentRepository};
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

use super::store::DocumentStore;

/// Number of documents a user may own, by plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLimits {
    pub free: usize,
    pub pro: usize,
}

impl FileLimits {
    pub fn for_user(&self, user: &User) -> usize {
        if user.subscribed() {
            self.pro
        } else {
            self.free
        }
    }
}

impl Default for FileLimits {
    fn default() -> Self {
        Self { free: 3, pro: 100 }
    }
}

/// Creates, lists, renames, replaces and deletes documents
#[derive(Debug, Clone)]
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    store: DocumentStore,
    limits: FileLimits,
}

impl DocumentService {
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        store: DocumentStore,
        limits: FileLimits,
    ) -> Self {
        Self {
            repository,
            store,
            limits,
        }
    }

    /// Create an empty `{}` document named `file_name`
    pub async fn create(
        &self,
        owner: &User,
        file_name: &str,
    ) -> Result<DocumentMetadata, DomainError> {
        let limit = self.limits.for_user(owner);
        if self.repository.count_for_user(owner.id()).await? >= limit {
            return Err(DomainError::forbidden(format!(
                "json file limit of {} exceeded",
                limit
            )));
        }

        let file_name = validate_file_name(file_name)?;
        let id = DocumentId::new();

        self.store.put(owner.id(), &id, &json!({})).await?;

        let metadata = DocumentMetadata::new(
            id,
            *owner.id(),
            file_name,
            self.store.url(owner.id(), &id),
        );
        let metadata = self.repository.create(metadata).await?;

        info!(user_id = %owner.id(), document_id = %id, "Created json file");
        Ok(metadata)
    }

    pub async fn list(&self, owner: &UserId) -> Result<Vec<DocumentMetadata>, DomainError> {
        self.repository.list_for_user(owner).await
    }

    /// Resolve a document and check that `caller` owns it
    pub async fn get_owned(
        &self,
        caller: &UserId,
        id: &DocumentId,
    ) -> Result<DocumentMetadata, DomainError> {
        let metadata = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("json file not found"))?;

        if !metadata.is_owned_by(caller) {
            return Err(DomainError::forbidden("json file does not belong to user"));
        }

        Ok(metadata)
    }

    pub async fn load(&self, metadata: &DocumentMetadata) -> Result<Value, DomainError> {
        self.store.get(&metadata.user_id, &metadata.id).await
    }

    /// Persist a whole document body and bump its modified time
    pub async fn save(&self, metadata: &DocumentMetadata, value: &Value) -> Result<(), DomainError> {
        self.store.put(&metadata.user_id, &metadata.id, value).await?;
        self.repository.touch(&metadata.id).await
    }

    pub async fn rename(
        &self,
        metadata: &DocumentMetadata,
        file_name: &str,
    ) -> Result<DocumentMetadata, DomainError> {
        let file_name = validate_file_name(file_name)?;
        self.repository.rename(&metadata.id, file_name).await
    }

    /// Delete metadata, then the stored body and its cache entry
    pub async fn delete(&self, metadata: &DocumentMetadata) -> Result<(), DomainError> {
        self.repository.delete(&metadata.id).await?;
        self.store.delete(&metadata.user_id, &metadata.id).await?;

        info!(user_id = %metadata.user_id, document_id = %metadata.id, "Deleted json file");
        Ok(())
    }

    /// Delete every document of a user
    pub async fn delete_all(&self, owner: &UserId) -> Result<usize, DomainError> {
        let documents = self.repository.list_for_user(owner).await?;

        for metadata in &documents {
            self.delete(metadata).await?;
        }

        Ok(documents.len())
    }
}

fn validate_file_name(file_name: &str) -> Result<&str, DomainError> {
    let trimmed = file_name.trim();

    if trimmed.is_empty() {
        return Err(DomainError::validation("file name cannot be empty"));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::identity::ExternalIdentity;
    use crate::infrastructure::document::{InMemoryDocumentRepository, InMemoryObjectStore};

    struct Fixture {
        service: DocumentService,
        objects: Arc<InMemoryObjectStore>,
        user: User,
    }

    fn fixture(limits: FileLimits) -> Fixture {
        let objects = Arc::new(InMemoryObjectStore::new());
        let store = DocumentStore::new(objects.clone(), Arc::new(MockCache::new()));

        Fixture {
            service: DocumentService::new(
                Arc::new(InMemoryDocumentRepository::new()),
                store,
                limits,
            ),
            objects,
            user: User::from_identity(&ExternalIdentity {
                subject: "sub".to_string(),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_create_stores_empty_object() {
        let f = fixture(FileLimits::default());

        let metadata = f.service.create(&f.user, "posts").await.unwrap();

        assert_eq!(metadata.file_name, "posts");
        assert_eq!(metadata.user_id, *f.user.id());
        assert!(metadata.url.ends_with(&format!("{}/{}.json", f.user.id(), metadata.id)));
        assert_eq!(f.service.load(&metadata).await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let f = fixture(FileLimits::default());

        let result = f.service.create(&f.user, "   ").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_free_plan_limit() {
        let f = fixture(FileLimits { free: 2, pro: 5 });

        f.service.create(&f.user, "a").await.unwrap();
        f.service.create(&f.user, "b").await.unwrap();

        let result = f.service.create(&f.user, "c").await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_subscribed_users_get_pro_limit() {
        let mut f = fixture(FileLimits { free: 1, pro: 2 });
        f.user.set_subscribed(true);

        f.service.create(&f.user, "a").await.unwrap();
        f.service.create(&f.user, "b").await.unwrap();
        assert!(f.service.create(&f.user, "c").await.is_err());
    }

    #[tokio::test]
    async fn test_get_owned_checks_owner() {
        let f = fixture(FileLimits::default());
        let metadata = f.service.create(&f.user, "a").await.unwrap();

        assert!(f.service.get_owned(f.user.id(), &metadata.id).await.is_ok());

        let result = f.service.get_owned(&UserId::new(), &metadata.id).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let result = f.service.get_owned(f.user.id(), &DocumentId::new()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() {
        let f = fixture(FileLimits::default());
        let metadata = f.service.create(&f.user, "a").await.unwrap();

        f.service.save(&metadata, &json!([1, 2, 3])).await.unwrap();

        assert_eq!(f.service.load(&metadata).await.unwrap(), json!([1, 2, 3]));
        let listed = f.service.list(f.user.id()).await.unwrap();
        assert!(listed[0].updated_at >= metadata.updated_at);
    }

    #[tokio::test]
    async fn test_rename() {
        let f = fixture(FileLimits::default());
        let metadata = f.service.create(&f.user, "a").await.unwrap();

        let renamed = f.service.rename(&metadata, "b").await.unwrap();
        assert_eq!(renamed.file_name, "b");

        assert!(f.service.rename(&metadata, "").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let f = fixture(FileLimits::default());
        let a = f.service.create(&f.user, "a").await.unwrap();
        f.service.create(&f.user, "b").await.unwrap();

        assert_eq!(f.service.delete_all(f.user.id()).await.unwrap(), 2);
        assert!(f.service.list(f.user.id()).await.unwrap().is_empty());
        assert!(
            !f.objects
                .contains(&DocumentMetadata::object_key(f.user.id(), &a.id))
                .await
        );
    }
}
