//! Read/write-through document store
//!
//! Object storage is the source of truth. The shared cache holds the same
//! serialized bytes under `json:{owner}:{document}` for 24 hours and is
//! refreshed on every write. Cache failures never fail an operation.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::cache::{Cache, CacheKeys};
use crate::domain::document::{DocumentId, DocumentMetadata, ObjectStore};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_document_cache, CacheLookup};

/// TTL of cached document bodies
pub const DOCUMENT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Loads and persists whole JSON documents
#[derive(Debug, Clone)]
pub struct DocumentStore {
    objects: Arc<dyn ObjectStore>,
    cache: Arc<dyn Cache>,
}

impl DocumentStore {
    pub fn new(objects: Arc<dyn ObjectStore>, cache: Arc<dyn Cache>) -> Self {
        Self { objects, cache }
    }

    /// Load a document, preferring the cache
    pub async fn get(&self, owner: &UserId, id: &DocumentId) -> Result<Value, DomainError> {
        let cache_key = CacheKeys::document(owner.as_uuid(), id.as_uuid());

        match self.cache.get_raw(&cache_key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    record_document_cache(CacheLookup::Hit);
                    return Ok(value);
                }
                Err(e) => {
                    record_document_cache(CacheLookup::Error);
                    warn!(document_id = %id, error = %e, "Discarding corrupt cached document");
                }
            },
            Ok(None) => {
                record_document_cache(CacheLookup::Miss);
                debug!(document_id = %id, "Document cache miss");
            }
            Err(e) => {
                record_document_cache(CacheLookup::Error);
                warn!(document_id = %id, error = %e, "Document cache read failed");
            }
        }

        let object_key = DocumentMetadata::object_key(owner, id);
        let body = self.objects.get(&object_key).await.inspect_err(|e| {
            error!(document_id = %id, error = %e, "Failed to read document from object storage");
        })?;

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            DomainError::storage(format!("Stored document '{}' is not valid JSON: {}", id, e))
        })?;

        self.cache_body(&cache_key, &body).await;
        Ok(value)
    }

    /// Persist a whole document, then refresh the cache
    pub async fn put(
        &self,
        owner: &UserId,
        id: &DocumentId,
        value: &Value,
    ) -> Result<(), DomainError> {
        let body = serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| DomainError::internal(format!("Failed to serialize document: {}", e)))?;

        let object_key = DocumentMetadata::object_key(owner, id);
        self.objects.put(&object_key, body.clone()).await.inspect_err(|e| {
            error!(document_id = %id, error = %e, "Failed to write document to object storage");
        })?;

        let cache_key = CacheKeys::document(owner.as_uuid(), id.as_uuid());
        self.cache_body(&cache_key, &body).await;
        Ok(())
    }

    /// Remove a document from object storage and the cache
    pub async fn delete(&self, owner: &UserId, id: &DocumentId) -> Result<(), DomainError> {
        let object_key = DocumentMetadata::object_key(owner, id);
        self.objects.delete(&object_key).await?;

        let cache_key = CacheKeys::document(owner.as_uuid(), id.as_uuid());
        if let Err(e) = self.cache.delete(&cache_key).await {
            warn!(document_id = %id, error = %e, "Failed to remove document from cache");
        }

        Ok(())
    }

    /// Public location of a document body
    pub fn url(&self, owner: &UserId, id: &DocumentId) -> String {
        self.objects.url(&DocumentMetadata::object_key(owner, id))
    }

    async fn cache_body(&self, cache_key: &str, body: &[u8]) {
        let raw = String::from_utf8_lossy(body);

        if let Err(e) = self.cache.set_raw(cache_key, &raw, DOCUMENT_CACHE_TTL).await {
            warn!(error = %e, "Failed to cache document");
        }
    }
}
