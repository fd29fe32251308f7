//! Durable object storage seam

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Durable blob storage holding document bodies.
///
/// A missing object is reported as a storage error: metadata says the
/// document exists, so absence here is a backing-service fault.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Bytes, DomainError>;

    async fn put(&self, key: &str, body: Bytes) -> Result<(), DomainError>;

    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Public location of an object, recorded in document metadata
    fn url(&self, key: &str) -> String;
}
