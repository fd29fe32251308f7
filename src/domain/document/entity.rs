//! Document metadata entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an id taken from a request path
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::validation("file id not valid"))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry entry describing a stored document.
///
/// The JSON value itself lives in object storage under [`Self::object_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: DocumentId,
    pub user_id: UserId,
    pub file_name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentMetadata {
    pub fn new(
        id: DocumentId,
        user_id: UserId,
        file_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            user_id,
            file_name: file_name.into(),
            url: url.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// `{ownerId}/{documentId}.json`
    pub fn object_key(owner: &UserId, id: &DocumentId) -> String {
        format!("{}/{}.json", owner, id)
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let owner = UserId::from_uuid(Uuid::from_u128(7));
        let id = DocumentId::from_uuid(Uuid::from_u128(9));

        assert_eq!(
            DocumentMetadata::object_key(&owner, &id),
            "00000000-0000-0000-0000-000000000007/00000000-0000-0000-0000-000000000009.json"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = DocumentId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_ownership() {
        let owner = UserId::new();
        let doc = DocumentMetadata::new(DocumentId::new(), owner, "posts", "url");

        assert!(doc.is_owned_by(&owner));
        assert!(!doc.is_owned_by(&UserId::new()));
    }
}
