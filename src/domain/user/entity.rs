//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::ExternalIdentity;

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person who signed in through the external identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Stable subject id issued by the identity provider
    provider_id: String,
    email: String,
    name: String,
    /// Billing provider customer reference
    #[serde(skip_serializing_if = "Option::is_none")]
    stripe_customer_id: Option<String>,
    subscribed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user from a freshly exchanged identity
    pub fn from_identity(identity: &ExternalIdentity) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            provider_id: identity.subject.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            stripe_customer_id: None,
            subscribed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored columns
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        provider_id: String,
        email: String,
        name: String,
        stripe_customer_id: Option<String>,
        subscribed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            provider_id,
            email,
            name,
            stripe_customer_id,
            subscribed,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stripe_customer_id(&self) -> Option<&str> {
        self.stripe_customer_id.as_deref()
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Refresh profile fields from a later login
    pub fn apply_identity(&mut self, identity: &ExternalIdentity) {
        self.email = identity.email.clone();
        self.name = identity.name.clone();
        self.updated_at = Utc::now();
    }

    pub fn set_stripe_customer_id(&mut self, customer_id: impl Into<String>) {
        self.stripe_customer_id = Some(customer_id.into());
        self.updated_at = Utc::now();
    }

    pub fn set_subscribed(&mut self, subscribed: bool) {
        self.subscribed = subscribed;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ExternalIdentity {
        ExternalIdentity {
            subject: "google-sub-1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
        }
    }

    #[test]
    fn test_from_identity() {
        let user = User::from_identity(&identity());

        assert_eq!(user.provider_id(), "google-sub-1");
        assert_eq!(user.email(), "ada@example.com");
        assert!(!user.subscribed());
        assert!(user.stripe_customer_id().is_none());
    }

    #[test]
    fn test_apply_identity_keeps_id() {
        let mut user = User::from_identity(&identity());
        let id = *user.id();

        user.apply_identity(&ExternalIdentity {
            subject: "google-sub-1".to_string(),
            email: "ada@lovelace.dev".to_string(),
            name: "Ada L".to_string(),
        });

        assert_eq!(*user.id(), id);
        assert_eq!(user.email(), "ada@lovelace.dev");
        assert_eq!(user.name(), "Ada L");
    }

    #[test]
    fn test_serialization_skips_missing_customer() {
        let user = User::from_identity(&identity());
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("stripe_customer_id").is_none());
        assert_eq!(json["subscribed"], false);
    }
}
