//! API key entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Long-lived credential for the public API, stored only as a hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    key_hash: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn new(key_hash: impl Into<String>, user_id: UserId) -> Self {
        Self {
            key_hash: key_hash.into(),
            user_id,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    pub fn restore(
        key_hash: String,
        user_id: UserId,
        created_at: DateTime<Utc>,
        last_used_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            key_hash,
            user_id,
            created_at,
            last_used_at,
        }
    }

    pub fn key_hash(&self) -> &str {
        &self.key_hash
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn record_usage(&mut self, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
    }
}
