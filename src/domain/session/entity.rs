//! Session entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::user::UserId;

/// How long a new or extended session stays valid
pub const SESSION_VALIDITY: Duration = Duration::days(30);

/// Sessions expiring sooner than this are extended on validation
pub const SESSION_RENEWAL_WINDOW: Duration = Duration::days(15);

/// Hex-encoded SHA-256 of a raw credential.
///
/// Raw session tokens and API keys are never stored; only this hash is.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Server-side record of a web login, addressed by the hash of its token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Hash of the raw token
    pub id: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session valid for [`SESSION_VALIDITY`] from `now`
    pub fn new(id: impl Into<String>, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id,
            expires_at: now + SESSION_VALIDITY,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// True when the session is inside the renewal window
    pub fn needs_renewal(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now + SESSION_RENEWAL_WINDOW
    }

    /// Cache TTL: time to expiry plus one hour of slack
    pub fn cache_ttl(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.expires_at - now + Duration::hours(1))
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(1))
    }
}
