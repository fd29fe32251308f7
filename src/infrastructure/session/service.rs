//! Session lifecycle service
//!
//! Sessions are durable in the registry and mirrored in the shared cache.
//! Cache reads and writes are best-effort: a failure is logged and the
//! request continues on the durable path.

use std::sync::Arc;

use chrono::Utc;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::domain::cache::{Cache, CacheExt, CacheKeys};
use crate::domain::session::{hash_token, Session, SessionRepository, SESSION_VALIDITY};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

const SESSION_TOKEN_BYTES: usize = 32;

/// A newly started session
#[derive(Debug)]
pub struct CreatedSession {
    /// Raw token handed to the client, never stored
    pub token: String,
    pub session: Session,
}

/// Creates, validates, extends and invalidates sessions
#[derive(Debug, Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            sessions,
            users,
            cache,
        }
    }

    /// Start a session for a user
    pub async fn create(&self, user_id: &UserId) -> Result<CreatedSession, DomainError> {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let session = Session::new(hash_token(&token), *user_id, Utc::now());
        let session = self.sessions.create(session).await?;

        self.cache_session(&session).await;

        info!(user_id = %user_id, "Created session");
        Ok(CreatedSession { token, session })
    }

    /// Resolve a raw token to its session and user.
    ///
    /// Expired sessions are invalidated and rejected. Sessions inside the
    /// renewal window are extended to a fresh validity period.
    pub async fn validate(&self, token: &str) -> Result<(Session, User), DomainError> {
        let session_hash = hash_token(token);
        let session = self.load(&session_hash).await?;
        let now = Utc::now();

        if session.is_expired(now) {
            debug!(user_id = %session.user_id, "Session expired");
            self.invalidate(&session_hash).await?;
            return Err(DomainError::unauthorized("session expired"));
        }

        let session = if session.needs_renewal(now) {
            let extended = self
                .sessions
                .update_expiry(&session.id, now + SESSION_VALIDITY)
                .await?;
            self.cache_session(&extended).await;
            debug!(user_id = %extended.user_id, "Extended session");
            extended
        } else {
            session
        };

        let user = self
            .users
            .get(&session.user_id)
            .await?
            .ok_or_else(|| DomainError::unauthorized("user not found"))?;

        Ok((session, user))
    }

    /// Remove a session by the hash of its token
    pub async fn invalidate(&self, session_hash: &str) -> Result<(), DomainError> {
        self.sessions.delete(session_hash).await?;
        self.evict(session_hash).await;
        Ok(())
    }

    /// Remove every session of a user
    pub async fn invalidate_all(&self, user_id: &UserId) -> Result<(), DomainError> {
        let removed = self.sessions.delete_for_user(user_id).await?;

        for session_hash in &removed {
            self.evict(session_hash).await;
        }

        info!(user_id = %user_id, count = removed.len(), "Invalidated sessions");
        Ok(())
    }

    async fn load(&self, session_hash: &str) -> Result<Session, DomainError> {
        let key = CacheKeys::session(session_hash);

        match self.cache.get::<Session>(&key).await {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Session cache read failed, using registry"),
        }

        let session = self
            .sessions
            .get(session_hash)
            .await?
            .ok_or_else(|| DomainError::unauthorized("session not found"))?;

        self.cache_session(&session).await;
        Ok(session)
    }

    async fn cache_session(&self, session: &Session) {
        let key = CacheKeys::session(&session.id);
        let ttl = session.cache_ttl(Utc::now());

        if let Err(e) = self.cache.set(&key, session, ttl).await {
            warn!(error = %e, "Failed to cache session");
        }
    }

    async fn evict(&self, session_hash: &str) {
        if let Err(e) = self.cache.delete(&CacheKeys::session(session_hash)).await {
            warn!(error = %e, "Failed to remove session from cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::identity::ExternalIdentity;
    use crate::infrastructure::session::InMemorySessionRepository;
    use crate::infrastructure::user::InMemoryUserRepository;
    use chrono::{DateTime, Duration};

    struct Fixture {
        service: SessionService,
        sessions: Arc<InMemorySessionRepository>,
        cache: Arc<MockCache>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let cache = Arc::new(MockCache::new());

        let user = users
            .upsert_identity(&ExternalIdentity {
                subject: "sub".to_string(),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            })
            .await
            .unwrap();

        Fixture {
            service: SessionService::new(sessions.clone(), users, cache.clone()),
            sessions,
            cache,
            user,
        }
    }

    async fn seed(fixture: &Fixture, token: &str, expires_at: DateTime<Utc>) {
        fixture
            .sessions
            .create(Session {
                id: hash_token(token),
                user_id: *fixture.user.id(),
                expires_at,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_stores_only_hash() {
        let f = fixture().await;
        let created = f.service.create(f.user.id()).await.unwrap();

        assert_eq!(created.token.len(), 64);
        assert_eq!(created.session.id, hash_token(&created.token));
        assert!(f.sessions.get(&created.token).await.unwrap().is_none());
        assert!(f.sessions.get(&created.session.id).await.unwrap().is_some());

        let key = CacheKeys::session(&created.session.id);
        assert!(f.cache.peek(&key).is_some());
        assert!(f.cache.peek_ttl(&key).unwrap() > SESSION_VALIDITY.to_std().unwrap());
    }

    #[tokio::test]
    async fn test_validate_round_trip() {
        let f = fixture().await;
        let created = f.service.create(f.user.id()).await.unwrap();

        let (session, user) = f.service.validate(&created.token).await.unwrap();

        assert_eq!(session, created.session);
        assert_eq!(user.id(), f.user.id());
    }

    #[tokio::test]
    async fn test_validate_far_from_expiry_leaves_expiry_unchanged() {
        let f = fixture().await;
        let expires_at = Utc::now() + Duration::days(20);
        seed(&f, "token", expires_at).await;

        let (session, _) = f.service.validate("token").await.unwrap();

        assert_eq!(session.expires_at, expires_at);
    }

    #[tokio::test]
    async fn test_validate_near_expiry_extends() {
        let f = fixture().await;
        seed(&f, "token", Utc::now() + Duration::days(10)).await;

        let (session, _) = f.service.validate("token").await.unwrap();

        assert!(session.expires_at > Utc::now() + Duration::days(29));
        let stored = f.sessions.get(&hash_token("token")).await.unwrap().unwrap();
        assert_eq!(stored.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_validate_expired_invalidates() {
        let f = fixture().await;
        seed(&f, "token", Utc::now() - Duration::minutes(1)).await;

        let result = f.service.validate("token").await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
        assert!(f.sessions.get(&hash_token("token")).await.unwrap().is_none());
        assert!(f.cache.peek(&CacheKeys::session(&hash_token("token"))).is_none());
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let f = fixture().await;

        let result = f.service.validate("nope").await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_falls_back_to_registry() {
        let f = fixture().await;
        seed(&f, "token", Utc::now() + Duration::days(20)).await;
        let key = CacheKeys::session(&hash_token("token"));
        f.cache.set_raw(&key, "{broken", std::time::Duration::from_secs(60)).await.unwrap();

        let (session, _) = f.service.validate("token").await.unwrap();

        assert_eq!(session.id, hash_token("token"));
        assert!(f.cache.peek(&key).unwrap().starts_with('{'));
        assert_ne!(f.cache.peek(&key).unwrap(), "{broken");
    }

    #[tokio::test]
    async fn test_cache_outage_is_not_fatal() {
        let f = fixture().await;
        f.cache.set_error(Some("redis down".to_string()));

        let created = f.service.create(f.user.id()).await.unwrap();
        f.service.validate(&created.token).await.unwrap();
        f.service.invalidate(&created.session.id).await.unwrap();

        assert!(f.sessions.get(&created.session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let f = fixture().await;
        let first = f.service.create(f.user.id()).await.unwrap();
        let second = f.service.create(f.user.id()).await.unwrap();

        f.service.invalidate_all(f.user.id()).await.unwrap();

        assert!(f.service.validate(&first.token).await.is_err());
        assert!(f.service.validate(&second.token).await.is_err());
    }
}
