//! Subscription snapshot service

use std::sync::Arc;

use tracing::info;

use crate::domain::cache::{Cache, CacheExt, CacheKeys};
use crate::domain::subscription::SubscriptionSnapshot;
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// Reads and records the billing state of users
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    cache: Arc<dyn Cache>,
    users: Arc<dyn UserRepository>,
}

impl SubscriptionService {
    pub fn new(cache: Arc<dyn Cache>, users: Arc<dyn UserRepository>) -> Self {
        Self { cache, users }
    }

    /// Cached snapshot for a billing customer, if one was ever synced
    pub async fn status(
        &self,
        customer_id: &str,
    ) -> Result<Option<SubscriptionSnapshot>, DomainError> {
        self.cache.get(&CacheKeys::subscription(customer_id)).await
    }

    /// Store a fresh snapshot and mirror its active flag onto the user
    pub async fn sync(
        &self,
        user: &User,
        snapshot: &SubscriptionSnapshot,
    ) -> Result<User, DomainError> {
        let customer_id = user.stripe_customer_id().ok_or_else(|| {
            DomainError::validation("user has no billing customer")
        })?;

        let data = serde_json::to_string(snapshot).map_err(|e| {
            DomainError::internal(format!("Failed to serialize subscription: {}", e))
        })?;
        self.cache
            .set_raw_persistent(&CacheKeys::subscription(customer_id), &data)
            .await?;

        let mut updated = user.clone();
        updated.set_subscribed(snapshot.is_active());
        let updated = self.users.update(&updated).await?;

        info!(
            user_id = %updated.id(),
            status = %snapshot.status,
            "Synced subscription"
        );

        Ok(updated)
    }
}
