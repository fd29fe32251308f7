//! Cache key layout shared by every tier that talks to the cache

use uuid::Uuid;

/// Builds the keys under which cached state is stored.
///
/// The layout is shared with anything else reading the same Redis instance,
/// so these formats must stay stable.
pub struct CacheKeys;

impl CacheKeys {
    /// `session:{sessionHash}`
    pub fn session(session_hash: &str) -> String {
        format!("session:{}", session_hash)
    }

    /// `json:{ownerId}:{documentId}`
    pub fn document(owner_id: &Uuid, document_id: &Uuid) -> String {
        format!("json:{}:{}", owner_id, document_id)
    }

    /// `rate_limit:{clientKey}:tokens`
    pub fn rate_limit_tokens(client_key: &str) -> String {
        format!("rate_limit:{}:tokens", client_key)
    }

    /// `rate_limit:{clientKey}:last_access`
    pub fn rate_limit_last_access(client_key: &str) -> String {
        format!("rate_limit:{}:last_access", client_key)
    }

    /// `stripe:customer:{customerId}`
    pub fn subscription(customer_id: &str) -> String {
        format!("stripe:customer:{}", customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_layout() {
        let owner = Uuid::nil();
        let doc = Uuid::from_u128(1);

        assert_eq!(
            CacheKeys::document(&owner, &doc),
            "json:00000000-0000-0000-0000-000000000000:00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn test_rate_limit_keys() {
        assert_eq!(
            CacheKeys::rate_limit_tokens("10.0.0.1"),
            "rate_limit:10.0.0.1:tokens"
        );
        assert_eq!(
            CacheKeys::rate_limit_last_access("10.0.0.1"),
            "rate_limit:10.0.0.1:last_access"
        );
    }

    #[test]
    fn test_session_and_subscription_keys() {
        assert_eq!(CacheKeys::session("abc"), "session:abc");
        assert_eq!(CacheKeys::subscription("cus_1"), "stripe:customer:cus_1");
    }
}
