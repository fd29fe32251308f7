//! API key generation
//!
//! Keys are 32 bytes of OS randomness, hex-encoded for the caller. Only
//! the SHA-256 of the encoded key is stored.

use rand::RngCore;

use crate::domain::session::hash_token;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once at creation)
    pub key: String,
    /// The hashed key for storage
    pub hash: String,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    key_bytes: usize,
}

impl ApiKeyGenerator {
    pub fn new() -> Self {
        Self { key_bytes: 32 }
    }

    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let key = hex::encode(&random_bytes);
        let hash = Self::hash_key(&key);

        GeneratedApiKey { key, hash }
    }

    /// Hash an API key for storage and lookup
    pub fn hash_key(key: &str) -> String {
        hash_token(key)
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
