//! Application state for shared services

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::cache::Cache;
use crate::domain::document::ObjectStore;
use crate::domain::identity::IdentityProvider;
use crate::domain::user::UserRepository;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::cache::CacheBackend;
use crate::infrastructure::document::{DocumentService, DocumentStore};
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::session::SessionService;
use crate::infrastructure::storage::Registries;
use crate::infrastructure::subscription::SubscriptionService;

/// Cookie and redirect settings of the web API
#[derive(Debug, Clone)]
pub struct WebSettings {
    /// Browser client origin; login redirects land on `{client_url}/app`
    pub client_url: String,
    pub cookie_name: String,
    pub secure_cookies: bool,
}

impl WebSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client_url: config.server.client_url.trim_end_matches('/').to_string(),
            cookie_name: config.session.cookie_name.clone(),
            secure_cookies: config.session.secure_cookies,
        }
    }
}

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<SessionService>,
    pub api_keys: Arc<ApiKeyService>,
    pub documents: Arc<DocumentService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub identity: Arc<dyn IdentityProvider>,
    pub cache: Arc<dyn Cache>,
    pub web: WebSettings,
}

impl AppState {
    /// Wire the services over already-built backends
    pub fn from_parts(
        registries: Registries,
        backend: CacheBackend,
        objects: Arc<dyn ObjectStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &AppConfig,
    ) -> Self {
        let store = DocumentStore::new(objects, backend.cache.clone());

        Self {
            sessions: Arc::new(SessionService::new(
                registries.sessions,
                registries.users.clone(),
                backend.cache.clone(),
            )),
            api_keys: Arc::new(ApiKeyService::new(registries.api_keys)),
            documents: Arc::new(DocumentService::new(
                registries.documents,
                store,
                config.documents.file_limits(),
            )),
            subscriptions: Arc::new(SubscriptionService::new(
                backend.cache.clone(),
                registries.users.clone(),
            )),
            rate_limiter: Arc::new(RateLimiter::new(
                backend.buckets,
                config.rate_limit.web,
                config.rate_limit.public,
            )),
            users: registries.users,
            identity,
            cache: backend.cache,
            web: WebSettings::from_config(config),
        }
    }
}
