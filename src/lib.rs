//! RestJSON API
//!
//! Turns a single stored JSON document into a REST API:
//! - top-level keys become resources, arrays of objects become collections
//! - a session-authenticated web API manages documents and API keys
//! - a key-authenticated public API serves the documents themselves

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::cache::CacheFactory;
use infrastructure::identity::OidcIdentityProvider;
use infrastructure::storage::StorageFactory;

/// Build the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache_config = config.cache.to_cache_config()?;
    let backend = CacheFactory::new().create(&cache_config).await?;
    info!(cache_type = %config.cache.cache_type, "Cache initialized");

    let registries = StorageFactory::create(&config.database.to_storage_config()?).await?;
    let objects =
        StorageFactory::create_object_store(&config.object_storage.to_object_storage_config()?)
            .await?;

    let identity = Arc::new(OidcIdentityProvider::new(config.oauth.clone())?);

    Ok(AppState::from_parts(
        registries,
        backend,
        objects,
        identity,
        config,
    ))
}
