use serde::Deserialize;

use crate::domain::rate_limit::TokenBucket;
use crate::infrastructure::cache::{CacheConfig, CacheType};
use crate::infrastructure::document::{FileLimits, S3Config};
use crate::infrastructure::identity::OAuthConfig;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::{ObjectStorageConfig, PostgresConfig, StorageConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub cache: CacheSettings,
    pub database: DatabaseSettings,
    pub object_storage: ObjectStorageSettings,
    pub rate_limit: RateLimitSettings,
    pub documents: DocumentSettings,
    pub oauth: OAuthConfig,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin of the web client, allowed by CORS
    pub client_url: String,
    /// Public base URL of this API
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub url: Option<String>,
    pub key_prefix: Option<String>,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    #[serde(rename = "type")]
    pub database_type: String,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObjectStorageSettings {
    #[serde(rename = "type")]
    pub storage_type: String,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub web: TokenBucket,
    pub public: TokenBucket,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub free_file_limit: usize,
    pub pro_file_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            client_url: "http://localhost:3000".to_string(),
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 60,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_type: "in_memory".to_string(),
            url: None,
            key_prefix: None,
            max_capacity: 10_000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let postgres = PostgresConfig::default();
        Self {
            database_type: "in_memory".to_string(),
            url: postgres.url,
            max_connections: postgres.max_connections,
            min_connections: postgres.min_connections,
        }
    }
}

impl Default for ObjectStorageSettings {
    fn default() -> Self {
        Self {
            storage_type: "in_memory".to_string(),
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            web: TokenBucket::new(10, 1.0, 60),
            public: TokenBucket::new(5, 1.0, 60),
        }
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        let limits = FileLimits::default();
        Self {
            free_file_limit: limits.free,
            pro_file_limit: limits.pro,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "session_token".to_string(),
            secure_cookies: false,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> Result<CacheConfig, crate::domain::DomainError> {
        Ok(CacheConfig {
            cache_type: self.cache_type.parse::<CacheType>()?,
            redis_url: self.url.clone(),
            key_prefix: self.key_prefix.clone(),
            max_capacity: Some(self.max_capacity),
        })
    }
}

impl DatabaseSettings {
    pub fn to_storage_config(&self) -> Result<StorageConfig, crate::domain::DomainError> {
        use crate::infrastructure::storage::StorageType;

        match StorageType::from_str(&self.database_type) {
            Some(StorageType::InMemory) => Ok(StorageConfig::in_memory()),
            Some(StorageType::Postgres) => Ok(StorageConfig::postgres(
                PostgresConfig::new(self.url.clone())
                    .with_max_connections(self.max_connections)
                    .with_min_connections(self.min_connections),
            )),
            None => Err(crate::domain::DomainError::configuration(format!(
                "Unknown database type: {}. Valid types: in_memory, postgres",
                self.database_type
            ))),
        }
    }
}

impl ObjectStorageSettings {
    pub fn to_object_storage_config(
        &self,
    ) -> Result<ObjectStorageConfig, crate::domain::DomainError> {
        match self.storage_type.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(ObjectStorageConfig::InMemory),
            "s3" => Ok(ObjectStorageConfig::S3(S3Config {
                bucket: self.bucket.clone(),
                region: self.region.clone(),
                endpoint: self.endpoint.clone(),
            })),
            other => Err(crate::domain::DomainError::configuration(format!(
                "Unknown object storage type: {}. Valid types: in_memory, s3",
                other
            ))),
        }
    }
}

impl DocumentSettings {
    pub fn file_limits(&self) -> FileLimits {
        FileLimits {
            free: self.free_file_limit,
            pro: self.pro_file_limit,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
