//! S3 object storage

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::domain::document::ObjectStore;
use crate::domain::DomainError;

/// S3 connection settings
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Override for S3-compatible services such as MinIO or LocalStack
    pub endpoint: Option<String>,
}

/// ObjectStore backed by one S3 bucket
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    base_url: String,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, config: &S3Config) -> Self {
        let base_url = match &config.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region),
        };

        Self {
            client,
            bucket: config.bucket.clone(),
            base_url,
        }
    }

    /// Build a client from the default AWS credential chain
    pub async fn connect(config: &S3Config) -> Result<Self, DomainError> {
        if config.bucket.is_empty() {
            return Err(DomainError::configuration("S3 bucket name is required"));
        }

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(bucket = %config.bucket, region = %config.region, "Using S3 object storage");

        Ok(Self::new(S3Client::from_conf(builder.build()), config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, DomainError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to get object '{}': {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let body = output.body.collect().await.map_err(|e| {
            DomainError::storage(format!("Failed to read object '{}': {}", key, e))
        })?;

        Ok(body.into_bytes())
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), DomainError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to put object '{}': {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to delete object '{}': {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> S3Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        S3Client::from_conf(config)
    }

    #[test]
    fn test_url_uses_virtual_hosted_style() {
        let store = S3ObjectStore::new(
            offline_client(),
            &S3Config {
                bucket: "restjson-files".to_string(),
                region: "us-east-1".to_string(),
                endpoint: None,
            },
        );

        assert_eq!(
            store.url("owner/doc.json"),
            "https://restjson-files.s3.us-east-1.amazonaws.com/owner/doc.json"
        );
    }

    #[test]
    fn test_url_with_endpoint_override() {
        let store = S3ObjectStore::new(
            offline_client(),
            &S3Config {
                bucket: "files".to_string(),
                region: "us-east-1".to_string(),
                endpoint: Some("http://localhost:9000/".to_string()),
            },
        );

        assert_eq!(store.url("a/b.json"), "http://localhost:9000/files/a/b.json");
    }
}
