//! S3-compatible object storage client.
//!
//! Files never flow through this service: clients PUT and GET against
//! presigned URLs, the API only mints URLs and deletes objects.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;

use crate::config::{Config, PRESIGN_TTL_SECONDS};
use crate::errors::{AppError, AppResult};

/// Object storage trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Presigned PUT URL for uploading a new object.
    async fn presign_put(&self, key: &str, content_type: &str) -> AppResult<String>;

    /// Presigned GET URL for downloading an object.
    async fn presign_get(&self, key: &str) -> AppResult<String>;

    /// Delete an object.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// AWS SDK implementation against any S3-compatible endpoint.
#[derive(Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    presign_ttl: Duration,
}

impl S3Storage {
    /// Build the client from configuration. Custom endpoints (MinIO,
    /// R2) use path-style addressing.
    pub async fn connect(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()));
        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        tracing::info!(bucket = %config.s3_bucket, "Object storage client ready");

        Self {
            client: S3Client::from_conf(s3_config),
            bucket: config.s3_bucket.clone(),
            presign_ttl: Duration::from_secs(PRESIGN_TTL_SECONDS),
        }
    }

    fn presign_config(&self) -> AppResult<PresigningConfig> {
        PresigningConfig::expires_in(self.presign_ttl)
            .map_err(|e| AppError::storage(format!("Invalid presign TTL: {}", e)))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_put(&self, key: &str, content_type: &str) -> AppResult<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(self.presign_config()?)
            .await
            .map_err(|e| AppError::storage(format!("Failed to presign upload: {}", e)))?;

        Ok(presigned.uri().to_string())
    }

    async fn presign_get(&self, key: &str) -> AppResult<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(self.presign_config()?)
            .await
            .map_err(|e| AppError::storage(format!("Failed to presign download: {}", e)))?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Failed to delete object {}: {}", key, e)))?;

        Ok(())
    }
}
