//! Storage service implementation using Apache OpenDAL.

use std::future::Future;

use bytes::Bytes;
use opendal::{Builder, Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Put/delete-by-key object store.
///
/// The bucket is fixed by the implementation's configuration. This is the only
/// seam between the superhero core and object storage.
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` with the given content type.
    fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the object stored under `key`.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage service for superhero images.
#[derive(Debug)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        if config.public_url.trim_end_matches('/').is_empty() {
            return Err(StorageError::configuration("public URL must not be empty"));
        }
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => build_operator(
                services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region),
            ),
            StorageProvider::Memory => build_operator(services::Memory::default()),
        }
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Read a stored file back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_bytes())
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl ObjectStore for StorageService {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.operator
            .write_with(key, data)
            .content_type(content_type)
            .await
            .map(|_| ())
            .map_err(StorageError::from)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.operator.delete(key).await.map_err(StorageError::from)
    }
}

/// Reject keys that would address a directory or escape the bucket root.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.ends_with('/') || key.split('/').any(|seg| seg == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn build_operator(builder: impl Builder) -> Result<Operator, StorageError> {
    Operator::new(builder)
        .map(|op| op.finish())
        .map_err(|e| StorageError::configuration(e.to_string()))
}
