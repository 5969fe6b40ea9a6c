//! Storage configuration types.

/// Where superhero images are kept.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// S3-compatible bucket (Cloudflare R2, AWS S3, MinIO).
    S3 {
        /// Endpoint URL, e.g. `https://<account>.r2.cloudflarestorage.com`.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region; R2 uses `auto`.
        region: String,
    },
    /// In-process memory, used by tests.
    Memory,
}

impl StorageProvider {
    /// S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Short provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::Memory => "memory",
        }
    }

    /// Bucket the images live in.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Public base URL objects are served from (e.g. an R2 public bucket domain).
    pub public_url: String,
    /// Per-file ceiling in bytes.
    pub max_file_size: u64,
    /// Maximum number of files accepted in one batch.
    pub max_files_per_batch: usize,
}

impl StorageConfig {
    /// Default per-file ceiling: 2 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;
    /// Default max files per batch.
    pub const DEFAULT_MAX_FILES_PER_BATCH: usize = 10;

    /// Config with the default limits.
    #[must_use]
    pub fn new(provider: StorageProvider, public_url: impl Into<String>) -> Self {
        Self {
            provider,
            public_url: public_url.into(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            max_files_per_batch: Self::DEFAULT_MAX_FILES_PER_BATCH,
        }
    }

    /// Set the per-file ceiling.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the maximum number of files per batch.
    #[must_use]
    pub fn with_max_files_per_batch(mut self, count: usize) -> Self {
        self.max_files_per_batch = count;
        self
    }
}
