//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Object storage configuration (S3-compatible, Cloudflare R2 by default).
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// S3 endpoint URL.
    pub endpoint: String,
    /// Bucket holding superhero images.
    pub bucket: String,
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Region (`auto` for R2).
    #[serde(default = "default_region")]
    pub region: String,
    /// Public base URL objects are served from.
    pub public_url: String,
    /// Per-file size ceiling in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Maximum number of files accepted in one request.
    #[serde(default = "default_max_files_per_request")]
    pub max_files_per_request: usize,
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024 // 2 MiB
}

fn default_max_files_per_request() -> usize {
    10
}

impl StorageSettings {
    /// Upper bound for a whole request body carrying a full batch of files.
    ///
    /// Adds 1 MiB of headroom for multipart framing and text fields.
    #[must_use]
    pub fn max_request_bytes(&self) -> usize {
        let per_file = usize::try_from(self.max_file_bytes).unwrap_or(usize::MAX);
        per_file
            .saturating_mul(self.max_files_per_request)
            .saturating_add(1024 * 1024)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HEROES").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
