//! Superhero API Server
//!
//! Main entry point for the superhero service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hero_api::{AppState, create_router};
use hero_core::storage::{StorageConfig, StorageProvider, StorageService};
use hero_core::superhero::MediaSettings;
use hero_db::connect;
use hero_shared::{AppConfig, StorageSettings};

/// Build the object storage configuration for an S3-compatible bucket.
fn storage_config(settings: &StorageSettings) -> StorageConfig {
    let provider = StorageProvider::s3(
        &settings.endpoint,
        &settings.bucket,
        &settings.access_key_id,
        &settings.secret_access_key,
        &settings.region,
    );

    StorageConfig::new(provider, settings.public_url.clone())
        .with_max_file_size(settings.max_file_bytes)
        .with_max_files_per_batch(settings.max_files_per_request)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "heroes=debug,hero_api=debug,hero_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Create storage service
    let storage_config = storage_config(&config.storage);
    let media = MediaSettings::from_storage_config(&storage_config);
    let storage = StorageService::from_config(storage_config)?;
    info!(
        provider = storage.provider_name(),
        bucket = %storage.bucket(),
        public_url = %media.public_base_url,
        max_file_bytes = media.max_file_bytes,
        "Storage configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        storage: Arc::new(storage),
        media,
        body_limit: config.storage.max_request_bytes(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
