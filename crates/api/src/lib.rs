//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for superheroes and their images
//! - Multipart form parsing
//! - Error to response mapping

pub mod error;
pub mod form;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use hero_core::storage::StorageService;
use hero_core::superhero::MediaSettings;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Object storage for superhero images.
    pub storage: Arc<StorageService>,
    /// Public URL base and upload limits.
    pub media: MediaSettings,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(state.body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
