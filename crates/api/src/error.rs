//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use hero_core::superhero::{ErrorKind, SuperheroError};
use hero_shared::AppError;

/// Map a core superhero error onto the application error.
pub fn from_superhero_error(err: SuperheroError) -> AppError {
    match err.kind() {
        ErrorKind::NotFound => AppError::NotFound(err.to_string()),
        ErrorKind::Validation => AppError::Validation(err.to_string()),
        ErrorKind::UpstreamStorage => AppError::ExternalService(err.to_string()),
        ErrorKind::UpstreamMetadata => AppError::Database(err.to_string()),
    }
}

/// Render an application error as `{"error": ..., "message": ...}`.
///
/// Server-side failures are logged with detail and answered with a generic message.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_client_error() {
        client_message(err)
    } else {
        error!(error = %err, code = err.error_code(), "Request failed");
        match err {
            AppError::ExternalService(_) => "Storage operation failed".to_string(),
            _ => "An error occurred".to_string(),
        }
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

fn client_message(err: &AppError) -> String {
    match err {
        AppError::NotFound(msg) | AppError::Validation(msg) | AppError::PayloadTooLarge(msg) => {
            msg.clone()
        }
        other => other.to_string(),
    }
}
