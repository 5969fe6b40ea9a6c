//! Superhero routes.
//!
//! Every mutating endpoint goes through [`SuperheroService`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::AppState;
use crate::error::{error_response, from_superhero_error};
use crate::form::SuperheroForm;
use hero_core::storage::StorageService;
use hero_core::superhero::{Superhero, SuperheroImage, SuperheroService};
use hero_db::SuperheroRepository;
use hero_shared::{SuperheroId, SuperheroImageId};

/// Creates the superhero routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/superheroes",
            post(create_superhero).get(list_superheroes),
        )
        .route(
            "/superheroes/{id}",
            get(get_superhero)
                .patch(update_superhero)
                .delete(delete_superhero),
        )
        .route("/superheroes/{id}/images", post(upload_images))
}

// ============================================================================
// Response Types
// ============================================================================

/// A superhero with its images.
#[derive(Debug, Serialize)]
pub struct SuperheroResponse {
    /// Superhero ID.
    pub id: SuperheroId,
    /// Hero name.
    pub nickname: String,
    /// Civilian name.
    pub real_name: Option<String>,
    /// Origin story.
    pub origin_description: Option<String>,
    /// Free-form list of powers.
    pub superpowers: Option<String>,
    /// Catch phrase.
    pub catch_phrase: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
    /// Updated at timestamp (ISO 8601).
    pub updated_at: String,
    /// Images in display order.
    pub images: Vec<SuperheroImageResponse>,
}

/// One image of a superhero.
#[derive(Debug, Serialize)]
pub struct SuperheroImageResponse {
    /// Image ID.
    pub id: SuperheroImageId,
    /// Public URL.
    pub url: String,
    /// Display position.
    pub order: i32,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

/// An image created by the upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadedImageResponse {
    /// Image ID.
    pub id: SuperheroImageId,
    /// Public URL.
    pub url: String,
}

impl From<SuperheroImage> for SuperheroImageResponse {
    fn from(image: SuperheroImage) -> Self {
        Self {
            id: image.id,
            url: image.url,
            order: image.order,
            created_at: image.created_at.to_rfc3339(),
        }
    }
}

impl From<Superhero> for SuperheroResponse {
    fn from(hero: Superhero) -> Self {
        Self {
            id: hero.id,
            nickname: hero.nickname,
            real_name: hero.real_name,
            origin_description: hero.origin_description,
            superpowers: hero.superpowers,
            catch_phrase: hero.catch_phrase,
            created_at: hero.created_at.to_rfc3339(),
            updated_at: hero.updated_at.to_rfc3339(),
            images: hero.images.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn superhero_service(state: &AppState) -> SuperheroService<SuperheroRepository, StorageService> {
    let repo = SuperheroRepository::new((*state.db).clone());
    SuperheroService::new(Arc::new(repo), state.storage.clone(), state.media.clone())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/superheroes`
/// Create a superhero, optionally with images.
async fn create_superhero(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    let form = match SuperheroForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };
    let (fields, files) = match form.into_create() {
        Ok(parts) => parts,
        Err(e) => return error_response(&e),
    };

    match superhero_service(&state).create(fields, files).await {
        Ok(hero) => {
            info!(
                superhero_id = %hero.id,
                images = hero.images.len(),
                "Superhero created"
            );
            (StatusCode::CREATED, Json(SuperheroResponse::from(hero))).into_response()
        }
        Err(e) => error_response(&from_superhero_error(e)),
    }
}

/// GET `/superheroes`
/// List superheroes, each with its first image only.
async fn list_superheroes(State(state): State<AppState>) -> impl IntoResponse {
    match superhero_service(&state).list().await {
        Ok(heroes) => {
            let items: Vec<SuperheroResponse> = heroes.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "superheroes": items }))).into_response()
        }
        Err(e) => error_response(&from_superhero_error(e)),
    }
}

/// GET `/superheroes/{id}`
/// Get a superhero with all images.
async fn get_superhero(
    State(state): State<AppState>,
    Path(id): Path<SuperheroId>,
) -> impl IntoResponse {
    match superhero_service(&state).get(id).await {
        Ok(hero) => (StatusCode::OK, Json(SuperheroResponse::from(hero))).into_response(),
        Err(e) => error_response(&from_superhero_error(e)),
    }
}

/// POST `/superheroes/{id}/images`
/// Upload more images after the existing ones.
async fn upload_images(
    State(state): State<AppState>,
    Path(id): Path<SuperheroId>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match SuperheroForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };

    match superhero_service(&state).append_images(id, form.files).await {
        Ok(images) => {
            info!(superhero_id = %id, count = images.len(), "Images uploaded");
            let items: Vec<UploadedImageResponse> = images
                .into_iter()
                .map(|image| UploadedImageResponse {
                    id: image.id,
                    url: image.url,
                })
                .collect();
            (StatusCode::CREATED, Json(json!({ "images": items }))).into_response()
        }
        Err(e) => error_response(&from_superhero_error(e)),
    }
}

/// PATCH `/superheroes/{id}`
/// Update fields, remove, reorder and append images.
async fn update_superhero(
    State(state): State<AppState>,
    Path(id): Path<SuperheroId>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match SuperheroForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };

    match superhero_service(&state).update(id, form.into_update()).await {
        Ok(hero) => {
            info!(superhero_id = %id, images = hero.images.len(), "Superhero updated");
            (StatusCode::OK, Json(SuperheroResponse::from(hero))).into_response()
        }
        Err(e) => error_response(&from_superhero_error(e)),
    }
}

/// DELETE `/superheroes/{id}`
/// Delete a superhero and all its images.
async fn delete_superhero(
    State(state): State<AppState>,
    Path(id): Path<SuperheroId>,
) -> impl IntoResponse {
    match superhero_service(&state).delete(id).await {
        Ok(()) => {
            info!(superhero_id = %id, "Superhero deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&from_superhero_error(e)),
    }
}
