//! Multipart form parsing for superhero requests.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use hero_core::superhero::{
    ImageOrder, ImageUpload, SuperheroChanges, SuperheroFields, UpdateSuperheroInput,
};
use hero_shared::{AppError, SuperheroImageId};

/// Multipart field carrying uploaded images.
pub const FILES_FIELD: &str = "files";

/// Everything a superhero multipart request may carry.
///
/// Text fields keep the last value sent. `remove_image_ids` and
/// `image_orders` accumulate across repeated fields.
#[derive(Debug, Default)]
pub struct SuperheroForm {
    /// Hero name.
    pub nickname: Option<String>,
    /// Civilian name.
    pub real_name: Option<String>,
    /// Origin story.
    pub origin_description: Option<String>,
    /// Free-form list of powers.
    pub superpowers: Option<String>,
    /// Catch phrase.
    pub catch_phrase: Option<String>,
    /// Images to delete.
    pub remove_image_ids: Vec<SuperheroImageId>,
    /// New display positions.
    pub image_orders: Vec<ImageOrder>,
    /// Uploaded files in the order they were sent.
    pub files: Vec<ImageUpload>,
}

impl SuperheroForm {
    /// Read the whole multipart body.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields, or
    /// [`AppError::PayloadTooLarge`] when the body exceeds the limit.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILES_FIELD {
                // A file input left empty still sends a part, with an empty filename.
                let Some(filename) = field.file_name().filter(|f| !f.is_empty()) else {
                    debug!("Skipping empty file part");
                    continue;
                };
                let filename = filename.to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.files.push(ImageUpload::new(filename, content_type, data));
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            match name.as_str() {
                "nickname" => form.nickname = Some(value),
                "real_name" => form.real_name = Some(value),
                "origin_description" => form.origin_description = Some(value),
                "superpowers" => form.superpowers = Some(value),
                "catch_phrase" => form.catch_phrase = Some(value),
                "remove_image_ids" | "removeImageIds" => {
                    form.remove_image_ids.extend(parse_id_list(&value)?);
                }
                "image_orders" | "imageOrders" => {
                    form.image_orders.extend(parse_image_orders(&value)?);
                }
                other => debug!(field = %other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Fields and files for a new superhero.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `nickname` is missing.
    pub fn into_create(self) -> Result<(SuperheroFields, Vec<ImageUpload>), AppError> {
        let nickname = self
            .nickname
            .ok_or_else(|| AppError::Validation("nickname is required".to_string()))?;

        let fields = SuperheroFields {
            nickname,
            real_name: self.real_name,
            origin_description: self.origin_description,
            superpowers: self.superpowers,
            catch_phrase: self.catch_phrase,
        };
        Ok((fields, self.files))
    }

    /// Mutations for an existing superhero.
    #[must_use]
    pub fn into_update(self) -> UpdateSuperheroInput {
        UpdateSuperheroInput {
            changes: SuperheroChanges {
                nickname: self.nickname,
                real_name: self.real_name,
                origin_description: self.origin_description,
                superpowers: self.superpowers,
                catch_phrase: self.catch_phrase,
            },
            remove_image_ids: self.remove_image_ids,
            image_orders: self.image_orders,
            files: self.files,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Deserialize)]
struct OrderEntry {
    id: i32,
    order: i32,
}

/// Parse `remove_image_ids`: a JSON array of integers or a single integer.
///
/// A blank value means no ids.
///
/// # Errors
///
/// Returns a validation error for anything else.
pub fn parse_id_list(value: &str) -> Result<Vec<SuperheroImageId>, AppError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str::<OneOrMany<i32>>(value)
        .map(|ids| ids.into_vec().into_iter().map(SuperheroImageId::new).collect())
        .map_err(|_| {
            AppError::Validation(
                "remove_image_ids must be a JSON array of integers".to_string(),
            )
        })
}

/// Parse `image_orders`: a JSON array of `{"id": int, "order": int}`.
///
/// A single object is accepted too. A blank value means no assignments.
///
/// # Errors
///
/// Returns a validation error for anything else, including positional
/// arrays such as `[3, 4]`.
pub fn parse_image_orders(value: &str) -> Result<Vec<ImageOrder>, AppError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }

    let malformed = || {
        AppError::Validation(
            "image_orders must be a JSON array of {\"id\": int, \"order\": int}".to_string(),
        )
    };

    let entries = match serde_json::from_str::<Value>(value).map_err(|_| malformed())? {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return Err(malformed()),
    };

    entries
        .into_iter()
        .map(|entry| {
            if !entry.is_object() {
                return Err(malformed());
            }
            serde_json::from_value::<OrderEntry>(entry)
                .map(|e| ImageOrder {
                    id: SuperheroImageId::new(e.id),
                    order: e.order,
                })
                .map_err(|_| malformed())
        })
        .collect()
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}
