//! Superhero types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hero_shared::{SuperheroId, SuperheroImageId};

use super::error::SuperheroError;

/// Content type recorded when the client does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Descriptive fields for a new superhero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperheroFields {
    /// Hero name, required.
    pub nickname: String,
    /// Civilian name.
    pub real_name: Option<String>,
    /// Origin story.
    pub origin_description: Option<String>,
    /// Free-form list of powers.
    pub superpowers: Option<String>,
    /// Catch phrase.
    pub catch_phrase: Option<String>,
}

impl SuperheroFields {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the nickname is blank.
    pub fn validate(&self) -> Result<(), SuperheroError> {
        validate_nickname(&self.nickname)
    }
}

/// Plain field changes for an existing superhero. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperheroChanges {
    /// New hero name.
    pub nickname: Option<String>,
    /// New civilian name.
    pub real_name: Option<String>,
    /// New origin story.
    pub origin_description: Option<String>,
    /// New list of powers.
    pub superpowers: Option<String>,
    /// New catch phrase.
    pub catch_phrase: Option<String>,
}

impl SuperheroChanges {
    /// Whether no field is being changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.real_name.is_none()
            && self.origin_description.is_none()
            && self.superpowers.is_none()
            && self.catch_phrase.is_none()
    }

    /// Check the fields being changed.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the nickname is set to a blank value.
    pub fn validate(&self) -> Result<(), SuperheroError> {
        match &self.nickname {
            Some(nickname) => validate_nickname(nickname),
            None => Ok(()),
        }
    }
}

fn validate_nickname(nickname: &str) -> Result<(), SuperheroError> {
    if nickname.trim().is_empty() {
        return Err(SuperheroError::validation("nickname must not be empty"));
    }
    Ok(())
}

/// Superhero domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superhero {
    /// Unique identifier.
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
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Images sorted by `order`, then by `id`.
    pub images: Vec<SuperheroImage>,
}

/// Image attached to a superhero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperheroImage {
    /// Unique identifier.
    pub id: SuperheroImageId,
    /// Owning superhero.
    pub superhero_id: SuperheroId,
    /// Public URL of the stored object.
    pub url: String,
    /// Display position. Not unique, not necessarily contiguous.
    pub order: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Sort images for display: `order` ascending, ties broken by `id` ascending.
pub fn sort_images(images: &mut [SuperheroImage]) {
    images.sort_by_key(|image| (image.order, image.id));
}

/// Input for creating an image record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuperheroImage {
    /// Owning superhero.
    pub superhero_id: SuperheroId,
    /// Public URL of the uploaded object.
    pub url: String,
    /// Display position.
    pub order: i32,
}

/// One uploaded file, held in memory.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename as sent by the client.
    pub filename: String,
    /// MIME type as sent by the client.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl ImageUpload {
    /// Create an upload, defaulting the content type when none was given.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            data: data.into(),
        }
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// New display position for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOrder {
    /// Image to move.
    pub id: SuperheroImageId,
    /// New position.
    pub order: i32,
}

/// How many images to load with a superhero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSelection {
    /// Every image.
    All,
    /// Only the first `n` images in display order.
    First(u64),
}

impl ImageSelection {
    /// Maximum number of images to keep, if bounded.
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::First(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

/// Mutations for an existing superhero.
#[derive(Debug, Clone, Default)]
pub struct UpdateSuperheroInput {
    /// Plain field changes.
    pub changes: SuperheroChanges,
    /// Images to delete.
    pub remove_image_ids: Vec<SuperheroImageId>,
    /// New display positions.
    pub image_orders: Vec<ImageOrder>,
    /// Images to append.
    pub files: Vec<ImageUpload>,
}
