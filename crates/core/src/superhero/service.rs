//! Superhero service: the only entry point that mutates superheroes and their images.

use std::collections::HashSet;
use std::sync::Arc;

use hero_shared::{SuperheroId, SuperheroImageId};
use tracing::{info, instrument, warn};

use super::codec::KeyCodec;
use super::error::SuperheroError;
use super::guard::{MAX_FILES_PER_BATCH, MAX_IMAGE_BYTES, assert_batch_size, assert_within_limit};
use super::remover::{AttachmentRemover, OwnershipCheck};
use super::reorder::ReorderApplier;
use super::repository::SuperheroRepository;
use super::types::{
    ImageSelection, ImageUpload, Superhero, SuperheroFields, SuperheroImage, UpdateSuperheroInput,
};
use super::writer::AttachmentWriter;
use crate::storage::{ObjectStore, StorageConfig};

/// Limits and public URL base used by [`SuperheroService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSettings {
    /// Base URL stored objects are served from.
    pub public_base_url: String,
    /// Per-file ceiling in bytes.
    pub max_file_bytes: u64,
    /// Maximum files in one request.
    pub max_files_per_request: usize,
}

impl MediaSettings {
    /// Settings with the default limits.
    #[must_use]
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            max_file_bytes: MAX_IMAGE_BYTES,
            max_files_per_request: MAX_FILES_PER_BATCH,
        }
    }

    /// Take the public URL and limits from a storage configuration.
    #[must_use]
    pub fn from_storage_config(config: &StorageConfig) -> Self {
        Self {
            public_base_url: config.public_url.clone(),
            max_file_bytes: config.max_file_size,
            max_files_per_request: config.max_files_per_batch,
        }
    }
}

/// Superhero service.
///
/// Every call runs its storage and database steps one after another. Calls for
/// the same superhero are not serialized against each other.
pub struct SuperheroService<R: SuperheroRepository, S: ObjectStore> {
    repo: Arc<R>,
    store: Arc<S>,
    codec: KeyCodec,
    settings: MediaSettings,
}

impl<R: SuperheroRepository, S: ObjectStore> SuperheroService<R, S> {
    /// Create a new superhero service.
    #[must_use]
    pub fn new(repo: Arc<R>, store: Arc<S>, settings: MediaSettings) -> Self {
        Self {
            repo,
            store,
            codec: KeyCodec::new(&settings.public_base_url),
            settings,
        }
    }

    /// Key/URL codec in use.
    #[must_use]
    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    /// Active limits.
    #[must_use]
    pub fn settings(&self) -> &MediaSettings {
        &self.settings
    }

    /// Create a superhero and upload its images in input order.
    ///
    /// Nothing is written if any file is rejected by the limits.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad fields or files, or the first
    /// upstream failure. On an upstream failure the record and the images
    /// written before it remain.
    #[instrument(skip(self, fields, files), fields(files = files.len()))]
    pub async fn create(
        &self,
        fields: SuperheroFields,
        files: Vec<ImageUpload>,
    ) -> Result<Superhero, SuperheroError> {
        fields.validate()?;
        self.check_files(&files)?;

        let hero = self.repo.create(fields).await?;
        info!(superhero_id = %hero.id, nickname = %hero.nickname, "Superhero created");

        if !files.is_empty() {
            self.writer().write(hero.id, files, 0).await?;
        }

        self.hydrate(hero.id).await
    }

    /// List every superhero with only its first image.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the query fails.
    pub async fn list(&self) -> Result<Vec<Superhero>, SuperheroError> {
        self.repo.list(ImageSelection::First(1)).await
    }

    /// Fetch one superhero with all images.
    ///
    /// # Errors
    ///
    /// Returns [`SuperheroError::NotFound`] if the superhero does not exist.
    pub async fn get(&self, id: SuperheroId) -> Result<Superhero, SuperheroError> {
        self.hydrate(id).await
    }

    /// Upload more images after the existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`SuperheroError::NotFound`], a validation error for an empty or
    /// rejected batch, or the first upstream failure.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn append_images(
        &self,
        id: SuperheroId,
        files: Vec<ImageUpload>,
    ) -> Result<Vec<SuperheroImage>, SuperheroError> {
        self.ensure_exists(id).await?;

        if files.is_empty() {
            return Err(SuperheroError::validation("No files uploaded"));
        }
        self.check_files(&files)?;

        let first_order = self.next_order(id).await?;
        let images = self.writer().write(id, files, first_order).await?;
        info!(superhero_id = %id, count = images.len(), "Images appended");
        Ok(images)
    }

    /// Update fields and images of a superhero.
    ///
    /// All input is validated before the first write. Writes then happen in
    /// this order: removals, reorders, field changes, new files.
    ///
    /// # Errors
    ///
    /// Returns [`SuperheroError::NotFound`], a validation error (nothing
    /// written), or the first upstream failure (earlier steps stay applied).
    #[instrument(
        skip(self, input),
        fields(
            remove = input.remove_image_ids.len(),
            reorder = input.image_orders.len(),
            files = input.files.len()
        )
    )]
    pub async fn update(
        &self,
        id: SuperheroId,
        input: UpdateSuperheroInput,
    ) -> Result<Superhero, SuperheroError> {
        self.ensure_exists(id).await?;

        // Validate everything up front
        input.changes.validate()?;
        self.check_files(&input.files)?;

        let remover = self.remover();
        let removals = remover
            .resolve(id, &input.remove_image_ids, OwnershipCheck::Strict)
            .await?;

        let removed: HashSet<SuperheroImageId> = removals.iter().map(|i| i.id).collect();
        if let Some(conflict) = input.image_orders.iter().find(|o| removed.contains(&o.id)) {
            return Err(SuperheroError::validation(format!(
                "image {} cannot be both removed and reordered",
                conflict.id
            )));
        }

        let reorder = ReorderApplier::new(self.repo.as_ref());
        reorder.validate(id, &input.image_orders).await?;

        // Apply
        if !removals.is_empty() {
            let deleted = remover.remove_resolved(id, &removals).await?;
            info!(superhero_id = %id, deleted, "Images removed");
        }

        reorder.apply_validated(id, &input.image_orders).await?;

        if !input.changes.is_empty() {
            self.repo.update(id, input.changes).await?;
        }

        if !input.files.is_empty() {
            let first_order = self.next_order(id).await?;
            self.writer().write(id, input.files, first_order).await?;
        }

        info!(superhero_id = %id, "Superhero updated");
        self.hydrate(id).await
    }

    /// Delete a superhero, its stored objects and its image rows.
    ///
    /// Objects are deleted first. If any object delete fails, the record and
    /// all image rows are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SuperheroError::NotFound`] or the first upstream failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SuperheroId) -> Result<(), SuperheroError> {
        let hero = self.hydrate(id).await?;

        self.remover().delete_objects(id, &hero.images).await?;

        if !self.repo.delete(id).await? {
            warn!(superhero_id = %id, "Superhero vanished during delete");
            return Err(SuperheroError::NotFound(id));
        }

        info!(superhero_id = %id, images = hero.images.len(), "Superhero deleted");
        Ok(())
    }

    fn check_files(&self, files: &[ImageUpload]) -> Result<(), SuperheroError> {
        assert_batch_size(files, self.settings.max_files_per_request)?;
        assert_within_limit(files, self.settings.max_file_bytes)
    }

    async fn ensure_exists(&self, id: SuperheroId) -> Result<(), SuperheroError> {
        if self.repo.exists(id).await? {
            Ok(())
        } else {
            Err(SuperheroError::NotFound(id))
        }
    }

    async fn hydrate(&self, id: SuperheroId) -> Result<Superhero, SuperheroError> {
        self.repo
            .find_by_id(id, ImageSelection::All)
            .await?
            .ok_or(SuperheroError::NotFound(id))
    }

    async fn next_order(&self, id: SuperheroId) -> Result<i32, SuperheroError> {
        match self.repo.max_image_order(id).await? {
            None => Ok(0),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| SuperheroError::validation("image order out of range")),
        }
    }

    fn writer(&self) -> AttachmentWriter<'_, R, S> {
        AttachmentWriter::new(self.repo.as_ref(), self.store.as_ref(), &self.codec)
    }

    fn remover(&self) -> AttachmentRemover<'_, R, S> {
        AttachmentRemover::new(self.repo.as_ref(), self.store.as_ref(), &self.codec)
    }
}
