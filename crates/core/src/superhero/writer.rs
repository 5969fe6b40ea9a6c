//! Upload an ordered batch of images and record one row per upload.

use hero_shared::SuperheroId;
use tracing::{debug, error};

use super::codec::{KeyCodec, next_upload_instant};
use super::error::SuperheroError;
use super::repository::SuperheroRepository;
use super::types::{ImageUpload, NewSuperheroImage, SuperheroImage};
use crate::storage::ObjectStore;

/// Writes image batches for a superhero.
///
/// Files are processed strictly in input order. The first file receives
/// `first_order`, the next `first_order + 1`, and so on.
///
/// There is no compensation: if an upload fails, rows already written for
/// earlier files stay; if a row insert fails, the uploaded object stays.
pub struct AttachmentWriter<'a, R, S> {
    repo: &'a R,
    store: &'a S,
    codec: &'a KeyCodec,
}

impl<'a, R: SuperheroRepository, S: ObjectStore> AttachmentWriter<'a, R, S> {
    /// Create a writer over the given collaborators.
    #[must_use]
    pub fn new(repo: &'a R, store: &'a S, codec: &'a KeyCodec) -> Self {
        Self { repo, store, codec }
    }

    /// Upload `files` and insert their image rows.
    ///
    /// # Errors
    ///
    /// Returns the first storage or repository error; the rest of the batch is skipped.
    pub async fn write(
        &self,
        superhero_id: SuperheroId,
        files: Vec<ImageUpload>,
        first_order: i32,
    ) -> Result<Vec<SuperheroImage>, SuperheroError> {
        let orders = (0..files.len())
            .map(|index| i32::try_from(index).ok().and_then(|i| first_order.checked_add(i)))
            .collect::<Option<Vec<i32>>>()
            .ok_or_else(|| SuperheroError::validation("image order out of range"))?;
        let mut created = Vec::with_capacity(files.len());

        for (file, order) in files.into_iter().zip(orders) {
            let key = KeyCodec::derive_key(superhero_id, &file.filename, next_upload_instant());

            if let Err(e) = self.store.put(&key, file.data, &file.content_type).await {
                error!(
                    superhero_id = %superhero_id,
                    key = %key,
                    written = created.len(),
                    error = %e,
                    "Image upload failed, aborting batch"
                );
                return Err(e.into());
            }

            let image = self
                .repo
                .create_image(NewSuperheroImage {
                    superhero_id,
                    url: self.codec.public_url(&key),
                    order,
                })
                .await
                .inspect_err(|e| {
                    error!(
                        superhero_id = %superhero_id,
                        key = %key,
                        error = %e,
                        "Image row insert failed, uploaded object is orphaned"
                    );
                })?;

            debug!(
                superhero_id = %superhero_id,
                image_id = %image.id,
                order,
                key = %key,
                "Image stored"
            );
            created.push(image);
        }

        Ok(created)
    }
}
