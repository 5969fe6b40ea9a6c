//! Delete images: objects first, then their rows.

use std::collections::BTreeSet;

use hero_shared::{SuperheroId, SuperheroImageId};
use tracing::{debug, error, warn};

use super::codec::KeyCodec;
use super::error::SuperheroError;
use super::repository::SuperheroRepository;
use super::types::SuperheroImage;
use crate::storage::ObjectStore;

/// How ids that do not belong to the superhero are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipCheck {
    /// Fail with [`SuperheroError::OwnershipMismatch`] and delete nothing.
    Strict,
    /// Silently ignore foreign or unknown ids.
    Lenient,
}

/// Removes images of one superhero.
pub struct AttachmentRemover<'a, R, S> {
    repo: &'a R,
    store: &'a S,
    codec: &'a KeyCodec,
}

impl<'a, R: SuperheroRepository, S: ObjectStore> AttachmentRemover<'a, R, S> {
    /// Create a remover over the given collaborators.
    #[must_use]
    pub fn new(repo: &'a R, store: &'a S, codec: &'a KeyCodec) -> Self {
        Self { repo, store, codec }
    }

    /// Resolve `ids` to images owned by `superhero_id`.
    ///
    /// Duplicate ids count once.
    ///
    /// # Errors
    ///
    /// Under [`OwnershipCheck::Strict`], fails if any id is not owned by the superhero.
    pub async fn resolve(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
        check: OwnershipCheck,
    ) -> Result<Vec<SuperheroImage>, SuperheroError> {
        let requested: Vec<SuperheroImageId> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let matched = self.repo.find_images(superhero_id, &requested).await?;
        if check == OwnershipCheck::Strict && matched.len() != requested.len() {
            warn!(
                superhero_id = %superhero_id,
                requested = requested.len(),
                matched = matched.len(),
                "Image ownership mismatch"
            );
            return Err(SuperheroError::OwnershipMismatch {
                requested: requested.len(),
                matched: matched.len(),
            });
        }
        Ok(matched)
    }

    /// Delete the stored objects of `images`, then their rows.
    ///
    /// Objects whose URL does not map back to a key are skipped. The first
    /// failed object delete aborts the call before any row is deleted.
    ///
    /// # Errors
    ///
    /// Returns the first storage or repository error.
    pub async fn remove_resolved(
        &self,
        superhero_id: SuperheroId,
        images: &[SuperheroImage],
    ) -> Result<u64, SuperheroError> {
        if images.is_empty() {
            return Ok(0);
        }

        self.delete_objects(superhero_id, images).await?;

        let ids: Vec<SuperheroImageId> = images.iter().map(|i| i.id).collect();
        let deleted = self.repo.delete_images(superhero_id, &ids).await?;
        debug!(superhero_id = %superhero_id, deleted, "Image rows deleted");
        Ok(deleted)
    }

    /// Resolve and remove in one step.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`] and [`Self::remove_resolved`].
    pub async fn remove(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
        check: OwnershipCheck,
    ) -> Result<u64, SuperheroError> {
        let images = self.resolve(superhero_id, ids, check).await?;
        self.remove_resolved(superhero_id, &images).await
    }

    /// Delete the stored object behind every image, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first storage error.
    pub async fn delete_objects(
        &self,
        superhero_id: SuperheroId,
        images: &[SuperheroImage],
    ) -> Result<(), SuperheroError> {
        for image in images {
            let Some(key) = self.codec.key_from_public_url(&image.url) else {
                warn!(
                    superhero_id = %superhero_id,
                    image_id = %image.id,
                    url = %image.url,
                    "Image URL is outside the public base, skipping object delete"
                );
                continue;
            };

            self.store.delete(key).await.inspect_err(|e| {
                error!(
                    superhero_id = %superhero_id,
                    image_id = %image.id,
                    key = %key,
                    error = %e,
                    "Object delete failed"
                );
            })?;
        }
        Ok(())
    }
}
