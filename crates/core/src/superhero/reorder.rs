//! Apply new display positions to existing images.

use std::collections::HashSet;

use hero_shared::{SuperheroId, SuperheroImageId};
use tracing::{debug, warn};

use super::error::SuperheroError;
use super::repository::SuperheroRepository;
use super::types::ImageOrder;

/// Validates and applies `(image id, order)` assignments for one superhero.
pub struct ReorderApplier<'a, R> {
    repo: &'a R,
}

impl<'a, R: SuperheroRepository> ReorderApplier<'a, R> {
    /// Create an applier over the repository.
    #[must_use]
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Check that assignments are well formed and every image belongs to `superhero_id`.
    ///
    /// Orders may repeat; ties are broken by image id when reading.
    ///
    /// # Errors
    ///
    /// Returns a validation error for duplicate ids or negative orders, and
    /// [`SuperheroError::OwnershipMismatch`] if any image is not owned.
    pub async fn validate(
        &self,
        superhero_id: SuperheroId,
        orders: &[ImageOrder],
    ) -> Result<(), SuperheroError> {
        if orders.is_empty() {
            return Ok(());
        }

        check_assignments(orders)?;

        let ids: Vec<SuperheroImageId> = orders.iter().map(|o| o.id).collect();
        let matched = self.repo.find_images(superhero_id, &ids).await?;
        if matched.len() != ids.len() {
            warn!(
                superhero_id = %superhero_id,
                requested = ids.len(),
                matched = matched.len(),
                "Image ownership mismatch in reorder"
            );
            return Err(SuperheroError::OwnershipMismatch {
                requested: ids.len(),
                matched: matched.len(),
            });
        }
        Ok(())
    }

    /// Write each assignment as an independent point update.
    ///
    /// Call [`Self::validate`] first.
    ///
    /// # Errors
    ///
    /// Returns the first repository error; earlier updates stay applied.
    pub async fn apply_validated(
        &self,
        superhero_id: SuperheroId,
        orders: &[ImageOrder],
    ) -> Result<(), SuperheroError> {
        for assignment in orders {
            self.repo
                .update_image_order(assignment.id, assignment.order)
                .await?;
        }
        if !orders.is_empty() {
            debug!(superhero_id = %superhero_id, count = orders.len(), "Image order applied");
        }
        Ok(())
    }

    /// Validate then apply.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`] and [`Self::apply_validated`].
    pub async fn apply(
        &self,
        superhero_id: SuperheroId,
        orders: &[ImageOrder],
    ) -> Result<(), SuperheroError> {
        self.validate(superhero_id, orders).await?;
        self.apply_validated(superhero_id, orders).await
    }
}

fn check_assignments(orders: &[ImageOrder]) -> Result<(), SuperheroError> {
    let mut seen = HashSet::with_capacity(orders.len());
    for assignment in orders {
        if assignment.order < 0 {
            return Err(SuperheroError::validation(format!(
                "order for image {} must not be negative",
                assignment.id
            )));
        }
        if !seen.insert(assignment.id) {
            return Err(SuperheroError::validation(format!(
                "image {} appears more than once in image_orders",
                assignment.id
            )));
        }
    }
    Ok(())
}
