//! Relational store seam for superheroes and their images.

use std::future::Future;

use hero_shared::{SuperheroId, SuperheroImageId};

use super::error::SuperheroError;
use super::types::{
    ImageSelection, NewSuperheroImage, Superhero, SuperheroChanges, SuperheroFields,
    SuperheroImage,
};

/// Repository trait for superhero persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// Image lists are returned in display order (`order` asc, then `id` asc).
pub trait SuperheroRepository: Send + Sync {
    /// Create a superhero record. The returned value has no images.
    fn create(
        &self,
        fields: SuperheroFields,
    ) -> impl Future<Output = Result<Superhero, SuperheroError>> + Send;

    /// Find a superhero by ID with the selected images.
    fn find_by_id(
        &self,
        id: SuperheroId,
        images: ImageSelection,
    ) -> impl Future<Output = Result<Option<Superhero>, SuperheroError>> + Send;

    /// List all superheroes, ascending by ID, with the selected images.
    fn list(
        &self,
        images: ImageSelection,
    ) -> impl Future<Output = Result<Vec<Superhero>, SuperheroError>> + Send;

    /// Apply field changes. The returned value has no images.
    fn update(
        &self,
        id: SuperheroId,
        changes: SuperheroChanges,
    ) -> impl Future<Output = Result<Superhero, SuperheroError>> + Send;

    /// Delete a superhero; its images are removed by cascade.
    fn delete(&self, id: SuperheroId) -> impl Future<Output = Result<bool, SuperheroError>> + Send;

    /// Check if a superhero exists.
    fn exists(&self, id: SuperheroId) -> impl Future<Output = Result<bool, SuperheroError>> + Send;

    /// Create an image record.
    fn create_image(
        &self,
        input: NewSuperheroImage,
    ) -> impl Future<Output = Result<SuperheroImage, SuperheroError>> + Send;

    /// Find the images among `ids` that belong to `superhero_id`.
    fn find_images(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
    ) -> impl Future<Output = Result<Vec<SuperheroImage>, SuperheroError>> + Send;

    /// Set the display position of one image.
    fn update_image_order(
        &self,
        image_id: SuperheroImageId,
        order: i32,
    ) -> impl Future<Output = Result<(), SuperheroError>> + Send;

    /// Delete the images among `ids` that belong to `superhero_id`.
    fn delete_images(
        &self,
        superhero_id: SuperheroId,
        ids: &[SuperheroImageId],
    ) -> impl Future<Output = Result<u64, SuperheroError>> + Send;

    /// Highest image `order` of a superhero, if it has any images.
    fn max_image_order(
        &self,
        superhero_id: SuperheroId,
    ) -> impl Future<Output = Result<Option<i32>, SuperheroError>> + Send;
}
