//! Superhero records and their ordered image attachments.
//!
//! Images live in object storage; one row per image records its public URL
//! and display position. [`SuperheroService`] sequences every mutation:
//!
//! - [`codec`] maps storage keys to public URLs and back
//! - [`guard`] enforces upload limits before any side effect
//! - [`writer`] uploads a batch and inserts one row per file
//! - [`remover`] deletes objects, then rows
//! - [`reorder`] applies new display positions

pub mod codec;
pub mod error;
pub mod guard;
pub mod remover;
pub mod reorder;
pub mod repository;
pub mod service;
pub mod types;
pub mod writer;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

pub use codec::{KeyCodec, next_upload_instant};
pub use error::{ErrorKind, SuperheroError};
pub use guard::{MAX_FILES_PER_BATCH, MAX_IMAGE_BYTES};
pub use remover::{AttachmentRemover, OwnershipCheck};
pub use reorder::ReorderApplier;
pub use repository::SuperheroRepository;
pub use service::{MediaSettings, SuperheroService};
pub use types::{
    DEFAULT_CONTENT_TYPE, ImageOrder, ImageSelection, ImageUpload, NewSuperheroImage, Superhero,
    SuperheroChanges, SuperheroFields, SuperheroImage, UpdateSuperheroInput, sort_images,
};
pub use writer::AttachmentWriter;
