//! Upload limits checked before any side effect.

use super::error::SuperheroError;
use super::types::ImageUpload;

/// Per-file ceiling for superhero images: 2 MiB.
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Maximum number of files accepted in one batch.
pub const MAX_FILES_PER_BATCH: usize = 10;

/// Reject the batch if any file exceeds `max_bytes`.
///
/// # Errors
///
/// Returns [`SuperheroError::FileTooLarge`] naming every oversized file.
pub fn assert_within_limit(files: &[ImageUpload], max_bytes: u64) -> Result<(), SuperheroError> {
    let too_large: Vec<String> = files
        .iter()
        .filter(|f| f.size() > max_bytes)
        .map(|f| f.filename.clone())
        .collect();

    if too_large.is_empty() {
        Ok(())
    } else {
        Err(SuperheroError::FileTooLarge {
            files: too_large,
            max: max_bytes,
        })
    }
}

/// Reject the batch if it holds more than `max_files` files.
///
/// # Errors
///
/// Returns [`SuperheroError::TooManyFiles`].
pub fn assert_batch_size(files: &[ImageUpload], max_files: usize) -> Result<(), SuperheroError> {
    if files.len() > max_files {
        return Err(SuperheroError::TooManyFiles {
            count: files.len(),
            max: max_files,
        });
    }
    Ok(())
}
