//! Superhero error types.

use hero_shared::SuperheroId;
use thiserror::Error;

use crate::storage::StorageError;

/// Broad classification of a [`SuperheroError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input. Nothing was written.
    Validation,
    /// Object store failure. Earlier steps of the call may have been applied.
    UpstreamStorage,
    /// Relational store failure. Earlier steps of the call may have been applied.
    UpstreamMetadata,
    /// The superhero does not exist.
    NotFound,
}

/// Superhero operation errors.
#[derive(Debug, Error)]
pub enum SuperheroError {
    /// Malformed or inconsistent input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// One or more files exceed the per-file ceiling.
    #[error("each file must be {max} bytes or smaller (too large: {})", .files.join(", "))]
    FileTooLarge {
        /// Names of the offending files.
        files: Vec<String>,
        /// Maximum allowed size.
        max: u64,
    },

    /// Too many files in one batch.
    #[error("too many files: {count} exceeds maximum {max}")]
    TooManyFiles {
        /// Number of files sent.
        count: usize,
        /// Maximum allowed per batch.
        max: usize,
    },

    /// Some referenced images do not belong to the superhero.
    #[error("some images do not belong to this superhero ({matched} of {requested} found)")]
    OwnershipMismatch {
        /// Number of distinct image ids requested.
        requested: usize,
        /// Number of those owned by the superhero.
        matched: usize,
    },

    /// Superhero not found.
    #[error("superhero not found: {0}")]
    NotFound(SuperheroId),

    /// Object store operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl SuperheroError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::FileTooLarge { .. }
            | Self::TooManyFiles { .. }
            | Self::OwnershipMismatch { .. } => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::UpstreamStorage,
            Self::Repository(_) => ErrorKind::UpstreamMetadata,
        }
    }
}
