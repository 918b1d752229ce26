//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Image upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The declared content type is not an accepted image type.
    #[error("Invalid file type. Only images allowed.")]
    UnsupportedType(String),

    #[error("File too large. Max size is {} MB.", .limit / (1024 * 1024))]
    TooLarge { limit: usize },

    #[error("Failed to store upload: {0}")]
    Io(String),
}
