//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The template catalog could not be built.
    #[error("Template catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Output file exists and overwriting was not requested.
    #[error("Refusing to overwrite existing file {path}")]
    ArtifactExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// Request rejected before any work was done.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CatalogUnavailable { .. } => vec![
                "A template manifest failed to load".into(),
                "Check the manifests in your templates directory".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ArtifactExists { path } => vec![
                format!("File already exists: {}", path.display()),
                "Use --force to overwrite it".into(),
                "Or choose another --out-dir".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Remove the partially written file by hand: {}",
                path.display()
            )],
            Self::ValidationFailed(_) => vec!["Check the command arguments".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CatalogUnavailable { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::ArtifactExists { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
