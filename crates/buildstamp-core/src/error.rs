//! Unified error handling for buildstamp core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions and a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for buildstamp core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildstampError {
    /// Errors from the domain layer (bad input, drift between files).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and I/O).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl BuildstampError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in buildstamp".into(),
                "Please report this issue at: https://github.com/cosecruz/buildstamp/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Consistency => ErrorCategory::Consistency,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Consistency,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type BuildstampResult<T> = Result<T, BuildstampError>;
