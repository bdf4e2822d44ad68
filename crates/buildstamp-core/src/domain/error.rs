// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::CanonicalField;

/// Marker used in consistency reports when one side of a pair lacks a field.
pub const MISSING: &str = "<missing>";

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside reports and through the CLI)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
///
/// None of them are retryable: they describe bad input, never a transient
/// condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("unsupported naming convention '{convention}'")]
    UnsupportedConvention { convention: String },

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error(
        "template '{language}' spells both {first} and {second} as '{spelling}'"
    )]
    SpellingCollision {
        language: String,
        spelling: String,
        first: CanonicalField,
        second: CanonicalField,
    },

    #[error("invalid {field} value: {reason}")]
    InvalidMetadata {
        field: CanonicalField,
        reason: String,
    },

    #[error("no version found in {input} with pattern '{pattern}'")]
    NoVersionInContent { input: String, pattern: String },

    #[error("invalid version pattern '{pattern}': {reason}")]
    InvalidVersionPattern { pattern: String, reason: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("unsupported language '{language}'")]
    UnsupportedLanguage {
        language: String,
        available: Vec<String>,
    },

    // ========================================================================
    // Consistency Errors
    // ========================================================================
    #[error(
        "field {field} is inconsistent: declared as '{declared_as}', defined as '{defined_as}', expected '{expected}'"
    )]
    Consistency {
        field: CanonicalField,
        declared_as: String,
        defined_as: String,
        expected: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownField { field } => vec![
                format!("'{}' is not a build metadata field", field),
                format!(
                    "Known fields: {}",
                    CanonicalField::ALL
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                "CommitSmart and CommitTagOrBranch are accepted for CommitDescriptor".into(),
            ],
            Self::UnsupportedConvention { .. } => vec![
                "Supported conventions: snake_case, camelCase, PascalCase, kebab-case, SCREAMING_SNAKE"
                    .into(),
            ],
            Self::UnsupportedLanguage {
                language,
                available,
            } => {
                let mut out = vec![format!("No template is registered for '{}'", language)];
                if !available.is_empty() {
                    out.push(format!("Available languages: {}", available.join(", ")));
                }
                out.push("Try: buildstamp list".into());
                out
            }
            Self::Consistency {
                field, expected, ..
            } => vec![
                format!("Every occurrence of {} must be spelled '{}'", field, expected),
                "Regenerate both files from the same template: buildstamp generate".into(),
            ],
            Self::InvalidTemplate(_) => vec![
                "Placeholders look like {{Version}}, {{CommitHash.name}} or {{BuildDate.value}}"
                    .into(),
                "Each skeleton must reference all five fields in canonical order".into(),
            ],
            Self::SpellingCollision { .. } => vec![
                "Give each field a distinct spelling in the template's [overrides] table".into(),
            ],
            Self::NoVersionInContent { .. } => vec![
                "The first capture group of the pattern becomes the version".into(),
                "Adjust --version-tag-pattern or --version-pattern, or pass --version".into(),
            ],
            Self::InvalidVersionPattern { .. } => vec![
                "Patterns use Rust regex syntax and need one capture group, e.g. ^v?([0-9.]+)$"
                    .into(),
            ],
            Self::InvalidMetadata { field, .. } => match field {
                CanonicalField::CommitDate => vec![
                    "Commit dates are read in git's default format: 2006-01-02 15:04:05 -0700"
                        .into(),
                    "Pass the value verbatim with --commit-date instead".into(),
                ],
                _ => vec!["Check the metadata values you supplied".into()],
            },
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownField { .. }
            | Self::UnsupportedConvention { .. }
            | Self::InvalidTemplate(_)
            | Self::SpellingCollision { .. }
            | Self::InvalidMetadata { .. }
            | Self::NoVersionInContent { .. }
            | Self::InvalidVersionPattern { .. } => ErrorCategory::Validation,
            Self::UnsupportedLanguage { .. } => ErrorCategory::NotFound,
            Self::Consistency { .. } => ErrorCategory::Consistency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Consistency,
    NotFound,
}
