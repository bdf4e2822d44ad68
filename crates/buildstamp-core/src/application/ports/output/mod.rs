//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;
use std::sync::Arc;

use crate::domain::LanguageTemplate;
use crate::error::BuildstampResult;

/// Port for language template lookup.
///
/// Implemented by:
/// - `buildstamp_adapters::catalog::InMemoryCatalog` (built-in and user manifests)
///
/// Templates are immutable once registered and shared as `Arc`, so lookups
/// from parallel renders need no coordination.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateCatalog: Send + Sync {
    /// Template for a language id or alias, matched case-insensitively.
    ///
    /// Fails with `DomainError::UnsupportedLanguage` when nothing matches.
    fn get(&self, language: &str) -> BuildstampResult<Arc<LanguageTemplate>>;

    /// All templates, ordered by language id.
    fn list(&self) -> BuildstampResult<Vec<Arc<LanguageTemplate>>>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `buildstamp_adapters::filesystem::LocalFilesystem` (production)
/// - `buildstamp_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BuildstampResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> BuildstampResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> BuildstampResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> BuildstampResult<()>;
}
