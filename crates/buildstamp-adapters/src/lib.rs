//! Infrastructure adapters for buildstamp.
//!
//! This crate implements the ports defined in
//! `buildstamp-core::application::ports`: the template catalog (built-in TOML
//! manifests plus user manifest directories) and the filesystem.

pub mod builtin_templates;
pub mod catalog;
pub mod filesystem;
pub mod template_loader;

pub use catalog::InMemoryCatalog;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use template_loader::{FilesystemTemplateLoader, parse_manifest};
