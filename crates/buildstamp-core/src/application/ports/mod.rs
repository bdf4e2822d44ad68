//! Application ports (traits) for external dependencies.
//!
//! Adapters in `buildstamp-adapters` implement these.
//!
//! - `TemplateCatalog`: language template lookup
//! - `Filesystem`: file operations

pub mod output;

pub use output::{Filesystem, TemplateCatalog};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateCatalog};
