//! Application layer for buildstamp.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (RenderService, StampService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{LanguageInfo, RenderService, StampService, WriteOptions, WrittenFile, WrittenPair};

pub use ports::{Filesystem, TemplateCatalog};

pub use error::ApplicationError;
