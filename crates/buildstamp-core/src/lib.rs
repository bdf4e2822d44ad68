//! buildstamp core - build metadata rendering engine.
//!
//! Turns a language-neutral [`MetadataRecord`](domain::MetadataRecord) into
//! a pair of source files (a declaration and a definition) for a target
//! language, and checks that such pairs agree on their field names.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         buildstamp-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (RenderService, StampService)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (TemplateCatalog, Filesystem)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   buildstamp-adapters (Infrastructure)  │
//! │ (InMemoryCatalog, LocalFilesystem, etc) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (NamingRegistry, render, validation)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use buildstamp_core::prelude::*;
//! # fn demo(catalog: Box<dyn TemplateCatalog>) -> BuildstampResult<()> {
//! let record = MetadataRecord::new("1.4.0", "a1b2c3d", "2024-05-01-1200", "v1.4.0", "2024-05-02-0800");
//!
//! let service = RenderService::new(catalog);
//! let pair = service.render_checked(&record, "go")?;
//! println!("{}", pair.declaration());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        LanguageInfo, RenderService, StampService, WriteOptions,
        ports::{Filesystem, TemplateCatalog},
    };
    pub use crate::domain::{
        CanonicalField, DescriptorName, EscapeStyle, LanguageTemplate, MetadataRecord,
        NamingConvention, NamingRegistry, RenderedPair,
    };
    pub use crate::error::{BuildstampError, BuildstampResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
