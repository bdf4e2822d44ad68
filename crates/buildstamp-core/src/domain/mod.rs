//! Core domain layer for buildstamp.
//!
//! Pure logic over immutable values: no I/O, no clock, no global state.
//! Templates arrive already parsed; the catalog that stores them is a port
//! defined in the application layer.
//!
//! ## Pieces
//!
//! - **value_objects**: the five canonical fields, naming conventions,
//!   descriptor names, escape styles
//! - **naming**: the field naming registry (spell and resolve)
//! - **entities**: metadata record, language template, rendered pair
//! - **render**: skeleton filling
//! - **validation**: the consistency validator
pub mod entities;
pub mod error;
pub mod escape;
pub mod naming;
pub mod render;
pub mod validation;
pub mod value_objects;

pub use entities::{
    ArtifactKind, LanguageTemplate, LanguageTemplateBuilder, MetadataBuilder, MetadataRecord,
    RenderedPair, Segment, Skeleton, Slot, SlotKind, TemplateFiles,
    metadata::{
        DATE_FORMAT, DEFAULT_FILE_PATTERN, DEFAULT_TAG_PATTERN, GIT_DATE_FORMAT, extract_version,
        normalize_git_date, smart_descriptor,
    },
};

pub use error::{DomainError, ErrorCategory, MISSING};
pub use escape::escape;
pub use naming::{CaseRule, FieldSpellings, NamingRegistry, WordCase};
pub use render::render;
pub use validation::ConsistencyValidator;
pub use value_objects::{CanonicalField, DescriptorName, EscapeStyle, Lexicon, NamingConvention};
