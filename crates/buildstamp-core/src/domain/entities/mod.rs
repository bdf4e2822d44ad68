pub mod metadata;
pub mod rendered;
pub mod template;

pub use crate::domain::DomainError;
pub use metadata::{MetadataBuilder, MetadataRecord};
pub use rendered::RenderedPair;
pub use template::{
    ArtifactKind, LanguageTemplate, LanguageTemplateBuilder, Segment, Skeleton, Slot, SlotKind,
    TemplateFiles,
};
