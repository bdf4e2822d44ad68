//! Skeleton filling.

use crate::domain::entities::{LanguageTemplate, MetadataRecord, RenderedPair, Segment, Skeleton, SlotKind};
use crate::domain::error::DomainError;
use crate::domain::escape::escape;
use crate::domain::naming::{FieldSpellings, NamingRegistry};
use crate::domain::value_objects::EscapeStyle;

/// Render `record` through `template`.
///
/// Spellings come from `registry` under the template's convention, with the
/// template's overrides taking precedence. Fails only when the registry
/// cannot spell the template's convention or the spellings collide.
pub fn render(
    record: &MetadataRecord,
    template: &LanguageTemplate,
    registry: &NamingRegistry,
) -> Result<RenderedPair, DomainError> {
    let spellings = registry.spellings_for(template)?;

    let declaration = fill(template.declaration(), record, &spellings, template.escape());
    let definition = fill(template.definition(), record, &spellings, template.escape());

    Ok(RenderedPair::new(template, spellings, declaration, definition))
}

fn fill(
    skeleton: &Skeleton,
    record: &MetadataRecord,
    spellings: &FieldSpellings,
    style: EscapeStyle,
) -> String {
    let mut out = String::new();
    for segment in skeleton.segments() {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Slot(slot) => match slot.kind {
                SlotKind::Name => out.push_str(spellings.get(slot.field)),
                SlotKind::Value => out.push_str(&escape(style, record.get(slot.field))),
            },
        }
    }
    out
}
