use serde::Serialize;

use crate::domain::entities::template::{LanguageTemplate, TemplateFiles};
use crate::domain::naming::FieldSpellings;
use crate::domain::value_objects::{EscapeStyle, NamingConvention};

/// A declaration and a definition emitted for one language.
///
/// Carries the spellings it was rendered with so the pair can be validated
/// on its own, long after the template lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPair {
    language: String,
    convention: NamingConvention,
    #[serde(skip)]
    escape: EscapeStyle,
    spellings: FieldSpellings,
    declaration: String,
    definition: String,
    files: TemplateFiles,
}

impl RenderedPair {
    /// Pair the two texts with the template they claim to come from.
    pub fn new(
        template: &LanguageTemplate,
        spellings: FieldSpellings,
        declaration: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            language: template.language().to_string(),
            convention: spellings.convention(),
            escape: template.escape(),
            spellings,
            declaration: declaration.into(),
            definition: definition.into(),
            files: template.files().clone(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    pub fn escape(&self) -> EscapeStyle {
        self.escape
    }

    pub fn spellings(&self) -> &FieldSpellings {
        &self.spellings
    }

    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Suggested file names.
    pub fn files(&self) -> &TemplateFiles {
        &self.files
    }
}
