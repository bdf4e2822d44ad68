//! Render Service - catalog lookup, rendering and consistency checks.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::ports::TemplateCatalog,
    domain::{
        self, ConsistencyValidator, LanguageTemplate, MetadataRecord, NamingConvention,
        NamingRegistry, RenderedPair,
    },
    error::BuildstampResult,
};

/// Information about a language template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub language: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub convention: String,
    pub declaration_file: String,
    pub definition_file: String,
    pub description: String,
}

impl From<&LanguageTemplate> for LanguageInfo {
    fn from(t: &LanguageTemplate) -> Self {
        Self {
            language: t.language().to_string(),
            name: t.display_name().to_string(),
            aliases: t.aliases().to_vec(),
            convention: t.convention().to_string(),
            declaration_file: t.files().declaration.clone(),
            definition_file: t.files().definition.clone(),
            description: t.description().to_string(),
        }
    }
}

/// Binds metadata records to language templates.
pub struct RenderService {
    catalog: Box<dyn TemplateCatalog>,
    registry: NamingRegistry,
}

impl RenderService {
    /// Create a render service over a catalog, with the standard registry.
    pub fn new(catalog: Box<dyn TemplateCatalog>) -> Self {
        Self {
            catalog,
            registry: NamingRegistry::standard(),
        }
    }

    /// Replace the naming registry (descriptor name, custom rules).
    pub fn with_registry(mut self, registry: NamingRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &NamingRegistry {
        &self.registry
    }

    /// Render `record` for one language. No filesystem access.
    #[instrument(skip_all, fields(language = %language))]
    pub fn render(&self, record: &MetadataRecord, language: &str) -> BuildstampResult<RenderedPair> {
        let template = self.catalog.get(language)?;
        debug!(
            template = template.language(),
            convention = %template.convention(),
            "Template resolved"
        );

        let pair = domain::render(record, &template, &self.registry)?;
        info!(
            declaration_bytes = pair.declaration().len(),
            definition_bytes = pair.definition().len(),
            "Rendered"
        );
        Ok(pair)
    }

    /// Render and validate before handing the pair out.
    pub fn render_checked(
        &self,
        record: &MetadataRecord,
        language: &str,
    ) -> BuildstampResult<RenderedPair> {
        let pair = self.render(record, language)?;
        self.validate(&pair)?;
        Ok(pair)
    }

    /// Run the consistency validator on a pair.
    pub fn validate(&self, pair: &RenderedPair) -> BuildstampResult<()> {
        ConsistencyValidator::new(&self.registry).validate(pair)?;
        Ok(())
    }

    /// Validate two texts that claim to be a `language` pair.
    ///
    /// Spellings follow the template unless `convention` names a different
    /// one, in which case the template's overrides do not apply.
    #[instrument(skip(self, declaration, definition))]
    pub fn check(
        &self,
        language: &str,
        convention: Option<NamingConvention>,
        declaration: &str,
        definition: &str,
    ) -> BuildstampResult<()> {
        let template = self.catalog.get(language)?;

        let spellings = match convention {
            Some(conv) if conv != template.convention() => {
                self.registry
                    .spellings(template.language(), conv, &BTreeMap::new())?
            }
            _ => self.registry.spellings_for(&template)?,
        };

        let pair = RenderedPair::new(&template, spellings, declaration, definition);
        self.validate(&pair)
    }

    /// All languages in the catalog.
    pub fn languages(&self) -> BuildstampResult<Vec<LanguageInfo>> {
        Ok(self
            .catalog
            .list()?
            .iter()
            .map(|t| LanguageInfo::from(t.as_ref()))
            .collect())
    }
}
