//! In-memory template catalog seeded from the built-in manifests.

use std::{collections::BTreeMap, path::Path, sync::Arc};

use tracing::{debug, info, instrument, warn};

use buildstamp_core::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::{DomainError, LanguageTemplate},
    error::BuildstampResult,
};

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Template catalog keyed by language id.
///
/// Built once, then shared read-only: registration takes `&mut self`, lookups
/// take `&self` and hand out `Arc`s.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    templates: BTreeMap<String, Arc<LanguageTemplate>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the built-in templates.
    pub fn with_builtin() -> BuildstampResult<Self> {
        let mut catalog = Self::new();
        let builtin = builtin_templates::all_templates().map_err(|e| {
            ApplicationError::CatalogUnavailable {
                reason: e.to_string(),
            }
        })?;
        for template in builtin {
            catalog.insert(template);
        }
        Ok(catalog)
    }

    /// Built-in templates plus the first user templates directory that
    /// exists (see [`builtin_templates::user_template_dirs`]).
    ///
    /// User templates replace built-ins with the same language id. An
    /// `explicit` directory that does not exist is an error; the implicit
    /// candidates are skipped when missing.
    #[instrument]
    pub fn discover(explicit: Option<&Path>) -> BuildstampResult<Self> {
        let mut catalog = Self::with_builtin()?;

        if let Some(dir) = explicit {
            if !dir.is_dir() {
                return Err(ApplicationError::CatalogUnavailable {
                    reason: format!("templates directory not found: {}", dir.display()),
                }
                .into());
            }
        }

        for candidate in builtin_templates::user_template_dirs(explicit) {
            if !candidate.is_dir() {
                debug!(path = %candidate.display(), "path does not exist, skipping");
                continue;
            }

            let loaded = catalog.load_dir(&candidate)?;
            info!(
                path = %candidate.display(),
                count = loaded,
                "user templates loaded"
            );
            break;
        }

        Ok(catalog)
    }

    /// Load every valid manifest under `dir`. Returns how many were added.
    pub fn load_dir(&mut self, dir: &Path) -> BuildstampResult<usize> {
        let templates = FilesystemTemplateLoader::new(dir).load_all()?;
        let count = templates.len();
        for template in templates {
            self.insert(Arc::new(template));
        }
        Ok(count)
    }

    /// Register a template, returning the one it replaced.
    pub fn insert(&mut self, template: Arc<LanguageTemplate>) -> Option<Arc<LanguageTemplate>> {
        let id = template.language().to_string();

        for alias in template.aliases() {
            if let Some(owner) = self
                .templates
                .values()
                .find(|t| t.language() != id && t.matches(alias))
            {
                warn!(
                    alias = %alias,
                    language = %id,
                    owner = owner.language(),
                    "alias already claimed by another template"
                );
            }
        }

        let replaced = self.templates.insert(id, template);
        if let Some(old) = &replaced {
            debug!(language = old.language(), "template replaced");
        }
        replaced
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateCatalog for InMemoryCatalog {
    fn get(&self, language: &str) -> BuildstampResult<Arc<LanguageTemplate>> {
        let wanted = language.trim().to_ascii_lowercase();

        self.templates
            .get(&wanted)
            .or_else(|| self.templates.values().find(|t| t.matches(&wanted)))
            .cloned()
            .ok_or_else(|| {
                DomainError::UnsupportedLanguage {
                    language: language.to_string(),
                    available: self.templates.keys().cloned().collect(),
                }
                .into()
            })
    }

    fn list(&self) -> BuildstampResult<Vec<Arc<LanguageTemplate>>> {
        Ok(self.templates.values().cloned().collect())
    }
}
