use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::naming::NamingRegistry;
use crate::domain::value_objects::{CanonicalField, DescriptorName, EscapeStyle, NamingConvention};

// ============================================================================
// Skeletons
// ============================================================================

/// Which half of a rendered pair a skeleton produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Names the fields (header, interface, schema).
    Declaration,
    /// Binds the fields to values.
    Definition,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Definition => "definition",
        }
    }

    const fn default_slot(self) -> SlotKind {
        match self {
            Self::Declaration => SlotKind::Name,
            Self::Definition => SlotKind::Value,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Name,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub field: CanonicalField,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Slot(Slot),
}

/// A parsed skeleton: literal text interleaved with field slots.
///
/// ## Placeholder syntax
///
/// - `{{Field}}`: name in a declaration, escaped value in a definition
/// - `{{Field.name}}`: always the name
/// - `{{Field.value}}`: the escaped value (definitions only)
///
/// Parsing enforces that fields first appear in canonical order, that all
/// five are present, and that a definition has exactly one value slot per
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    kind: ArtifactKind,
    segments: Vec<Segment>,
}

impl Skeleton {
    pub fn parse(kind: ArtifactKind, source: &str) -> Result<Self, DomainError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                DomainError::InvalidTemplate(format!("unterminated placeholder in {kind} skeleton"))
            })?;

            segments.push(Segment::Slot(parse_slot(kind, &after[..end])?));
            rest = &after[end + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        let skeleton = Self { kind, segments };
        skeleton.validate()?;
        Ok(skeleton)
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(slot) => Some(*slot),
            Segment::Text(_) => None,
        })
    }

    /// Fields in order of first appearance.
    pub fn field_order(&self) -> Vec<CanonicalField> {
        let mut order = Vec::with_capacity(CanonicalField::ALL.len());
        for slot in self.slots() {
            if !order.contains(&slot.field) {
                order.push(slot.field);
            }
        }
        order
    }

    fn validate(&self) -> Result<(), DomainError> {
        let kind = self.kind;

        if kind == ArtifactKind::Declaration {
            if let Some(slot) = self.slots().find(|s| s.kind == SlotKind::Value) {
                return Err(DomainError::InvalidTemplate(format!(
                    "value slot for {} in declaration skeleton",
                    slot.field
                )));
            }
        }

        let order = self.field_order();
        if order != CanonicalField::ALL {
            let found: Vec<&str> = order.iter().map(|f| f.as_str()).collect();
            return Err(DomainError::InvalidTemplate(format!(
                "{kind} skeleton must reference Version, CommitHash, CommitDate, CommitDescriptor, BuildDate in that order (found: {})",
                if found.is_empty() {
                    "none".to_string()
                } else {
                    found.join(", ")
                }
            )));
        }

        if kind == ArtifactKind::Definition {
            for field in CanonicalField::ALL {
                let values = self
                    .slots()
                    .filter(|s| s.field == field && s.kind == SlotKind::Value)
                    .count();
                if values != 1 {
                    return Err(DomainError::InvalidTemplate(format!(
                        "definition skeleton has {values} value slots for {field}, expected 1"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn parse_slot(kind: ArtifactKind, inner: &str) -> Result<Slot, DomainError> {
    let compact: String = inner.split_whitespace().collect();
    let (name, suffix) = match compact.split_once('.') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (compact.as_str(), None),
    };

    let field = CanonicalField::from_placeholder(name).ok_or_else(|| {
        DomainError::InvalidTemplate(format!("unknown placeholder '{{{{{compact}}}}}'"))
    })?;

    let slot_kind = match suffix {
        None => kind.default_slot(),
        Some("name") => SlotKind::Name,
        Some("value") => SlotKind::Value,
        Some(other) => {
            return Err(DomainError::InvalidTemplate(format!(
                "unknown placeholder accessor '.{other}' on {field}"
            )));
        }
    };

    Ok(Slot {
        field,
        kind: slot_kind,
    })
}

// ============================================================================
// Language template
// ============================================================================

/// Default file names of a rendered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateFiles {
    pub declaration: String,
    pub definition: String,
}

impl TemplateFiles {
    pub fn new(declaration: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            definition: definition.into(),
        }
    }
}

/// Everything needed to emit build info for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTemplate {
    language: String,
    display_name: String,
    aliases: Vec<String>,
    description: String,
    convention: NamingConvention,
    escape: EscapeStyle,
    files: TemplateFiles,
    overrides: BTreeMap<CanonicalField, String>,
    declaration: Skeleton,
    definition: Skeleton,
}

impl LanguageTemplate {
    pub fn builder() -> LanguageTemplateBuilder {
        LanguageTemplateBuilder::default()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    pub fn escape(&self) -> EscapeStyle {
        self.escape
    }

    pub fn files(&self) -> &TemplateFiles {
        &self.files
    }

    pub fn overrides(&self) -> &BTreeMap<CanonicalField, String> {
        &self.overrides
    }

    pub fn declaration(&self) -> &Skeleton {
        &self.declaration
    }

    pub fn definition(&self) -> &Skeleton {
        &self.definition
    }

    /// Case-insensitive match against the id and aliases.
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        self.language.eq_ignore_ascii_case(selector)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(selector))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LanguageTemplateBuilder {
    language: Option<String>,
    display_name: Option<String>,
    aliases: Vec<String>,
    description: Option<String>,
    convention: Option<NamingConvention>,
    escape: Option<EscapeStyle>,
    files: Option<TemplateFiles>,
    overrides: BTreeMap<CanonicalField, String>,
    declaration: Option<String>,
    definition: Option<String>,
}

impl LanguageTemplateBuilder {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn convention(mut self, convention: NamingConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn escape(mut self, escape: EscapeStyle) -> Self {
        self.escape = Some(escape);
        self
    }

    pub fn files(mut self, files: TemplateFiles) -> Self {
        self.files = Some(files);
        self
    }

    /// Pin the identifier of one field, bypassing the convention.
    pub fn override_spelling(mut self, field: CanonicalField, ident: impl Into<String>) -> Self {
        self.overrides.insert(field, ident.into());
        self
    }

    pub fn declaration(mut self, skeleton: impl Into<String>) -> Self {
        self.declaration = Some(skeleton.into());
        self
    }

    pub fn definition(mut self, skeleton: impl Into<String>) -> Self {
        self.definition = Some(skeleton.into());
        self
    }

    pub fn build(self) -> Result<LanguageTemplate, DomainError> {
        let language = self
            .language
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| DomainError::InvalidTemplate("template language is required".into()))?;

        if language.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidTemplate(format!(
                "language id '{language}' contains whitespace"
            )));
        }

        let missing = |what: &str| {
            DomainError::InvalidTemplate(format!("template '{language}' is missing {what}"))
        };

        let convention = self.convention.ok_or_else(|| missing("a naming convention"))?;
        let escape = self.escape.ok_or_else(|| missing("an escape style"))?;
        let files = self.files.ok_or_else(|| missing("output file names"))?;
        if files.declaration.trim().is_empty() || files.definition.trim().is_empty() {
            return Err(missing("output file names"));
        }
        if files.declaration == files.definition {
            return Err(DomainError::InvalidTemplate(format!(
                "template '{language}' writes both halves to '{}'",
                files.declaration
            )));
        }

        let declaration = Skeleton::parse(
            ArtifactKind::Declaration,
            &self.declaration.ok_or_else(|| missing("a declaration skeleton"))?,
        )?;
        let definition = Skeleton::parse(
            ArtifactKind::Definition,
            &self.definition.ok_or_else(|| missing("a definition skeleton"))?,
        )?;

        for (field, ident) in &self.overrides {
            if !is_identifier(ident) {
                return Err(DomainError::InvalidTemplate(format!(
                    "override for {field} in '{language}' is not an identifier: '{ident}'"
                )));
            }
        }

        // Overrides must stay distinct from every generated spelling,
        // whichever descriptor name ends up being emitted.
        for descriptor in [DescriptorName::Smart, DescriptorName::TagOrBranch] {
            NamingRegistry::standard()
                .with_descriptor(descriptor)
                .spellings(&language, convention, &self.overrides)?;
        }

        Ok(LanguageTemplate {
            display_name: self.display_name.unwrap_or_else(|| language.clone()),
            aliases: self
                .aliases
                .into_iter()
                .map(|a| a.trim().to_ascii_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            description: self.description.unwrap_or_default(),
            language,
            convention,
            escape,
            files,
            overrides: self.overrides,
            declaration,
            definition,
        })
    }
}

fn is_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}
