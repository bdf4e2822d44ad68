//! Field naming registry.
//!
//! Every field has one lower_snake base form. A convention is an explicit
//! [`CaseRule`] applied to the words of that base form; templates may pin
//! individual spellings through their override table, which always wins.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::entities::LanguageTemplate;
use crate::domain::error::DomainError;
use crate::domain::value_objects::{CanonicalField, DescriptorName, NamingConvention};

/// Word sequences that identify a field, aliases included.
const FIELD_WORDS: &[(&[&str], CanonicalField)] = &[
    (&["version"], CanonicalField::Version),
    (&["commit", "hash"], CanonicalField::CommitHash),
    (&["commit", "date"], CanonicalField::CommitDate),
    (&["commit", "descriptor"], CanonicalField::CommitDescriptor),
    (&["commit", "smart"], CanonicalField::CommitDescriptor),
    (&["commit", "tag", "or", "branch"], CanonicalField::CommitDescriptor),
    (&["build", "date"], CanonicalField::BuildDate),
];

// ── Case rules ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCase {
    Lower,
    Upper,
    Capitalized,
}

impl WordCase {
    fn push(self, word: &str, out: &mut String) {
        match self {
            Self::Lower => out.push_str(&word.to_lowercase()),
            Self::Upper => out.push_str(&word.to_uppercase()),
            Self::Capitalized => {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(&chars.as_str().to_lowercase());
                }
            }
        }
    }
}

/// How words are cased and joined under one convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseRule {
    pub separator: Option<char>,
    pub first: WordCase,
    pub rest: WordCase,
}

impl CaseRule {
    pub const fn new(separator: Option<char>, first: WordCase, rest: WordCase) -> Self {
        Self {
            separator,
            first,
            rest,
        }
    }

    /// The standard rule for a convention.
    pub const fn standard(convention: NamingConvention) -> Self {
        match convention {
            NamingConvention::SnakeCase => Self::new(Some('_'), WordCase::Lower, WordCase::Lower),
            NamingConvention::ScreamingSnake => {
                Self::new(Some('_'), WordCase::Upper, WordCase::Upper)
            }
            NamingConvention::KebabCase => Self::new(Some('-'), WordCase::Lower, WordCase::Lower),
            NamingConvention::CamelCase => {
                Self::new(None, WordCase::Lower, WordCase::Capitalized)
            }
            NamingConvention::PascalCase => {
                Self::new(None, WordCase::Capitalized, WordCase::Capitalized)
            }
        }
    }

    pub fn apply<'a>(&self, words: impl IntoIterator<Item = &'a str>) -> String {
        let mut out = String::new();
        for (i, word) in words.into_iter().enumerate() {
            if i == 0 {
                self.first.push(word, &mut out);
                continue;
            }
            if let Some(sep) = self.separator {
                out.push(sep);
            }
            self.rest.push(word, &mut out);
        }
        out
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Maps canonical fields to identifiers.
///
/// Cheap to clone and immutable once built; the standard registry carries a
/// rule for every [`NamingConvention`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRegistry {
    rules: BTreeMap<NamingConvention, CaseRule>,
    descriptor: DescriptorName,
}

impl Default for NamingRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl NamingRegistry {
    /// Registry with the standard rule for every convention.
    pub fn standard() -> Self {
        NamingConvention::ALL
            .into_iter()
            .fold(Self::empty(), |reg, conv| {
                reg.with_rule(conv, CaseRule::standard(conv))
            })
    }

    /// Registry without any rules. Every `spell` fails until rules are added.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
            descriptor: DescriptorName::default(),
        }
    }

    pub fn with_rule(mut self, convention: NamingConvention, rule: CaseRule) -> Self {
        self.rules.insert(convention, rule);
        self
    }

    pub fn with_descriptor(mut self, descriptor: DescriptorName) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn descriptor(&self) -> DescriptorName {
        self.descriptor
    }

    pub fn supports(&self, convention: NamingConvention) -> bool {
        self.rules.contains_key(&convention)
    }

    pub fn conventions(&self) -> impl Iterator<Item = NamingConvention> + '_ {
        self.rules.keys().copied()
    }

    /// Generic spelling of `field` under `convention`, without overrides.
    pub fn spell(
        &self,
        field: CanonicalField,
        convention: NamingConvention,
    ) -> Result<String, DomainError> {
        let rule = self
            .rules
            .get(&convention)
            .ok_or_else(|| DomainError::UnsupportedConvention {
                convention: convention.to_string(),
            })?;

        Ok(rule.apply(field.base_name(self.descriptor).split('_')))
    }

    /// [`spell`](Self::spell) with both arguments given by name.
    pub fn spell_named(&self, field: &str, convention: &str) -> Result<String, DomainError> {
        let field: CanonicalField = field.parse()?;
        let convention: NamingConvention = convention.parse()?;
        self.spell(field, convention)
    }

    /// Spellings of all five fields under `convention`, overrides first.
    ///
    /// Fails with `SpellingCollision` when two fields end up with the same
    /// identifier.
    pub fn spellings(
        &self,
        language: &str,
        convention: NamingConvention,
        overrides: &BTreeMap<CanonicalField, String>,
    ) -> Result<FieldSpellings, DomainError> {
        let mut names: Vec<String> = Vec::with_capacity(CanonicalField::ALL.len());

        for field in CanonicalField::ALL {
            let name = match overrides.get(&field) {
                Some(pinned) => pinned.clone(),
                None => self.spell(field, convention)?,
            };

            if let Some(pos) = names.iter().position(|n| *n == name) {
                return Err(DomainError::SpellingCollision {
                    language: language.to_string(),
                    spelling: name,
                    first: CanonicalField::ALL[pos],
                    second: field,
                });
            }
            names.push(name);
        }

        Ok(FieldSpellings { convention, names })
    }

    /// Spellings a template renders with.
    pub fn spellings_for(&self, template: &LanguageTemplate) -> Result<FieldSpellings, DomainError> {
        self.spellings(
            template.language(),
            template.convention(),
            template.overrides(),
        )
    }

    /// Which field an identifier token spells, under any convention or alias.
    pub fn resolve(&self, token: &str) -> Option<CanonicalField> {
        field_from_words(token)
    }
}

/// Resolved identifiers for the five fields, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpellings {
    convention: NamingConvention,
    names: Vec<String>,
}

impl FieldSpellings {
    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        &self.names[field.index()]
    }

    /// Field whose spelling is exactly `token`.
    pub fn field_of(&self, token: &str) -> Option<CanonicalField> {
        self.names
            .iter()
            .position(|n| n == token)
            .map(|i| CanonicalField::ALL[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        CanonicalField::ALL
            .into_iter()
            .zip(self.names.iter().map(String::as_str))
    }
}

impl Serialize for FieldSpellings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (field, name) in self.iter() {
            map.serialize_entry(field.as_str(), name)?;
        }
        map.end()
    }
}

// ── Word splitting ───────────────────────────────────────────────────────────

pub(crate) fn field_from_words(token: &str) -> Option<CanonicalField> {
    let words = split_words(token);
    FIELD_WORDS
        .iter()
        .find(|(pattern, _)| {
            pattern.len() == words.len() && pattern.iter().zip(&words).all(|(p, w)| *p == w.as_str())
        })
        .map(|(_, field)| *field)
}

/// Split an identifier into lowercase words.
///
/// Boundaries: explicit separators (`_`, `-`, whitespace), a lowercase to
/// uppercase transition (`commitHash`), and the end of an acronym
/// (`HTTPServer` splits as `http` + `server`).
pub(crate) fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
