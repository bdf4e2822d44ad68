//! Domain value objects: CanonicalField, NamingConvention, DescriptorName,
//! EscapeStyle.
//!
//! # Design
//!
//! These are pure value types, `Copy` with equality by value. They hold no
//! spelling logic: turning a field into an identifier lives in `naming.rs`
//! and literal escaping lives in `escape.rs`. This file defines the types,
//! their string representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── CanonicalField ───────────────────────────────────────────────────────────

/// One of the five build metadata fields.
///
/// The declaration order of the variants is the canonical order every
/// skeleton and every rendered pair follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    Version,
    CommitHash,
    CommitDate,
    CommitDescriptor,
    BuildDate,
}

impl CanonicalField {
    /// All fields in canonical order.
    pub const ALL: [CanonicalField; 5] = [
        Self::Version,
        Self::CommitHash,
        Self::CommitDate,
        Self::CommitDescriptor,
        Self::BuildDate,
    ];

    /// PascalCase placeholder name, as written in templates.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Version => "Version",
            Self::CommitHash => "CommitHash",
            Self::CommitDate => "CommitDate",
            Self::CommitDescriptor => "CommitDescriptor",
            Self::BuildDate => "BuildDate",
        }
    }

    /// Position in canonical order.
    pub const fn index(self) -> usize {
        match self {
            Self::Version => 0,
            Self::CommitHash => 1,
            Self::CommitDate => 2,
            Self::CommitDescriptor => 3,
            Self::BuildDate => 4,
        }
    }

    /// lower_snake base form every convention is derived from.
    pub const fn base_name(self, descriptor: DescriptorName) -> &'static str {
        match self {
            Self::Version => "version",
            Self::CommitHash => "commit_hash",
            Self::CommitDate => "commit_date",
            Self::CommitDescriptor => descriptor.base_name(),
            Self::BuildDate => "build_date",
        }
    }

    /// Parse a template placeholder name (`CommitHash`, `CommitSmart`, ...).
    ///
    /// Only the exact PascalCase names and the two descriptor aliases are
    /// accepted here; templates are strict about their vocabulary.
    pub fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "Version" => Some(Self::Version),
            "CommitHash" => Some(Self::CommitHash),
            "CommitDate" => Some(Self::CommitDate),
            "CommitDescriptor" | "CommitSmart" | "CommitTagOrBranch" => {
                Some(Self::CommitDescriptor)
            }
            "BuildDate" => Some(Self::BuildDate),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = DomainError;

    /// Accepts the field spelled under any convention, or an alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::domain::naming::field_from_words(s).ok_or_else(|| DomainError::UnknownField {
            field: s.to_string(),
        })
    }
}

// ── NamingConvention ─────────────────────────────────────────────────────────

/// An identifier naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamingConvention {
    SnakeCase,
    CamelCase,
    PascalCase,
    KebabCase,
    ScreamingSnake,
}

impl NamingConvention {
    pub const ALL: [NamingConvention; 5] = [
        Self::SnakeCase,
        Self::CamelCase,
        Self::PascalCase,
        Self::KebabCase,
        Self::ScreamingSnake,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SnakeCase => "snake_case",
            Self::CamelCase => "camelCase",
            Self::PascalCase => "PascalCase",
            Self::KebabCase => "kebab-case",
            Self::ScreamingSnake => "SCREAMING_SNAKE",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snake_case" | "snake" | "snakecase" => Ok(Self::SnakeCase),
            "camelcase" | "camel" | "camel_case" | "lower_camel" => Ok(Self::CamelCase),
            "pascalcase" | "pascal" | "pascal_case" | "upper_camel" => Ok(Self::PascalCase),
            "kebab-case" | "kebab" | "kebabcase" => Ok(Self::KebabCase),
            "screaming_snake" | "screaming" | "screaming_snake_case" | "upper_snake"
            | "constant" => Ok(Self::ScreamingSnake),
            _ => Err(DomainError::UnsupportedConvention {
                convention: s.to_string(),
            }),
        }
    }
}

impl Serialize for NamingConvention {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NamingConvention {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── DescriptorName ───────────────────────────────────────────────────────────

/// Which historical name the commit descriptor field is emitted under.
///
/// Both names are always recognized when reading identifiers back; this
/// only selects the spelling that gets written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorName {
    #[default]
    Smart,
    TagOrBranch,
}

impl DescriptorName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::TagOrBranch => "tag_or_branch",
        }
    }

    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Smart => "commit_smart",
            Self::TagOrBranch => "commit_tag_or_branch",
        }
    }
}

impl fmt::Display for DescriptorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptorName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "smart" | "commit_smart" => Ok(Self::Smart),
            "tag_or_branch" | "commit_tag_or_branch" => Ok(Self::TagOrBranch),
            _ => Err(DomainError::UnknownField {
                field: s.to_string(),
            }),
        }
    }
}

// ── EscapeStyle ──────────────────────────────────────────────────────────────

/// String literal rules of a target language.
///
/// Besides driving `escape::escape`, the style tells the validator how
/// literals and comments look in that language (see `Lexicon`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeStyle {
    C,
    Go,
    Rust,
    Python,
    JavaScript,
    Java,
    CSharp,
    Json,
    ShellSingle,
}

impl EscapeStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Json => "json",
            Self::ShellSingle => "shell",
        }
    }

    /// Lexical shape of the language, for stripping literals and comments.
    pub const fn lexicon(self) -> Lexicon {
        const C_LIKE: Lexicon = Lexicon {
            quotes: &['"', '\''],
            line_comments: &["//"],
            block_comment: Some(("/*", "*/")),
            escapes_in_quotes: true,
        };

        match self {
            Self::C | Self::Java | Self::CSharp => C_LIKE,
            // Lifetimes (`&'static`) rule out single quotes as delimiters.
            Self::Rust => Lexicon {
                quotes: &['"'],
                ..C_LIKE
            },
            Self::Go => Lexicon {
                quotes: &['"', '`'],
                ..C_LIKE
            },
            Self::JavaScript => Lexicon {
                quotes: &['"', '\'', '`'],
                ..C_LIKE
            },
            Self::Python => Lexicon {
                quotes: &['"', '\''],
                line_comments: &["#"],
                block_comment: None,
                escapes_in_quotes: true,
            },
            Self::Json => Lexicon {
                quotes: &['"'],
                line_comments: &[],
                block_comment: None,
                escapes_in_quotes: true,
            },
            Self::ShellSingle => Lexicon {
                quotes: &['\''],
                line_comments: &["#"],
                block_comment: None,
                escapes_in_quotes: false,
            },
        }
    }
}

impl fmt::Display for EscapeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EscapeStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "cpp" => Ok(Self::C),
            "go" | "golang" => Ok(Self::Go),
            "rust" | "rs" => Ok(Self::Rust),
            "python" | "py" => Ok(Self::Python),
            "javascript" | "js" | "typescript" | "ts" => Ok(Self::JavaScript),
            "java" => Ok(Self::Java),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "json" => Ok(Self::Json),
            "shell" | "sh" | "bash" | "shell-single" => Ok(Self::ShellSingle),
            other => Err(DomainError::InvalidTemplate(format!(
                "unknown escape style: {other}"
            ))),
        }
    }
}

/// How string literals and comments are delimited in a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexicon {
    pub quotes: &'static [char],
    pub line_comments: &'static [&'static str],
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Whether a backslash inside a literal escapes the next character.
    pub escapes_in_quotes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_index() {
        for (i, field) in CanonicalField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn descriptor_base_name_follows_choice() {
        assert_eq!(
            CanonicalField::CommitDescriptor.base_name(DescriptorName::Smart),
            "commit_smart"
        );
        assert_eq!(
            CanonicalField::CommitDescriptor.base_name(DescriptorName::TagOrBranch),
            "commit_tag_or_branch"
        );
        assert_eq!(
            CanonicalField::CommitHash.base_name(DescriptorName::TagOrBranch),
            "commit_hash"
        );
    }

    #[test]
    fn placeholder_accepts_aliases() {
        assert_eq!(
            CanonicalField::from_placeholder("CommitSmart"),
            Some(CanonicalField::CommitDescriptor)
        );
        assert_eq!(
            CanonicalField::from_placeholder("CommitTagOrBranch"),
            Some(CanonicalField::CommitDescriptor)
        );
        assert_eq!(CanonicalField::from_placeholder("commit_hash"), None);
        assert_eq!(CanonicalField::from_placeholder("Author"), None);
    }

    #[test]
    fn field_parses_any_spelling() {
        assert_eq!(
            "commit_hash".parse::<CanonicalField>().unwrap(),
            CanonicalField::CommitHash
        );
        assert_eq!(
            "BUILD_DATE".parse::<CanonicalField>().unwrap(),
            CanonicalField::BuildDate
        );
        assert_eq!(
            "commitTagOrBranch".parse::<CanonicalField>().unwrap(),
            CanonicalField::CommitDescriptor
        );
        assert!(matches!(
            "author".parse::<CanonicalField>(),
            Err(DomainError::UnknownField { .. })
        ));
    }

    #[test]
    fn convention_parses_long_and_short_forms() {
        assert_eq!(
            "snake".parse::<NamingConvention>().unwrap(),
            NamingConvention::SnakeCase
        );
        assert_eq!(
            "camelCase".parse::<NamingConvention>().unwrap(),
            NamingConvention::CamelCase
        );
        assert_eq!(
            "PascalCase".parse::<NamingConvention>().unwrap(),
            NamingConvention::PascalCase
        );
        assert_eq!(
            "kebab-case".parse::<NamingConvention>().unwrap(),
            NamingConvention::KebabCase
        );
        assert_eq!(
            "upper_snake".parse::<NamingConvention>().unwrap(),
            NamingConvention::ScreamingSnake
        );
        assert!(matches!(
            "Title Case".parse::<NamingConvention>(),
            Err(DomainError::UnsupportedConvention { .. })
        ));
    }

    #[test]
    fn convention_display_round_trips() {
        for conv in NamingConvention::ALL {
            assert_eq!(conv.to_string().parse::<NamingConvention>().unwrap(), conv);
        }
    }

    #[test]
    fn descriptor_name_parses_kebab_form() {
        assert_eq!(
            "tag-or-branch".parse::<DescriptorName>().unwrap(),
            DescriptorName::TagOrBranch
        );
        assert_eq!(DescriptorName::default(), DescriptorName::Smart);
    }

    #[test]
    fn rust_lexicon_ignores_single_quotes() {
        assert!(!EscapeStyle::Rust.lexicon().quotes.contains(&'\''));
        assert!(EscapeStyle::C.lexicon().quotes.contains(&'\''));
        assert!(!EscapeStyle::ShellSingle.lexicon().escapes_in_quotes);
    }
}
