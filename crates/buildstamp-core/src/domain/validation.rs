//! Cross-checks the two halves of a rendered pair.
//!
//! Both texts are reduced to identifier tokens (comments and string literals
//! stripped), tokens are mapped back to canonical fields, and every
//! occurrence of a field has to be the spelling the pair was rendered with.

use crate::domain::entities::{ArtifactKind, RenderedPair};
use crate::domain::error::{DomainError, MISSING};
use crate::domain::naming::NamingRegistry;
use crate::domain::value_objects::{CanonicalField, Lexicon, NamingConvention};

pub struct ConsistencyValidator<'a> {
    registry: &'a NamingRegistry,
}

impl<'a> ConsistencyValidator<'a> {
    pub fn new(registry: &'a NamingRegistry) -> Self {
        Self { registry }
    }

    /// Report the first field, in canonical order, that is missing from one
    /// side or spelled differently from what the pair expects.
    pub fn validate(&self, pair: &RenderedPair) -> Result<(), DomainError> {
        let spellings = pair.spellings();
        let declared = group(self.field_tokens(pair, ArtifactKind::Declaration));
        let defined = group(self.field_tokens(pair, ArtifactKind::Definition));

        for field in CanonicalField::ALL {
            let expected = spellings.get(field);
            let decl = &declared[field.index()];
            let def = &defined[field.index()];

            let bad_decl = decl.iter().find(|t| t.as_str() != expected);
            let bad_def = def.iter().find(|t| t.as_str() != expected);

            if decl.is_empty() || def.is_empty() || bad_decl.is_some() || bad_def.is_some() {
                return Err(DomainError::Consistency {
                    field,
                    declared_as: reported(bad_decl, decl),
                    defined_as: reported(bad_def, def),
                    expected: expected.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Identifiers in one half of `pair` that name a field, in order of
    /// appearance.
    pub fn field_tokens(
        &self,
        pair: &RenderedPair,
        kind: ArtifactKind,
    ) -> Vec<(CanonicalField, String)> {
        let text = match kind {
            ArtifactKind::Declaration => pair.declaration(),
            ArtifactKind::Definition => pair.definition(),
        };
        let hyphenated = pair.convention() == NamingConvention::KebabCase;

        identifiers(text, pair.escape().lexicon(), hyphenated)
            .into_iter()
            .filter_map(|token| {
                pair.spellings()
                    .field_of(&token)
                    .or_else(|| self.registry.resolve(&token))
                    .map(|field| (field, token))
            })
            .collect()
    }
}

fn group(tokens: Vec<(CanonicalField, String)>) -> Vec<Vec<String>> {
    let mut found = vec![Vec::new(); CanonicalField::ALL.len()];
    for (field, token) in tokens {
        found[field.index()].push(token);
    }
    found
}

fn reported(offending: Option<&String>, all: &[String]) -> String {
    offending
        .or_else(|| all.first())
        .cloned()
        .unwrap_or_else(|| MISSING.to_string())
}

/// Identifier tokens of `text`, skipping comments and string literals.
///
/// A string literal directly followed by `:` is an object key and counts as
/// an identifier, so JSON documents and dictionary literals are covered.
/// With `hyphenated`, a `-` between word characters continues an identifier.
pub(crate) fn identifiers(text: &str, lexicon: Lexicon, hyphenated: bool) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if lexicon
            .line_comments
            .iter()
            .any(|marker| starts_with(&chars, i, marker))
        {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if let Some((open, close)) = lexicon.block_comment {
            if starts_with(&chars, i, open) {
                i += open.chars().count();
                while i < chars.len() && !starts_with(&chars, i, close) {
                    i += 1;
                }
                i += close.chars().count();
                continue;
            }
        }

        if lexicon.quotes.contains(&c) {
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && chars[j] != c {
                j += if lexicon.escapes_in_quotes && chars[j] == '\\' {
                    2
                } else {
                    1
                };
            }
            let end = j.min(chars.len());
            i = end + 1;

            let mut k = i;
            while k < chars.len() && chars[k].is_whitespace() {
                k += 1;
            }
            if chars.get(k) == Some(&':') {
                let literal: String = chars[start..end].iter().collect();
                if is_key(&literal) {
                    tokens.push(literal);
                }
            }
            continue;
        }

        if c == '\\' {
            i += 2;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() {
                let ch = chars[i];
                let joins = hyphenated
                    && ch == '-'
                    && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
                if !(ch.is_alphanumeric() || ch == '_' || joins) {
                    break;
                }
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
            continue;
        }

        i += 1;
    }

    tokens
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut idx = at;
    for p in pattern.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    !pattern.is_empty()
}

fn is_key(literal: &str) -> bool {
    !literal.is_empty()
        && literal
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LanguageTemplate, MetadataRecord, TemplateFiles};
    use crate::domain::render::render;
    use crate::domain::value_objects::{EscapeStyle, NamingConvention};

    fn c_template(convention: NamingConvention) -> LanguageTemplate {
        LanguageTemplate::builder()
            .language("c")
            .convention(convention)
            .escape(EscapeStyle::C)
            .files(TemplateFiles::new("version.h", "version.c"))
            .declaration(
                "typedef struct {\n  const char *{{Version}};\n  const char *{{CommitHash}};\n\
  const char *{{CommitDate}};\n  const char *{{CommitDescriptor}};\n  const char *{{BuildDate}};\n\
} build_info_t;\n",
            )
            .definition(
                "build_info_t build_info = {\n  .{{Version.name}} = \"{{Version}}\",\n\
  .{{CommitHash.name}} = \"{{CommitHash}}\",\n  .{{CommitDate.name}} = \"{{CommitDate}}\",\n\
  .{{CommitDescriptor.name}} = \"{{CommitDescriptor}}\",\n  .{{BuildDate.name}} = \"{{BuildDate}}\",\n};\n",
            )
            .build()
            .unwrap()
    }

    fn rendered(convention: NamingConvention, record: &MetadataRecord) -> RenderedPair {
        render(record, &c_template(convention), &NamingRegistry::standard()).unwrap()
    }

    // ── Tokenizer ────────────────────────────────────────────────────────────

    #[test]
    fn tokenizer_skips_comments_and_literals() {
        let text = "int version; // commit_hash\n/* build_date */ char *s = \"commit_date\";";
        let tokens = identifiers(text, EscapeStyle::C.lexicon(), false);
        assert_eq!(tokens, vec!["int", "version", "char", "s"]);
    }

    #[test]
    fn tokenizer_keeps_object_keys() {
        let text = r#"{ "commit-hash": "version", "list": ["build-date"] }"#;
        let tokens = identifiers(text, EscapeStyle::Json.lexicon(), false);
        assert_eq!(tokens, vec!["commit-hash", "list"]);
    }

    #[test]
    fn tokenizer_handles_escaped_quotes() {
        let text = r#"x = "a \" commit_hash"; y"#;
        let tokens = identifiers(text, EscapeStyle::C.lexicon(), false);
        assert_eq!(tokens, vec!["x", "y"]);
    }

    #[test]
    fn tokenizer_handles_shell_quote_splices() {
        let text = "VERSION='it'\\''s' # COMMIT_HASH\nexport VERSION";
        let tokens = identifiers(text, EscapeStyle::ShellSingle.lexicon(), false);
        assert_eq!(tokens, vec!["VERSION", "export", "VERSION"]);
    }

    #[test]
    fn tokenizer_joins_hyphens_on_request() {
        let text = "a commit-hash b - c";
        let lexicon = EscapeStyle::C.lexicon();
        assert_eq!(identifiers(text, lexicon, true), vec!["a", "commit-hash", "b", "c"]);
        assert_eq!(
            identifiers(text, lexicon, false),
            vec!["a", "commit", "hash", "b", "c"]
        );
    }

    // ── Validation ───────────────────────────────────────────────────────────

    #[test]
    fn rendered_pair_is_consistent() {
        let record = MetadataRecord::new("1.0", "abc", "d", "commit_hash", "b");
        let registry = NamingRegistry::standard();
        for conv in NamingConvention::ALL {
            let pair = rendered(conv, &record);
            let validator = ConsistencyValidator::new(&registry);
            assert_eq!(validator.validate(&pair), Ok(()), "{conv}");
        }
    }

    #[test]
    fn drift_in_definition_is_reported() {
        let pair = rendered(NamingConvention::SnakeCase, &MetadataRecord::default());
        let template = c_template(NamingConvention::SnakeCase);
        let drifted = RenderedPair::new(
            &template,
            pair.spellings().clone(),
            pair.declaration(),
            pair.definition().replace(".commit_hash", ".commitHash"),
        );

        let err = ConsistencyValidator::new(&NamingRegistry::standard())
            .validate(&drifted)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Consistency {
                field: CanonicalField::CommitHash,
                declared_as: "commit_hash".into(),
                defined_as: "commitHash".into(),
                expected: "commit_hash".into(),
            }
        );
    }

    #[test]
    fn missing_field_is_reported() {
        let pair = rendered(NamingConvention::SnakeCase, &MetadataRecord::default());
        let template = c_template(NamingConvention::SnakeCase);
        let truncated = RenderedPair::new(
            &template,
            pair.spellings().clone(),
            pair.declaration().replace("  const char *build_date;\n", ""),
            pair.definition(),
        );

        let err = ConsistencyValidator::new(&NamingRegistry::standard())
            .validate(&truncated)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Consistency {
                field: CanonicalField::BuildDate,
                declared_as: MISSING.into(),
                defined_as: "build_date".into(),
                expected: "build_date".into(),
            }
        );
    }
}
