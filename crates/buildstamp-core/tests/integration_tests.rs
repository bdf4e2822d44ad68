//! Integration tests for buildstamp-core.
//!
//! Exercise the public API end to end against a small in-test catalog and
//! the C fixtures under `tests/fixtures/c/`.

use std::sync::Arc;

use buildstamp_core::{
    application::RenderService,
    domain::{
        ArtifactKind, CanonicalField, ConsistencyValidator, DescriptorName, DomainError,
        EscapeStyle, LanguageTemplate, MetadataRecord, NamingConvention, NamingRegistry,
        TemplateFiles,
    },
    prelude::*,
};

const LEGACY_H: &str = include_str!("fixtures/c/legacy/version.h");
const LEGACY_C: &str = include_str!("fixtures/c/legacy/version.c");
const LEGACY_MAIN: &str = include_str!("fixtures/c/legacy/main.c");
const CURRENT_H: &str = include_str!("fixtures/c/current/version.h");
const CURRENT_C: &str = include_str!("fixtures/c/current/version.c");
const CURRENT_MAIN: &str = include_str!("fixtures/c/current/main.c");

/// Catalog holding a fixed list of templates.
struct FixedCatalog(Vec<Arc<LanguageTemplate>>);

impl TemplateCatalog for FixedCatalog {
    fn get(&self, language: &str) -> BuildstampResult<Arc<LanguageTemplate>> {
        self.0
            .iter()
            .find(|t| t.matches(language))
            .cloned()
            .ok_or_else(|| {
                DomainError::UnsupportedLanguage {
                    language: language.to_string(),
                    available: self.0.iter().map(|t| t.language().to_string()).collect(),
                }
                .into()
            })
    }

    fn list(&self) -> BuildstampResult<Vec<Arc<LanguageTemplate>>> {
        Ok(self.0.clone())
    }
}

fn c_template() -> Arc<LanguageTemplate> {
    Arc::new(
        LanguageTemplate::builder()
            .language("c")
            .alias("h")
            .convention(NamingConvention::SnakeCase)
            .escape(EscapeStyle::C)
            .files(TemplateFiles::new("version.h", "version.c"))
            .declaration(
                r#"#ifndef __VERSION_H__
#define __VERSION_H__

typedef struct {
    const char
        *{{Version}},
        *{{CommitHash}},
        *{{CommitDate}},
        *{{CommitDescriptor}},
        *{{BuildDate}};
} build_info_t;

extern build_info_t build_info;

#endif
"#,
            )
            .definition(
                r#"#include "version.h"

build_info_t build_info = {
    .{{Version.name}} = "{{Version}}",
    .{{CommitHash.name}} = "{{CommitHash}}",
    .{{CommitDate.name}} = "{{CommitDate}}",
    .{{CommitDescriptor.name}} = "{{CommitDescriptor}}",
    .{{BuildDate.name}} = "{{BuildDate}}",
};
"#,
            )
            .build()
            .expect("c template"),
    )
}

fn json_template() -> Arc<LanguageTemplate> {
    Arc::new(
        LanguageTemplate::builder()
            .language("json")
            .convention(NamingConvention::KebabCase)
            .escape(EscapeStyle::Json)
            .files(TemplateFiles::new("build-info.schema.json", "build-info.json"))
            .declaration(
                r#"{
  "type": "object",
  "properties": {
    "{{Version}}": { "type": "string" },
    "{{CommitHash}}": { "type": "string" },
    "{{CommitDate}}": { "type": "string" },
    "{{CommitDescriptor}}": { "type": "string" },
    "{{BuildDate}}": { "type": "string" }
  }
}
"#,
            )
            .definition(
                r#"{
  "{{Version.name}}": "{{Version}}",
  "{{CommitHash.name}}": "{{CommitHash}}",
  "{{CommitDate.name}}": "{{CommitDate}}",
  "{{CommitDescriptor.name}}": "{{CommitDescriptor}}",
  "{{BuildDate.name}}": "{{BuildDate}}"
}
"#,
            )
            .build()
            .expect("json template"),
    )
}

fn service() -> RenderService {
    RenderService::new(Box::new(FixedCatalog(vec![c_template(), json_template()])))
}

fn tricky_record() -> MetadataRecord {
    MetadataRecord::new(
        "1.0.0-rc.1+\"quoted\"",
        "0123456789abcdef",
        "2024-05-01-1200",
        "feature-x\\y-0123456",
        "line\nbreak",
    )
}

// ============================================================================
// C fixtures
// ============================================================================

#[test]
fn current_c_pair_is_consistent() {
    service()
        .check("c", None, CURRENT_H, CURRENT_C)
        .expect("current snake_case pair validates");
}

#[test]
fn current_c_consumer_matches_header() {
    service()
        .check("c", None, CURRENT_H, CURRENT_MAIN)
        .expect("main.c uses the header's spellings");
}

#[test]
fn legacy_c_pair_fails_on_descriptor() {
    let err = service()
        .check("c", Some(NamingConvention::CamelCase), LEGACY_H, LEGACY_C)
        .unwrap_err();

    assert_eq!(
        err,
        BuildstampError::Domain(DomainError::Consistency {
            field: CanonicalField::CommitDescriptor,
            declared_as: "commitTagOrBranch".into(),
            defined_as: "commitTagOrBranch".into(),
            expected: "commitSmart".into(),
        })
    );
}

#[test]
fn legacy_c_pair_passes_with_legacy_descriptor_name() {
    let registry = NamingRegistry::standard().with_descriptor(DescriptorName::TagOrBranch);
    let service = service().with_registry(registry);

    service
        .check("c", Some(NamingConvention::CamelCase), LEGACY_H, LEGACY_C)
        .expect("legacy pair is self-consistent under its own naming");
    service
        .check("c", Some(NamingConvention::CamelCase), LEGACY_H, LEGACY_MAIN)
        .expect("legacy main.c agrees with legacy header");
}

#[test]
fn legacy_c_pair_is_not_snake_case() {
    let err = service()
        .check("c", None, LEGACY_H, LEGACY_C)
        .unwrap_err();

    match err {
        BuildstampError::Domain(DomainError::Consistency {
            field,
            declared_as,
            expected,
            ..
        }) => {
            assert_eq!(field, CanonicalField::CommitHash);
            assert_eq!(declared_as, "commitHash");
            assert_eq!(expected, "commit_hash");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rendered_c_matches_current_fixture_shape() {
    let record = MetadataRecord::new(
        "1.4.0",
        "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678",
        "2024-05-01-1200",
        "v1.4.0",
        "2024-05-02-0800",
    );
    let pair = service().render_checked(&record, "c").unwrap();

    assert_eq!(pair.declaration().replace(' ', ""), CURRENT_H.replace(' ', ""));
    assert_eq!(pair.definition(), CURRENT_C);
}

// ============================================================================
// Rendering properties
// ============================================================================

#[test]
fn both_halves_reference_the_same_field_sequence() {
    for descriptor in [DescriptorName::Smart, DescriptorName::TagOrBranch] {
        let registry = NamingRegistry::standard().with_descriptor(descriptor);
        let service = service().with_registry(registry.clone());
        let validator = ConsistencyValidator::new(&registry);

        for language in ["c", "json"] {
            let pair = service.render(&tricky_record(), language).unwrap();

            let first_seen = |kind| {
                let mut seen: Vec<(CanonicalField, String)> = Vec::new();
                for (field, token) in validator.field_tokens(&pair, kind) {
                    if !seen.iter().any(|(f, _)| *f == field) {
                        seen.push((field, token));
                    }
                }
                seen
            };

            let decl = first_seen(ArtifactKind::Declaration);
            let def = first_seen(ArtifactKind::Definition);

            assert_eq!(decl, def, "{language}");
            assert_eq!(
                decl.iter().map(|(f, _)| *f).collect::<Vec<_>>(),
                CanonicalField::ALL.to_vec()
            );
        }
    }
}

#[test]
fn empty_record_renders_for_every_language() {
    let service = service();
    for info in service.languages().unwrap() {
        let pair = service
            .render_checked(&MetadataRecord::default(), &info.language)
            .unwrap();
        assert!(pair.definition().contains("\"\""), "{}", info.language);
    }
}

#[test]
fn json_definition_is_valid_json_and_recovers_values() {
    let record = tricky_record();
    let pair = service().render_checked(&record, "json").unwrap();

    let doc: serde_json::Value = serde_json::from_str(pair.definition()).unwrap();
    assert_eq!(doc["version"], record.version());
    assert_eq!(doc["commit-smart"], record.commit_descriptor());
    assert_eq!(doc["build-date"], record.build_date());

    let schema: serde_json::Value = serde_json::from_str(pair.declaration()).unwrap();
    assert!(schema["properties"]["commit-hash"].is_object());
}

#[test]
fn unsupported_language_produces_nothing() {
    let err = service()
        .render(&tricky_record(), "unsupported-language")
        .unwrap_err();

    assert!(matches!(
        err,
        BuildstampError::Domain(DomainError::UnsupportedLanguage { ref language, .. })
            if language == "unsupported-language"
    ));
}

#[test]
fn language_lookup_is_case_insensitive() {
    assert!(service().render(&tricky_record(), "H").is_ok());
}
