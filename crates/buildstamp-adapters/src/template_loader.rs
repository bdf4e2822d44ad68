//! TOML manifest loader for language templates.
//!
//! A manifest describes one target language: identity, naming convention,
//! escape style, output file names, optional spelling overrides and the two
//! skeletons. Skeletons are either inline strings or files next to the
//! manifest.
//!
//! # Manifest format
//!
//! ```toml
//! [template]
//! language    = "go"                  # unique id, matched case-insensitively
//! aliases     = ["golang"]            # optional
//! name        = "Go"                  # optional display name
//! description = "..."                 # optional
//! convention  = "PascalCase"          # snake_case | camelCase | PascalCase | kebab-case | SCREAMING_SNAKE
//! escape      = "go"                  # c | go | rust | python | javascript | java | csharp | json | shell
//!
//! [files]
//! declaration = "buildinfo.go"
//! definition  = "buildinfo_values.go"
//!
//! [overrides]                         # optional, field -> identifier
//! Version    = "BuildVersion"
//!
//! [declaration]
//! skeleton = "..."                    # inline, or
//! # file   = "buildinfo.go.tmpl"      # relative to the manifest
//!
//! [definition]
//! skeleton = "..."
//! ```
//!
//! # Directory layout
//!
//! Any `*.toml` file under the templates directory is a manifest:
//!
//! ```text
//! templates/
//! ├── zig.toml
//! └── kotlin/
//!     ├── kotlin.toml
//!     └── BuildInfo.kt.tmpl
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use buildstamp_core::domain::{
    CanonicalField, DomainError, EscapeStyle, LanguageTemplate, NamingConvention, TemplateFiles,
};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a template manifest.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub files: FilesSection,
    /// Canonical field name to identifier. Keys accept any spelling of a field.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
    pub declaration: SkeletonSource,
    pub definition: SkeletonSource,
}

/// `[template]` section.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateSection {
    pub language: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Display name shown in `buildstamp list`.
    pub name: Option<String>,
    pub description: Option<String>,
    pub convention: String,
    pub escape: String,
}

/// `[files]` section: default output file names.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    pub declaration: String,
    pub definition: String,
}

/// Where a skeleton's text comes from. Exactly one of the two must be set.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SkeletonSource {
    pub skeleton: Option<String>,
    pub file: Option<String>,
}

impl SkeletonSource {
    fn resolve(&self, which: &str, base_dir: Option<&Path>) -> Result<String, DomainError> {
        match (&self.skeleton, &self.file, base_dir) {
            (Some(inline), None, _) => Ok(inline.clone()),
            (None, Some(file), Some(dir)) => {
                let path = dir.join(file);
                fs::read_to_string(&path).map_err(|e| {
                    DomainError::InvalidTemplate(format!(
                        "failed to read {which} skeleton '{}': {e}",
                        path.display()
                    ))
                })
            }
            (None, Some(file), None) => Err(DomainError::InvalidTemplate(format!(
                "{which} skeleton file '{file}' needs a manifest directory"
            ))),
            (Some(_), Some(_), _) => Err(DomainError::InvalidTemplate(format!(
                "[{which}] sets both 'skeleton' and 'file'"
            ))),
            (None, None, _) => Err(DomainError::InvalidTemplate(format!(
                "[{which}] needs 'skeleton' or 'file'"
            ))),
        }
    }
}

impl TemplateManifest {
    /// Build the domain template. Skeleton `file` entries resolve against
    /// `base_dir`.
    pub fn into_template(self, base_dir: Option<&Path>) -> Result<LanguageTemplate, DomainError> {
        let convention: NamingConvention = self.template.convention.parse()?;
        let escape: EscapeStyle = self.template.escape.parse()?;
        let overrides = self
            .overrides
            .into_iter()
            .map(|(key, ident)| Ok((key.parse::<CanonicalField>()?, ident)))
            .collect::<Result<Vec<_>, DomainError>>()?;

        let mut builder = LanguageTemplate::builder()
            .language(&self.template.language)
            .convention(convention)
            .escape(escape)
            .files(TemplateFiles::new(
                self.files.declaration,
                self.files.definition,
            ))
            .declaration(self.declaration.resolve("declaration", base_dir)?)
            .definition(self.definition.resolve("definition", base_dir)?);

        if let Some(name) = self.template.name {
            builder = builder.display_name(name);
        }
        if let Some(description) = self.template.description {
            builder = builder.description(description);
        }
        for alias in self.template.aliases {
            builder = builder.alias(alias);
        }
        for (field, ident) in overrides {
            builder = builder.override_spelling(field, ident);
        }

        builder.build()
    }
}

/// Parse one manifest from TOML text.
pub fn parse_manifest(raw: &str, base_dir: Option<&Path>) -> Result<LanguageTemplate, DomainError> {
    let manifest: TemplateManifest = toml::from_str(raw)
        .map_err(|e| DomainError::InvalidTemplate(format!("invalid manifest: {e}")))?;
    manifest.into_template(base_dir)
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`LanguageTemplate`]s from a directory tree of manifests.
///
/// Manifests that fail to read, parse or validate emit a `WARN` log and are
/// skipped; they do not prevent other templates from loading.
///
/// ```no_run
/// use buildstamp_adapters::template_loader::FilesystemTemplateLoader;
///
/// let loader = FilesystemTemplateLoader::new("./templates");
/// let templates = loader.load_all()?;
/// println!("Loaded {} templates", templates.len());
/// # Ok::<(), buildstamp_core::domain::DomainError>(())
/// ```
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Load every valid manifest found under the templates directory.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTemplate`] if the directory does not
    /// exist or cannot be walked.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<LanguageTemplate>, DomainError> {
        if !self.templates_dir.is_dir() {
            return Err(DomainError::InvalidTemplate(format!(
                "templates directory not found: {}",
                self.templates_dir.display()
            )));
        }

        let mut templates = Vec::new();

        for entry in WalkDir::new(&self.templates_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry
                .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;

            let path = entry.path();
            let is_manifest = entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == "toml");
            if !is_manifest {
                continue;
            }

            match self.load_file(path) {
                Ok(template) => {
                    debug!(
                        language = template.language(),
                        convention = %template.convention(),
                        "loaded template"
                    );
                    templates.push(template);
                }
                Err(e) => {
                    warn!(
                        manifest = %path.display(),
                        error = %e,
                        "skipping manifest due to load error"
                    );
                }
            }
        }

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }

    /// Load a single manifest file.
    #[instrument(skip(self), fields(manifest = %path.display()))]
    pub fn load_file(&self, path: &Path) -> Result<LanguageTemplate, DomainError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read '{}': {e}", path.display()))
        })?;

        parse_manifest(&raw, path.parent()).map_err(|e| match e {
            DomainError::InvalidTemplate(msg) => {
                DomainError::InvalidTemplate(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ZIG: &str = r#"
[template]
language = "Zig"
convention = "snake_case"
escape = "c"

[files]
declaration = "build_info.zig"
definition = "build_info_values.zig"

[declaration]
skeleton = """
pub const BuildInfo = struct {
    {{Version}}: []const u8,
    {{CommitHash}}: []const u8,
    {{CommitDate}}: []const u8,
    {{CommitDescriptor}}: []const u8,
    {{BuildDate}}: []const u8,
};
"""

[definition]
file = "values.zig.tmpl"
"#;

    const ZIG_VALUES: &str = "pub const build_info = .{ .{{Version.name}} = \"{{Version}}\", \
.{{CommitHash.name}} = \"{{CommitHash}}\", .{{CommitDate.name}} = \"{{CommitDate}}\", \
.{{CommitDescriptor.name}} = \"{{CommitDescriptor}}\", .{{BuildDate.name}} = \"{{BuildDate}}\" };\n";

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    // ── parse_manifest ───────────────────────────────────────────────────────

    #[test]
    fn inline_manifest_parses() {
        let raw = r#"
[template]
language = "kotlin"
aliases = ["kt"]
name = "Kotlin"
convention = "camel"
escape = "java"

[files]
declaration = "BuildInfo.kt"
definition = "BuildInfoValues.kt"

[overrides]
commit_hash = "revision"

[declaration]
skeleton = "{{Version}} {{CommitHash}} {{CommitDate}} {{CommitDescriptor}} {{BuildDate}}"

[definition]
skeleton = "{{Version.name}}={{Version}} {{CommitHash.name}}={{CommitHash}} {{CommitDate.name}}={{CommitDate}} {{CommitDescriptor.name}}={{CommitDescriptor}} {{BuildDate.name}}={{BuildDate}}"
"#;
        let template = parse_manifest(raw, None).unwrap();

        assert_eq!(template.language(), "kotlin");
        assert_eq!(template.display_name(), "Kotlin");
        assert!(template.matches("KT"));
        assert_eq!(template.convention(), NamingConvention::CamelCase);
        assert_eq!(template.escape(), EscapeStyle::Java);
        assert_eq!(
            template.overrides().get(&CanonicalField::CommitHash).map(String::as_str),
            Some("revision")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let raw = ZIG.replace("escape = \"c\"", "escape = \"c\"\nauthor = \"me\"");
        assert!(matches!(
            parse_manifest(&raw, None),
            Err(DomainError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn file_skeleton_needs_a_directory() {
        let err = parse_manifest(ZIG, None).unwrap_err();
        assert!(err.to_string().contains("needs a manifest directory"));
    }

    #[test]
    fn bad_convention_is_reported_as_such() {
        let raw = ZIG.replace("snake_case", "train-case");
        assert!(matches!(
            parse_manifest(&raw, None),
            Err(DomainError::UnsupportedConvention { .. })
        ));
    }

    #[test]
    fn unknown_override_field_is_rejected() {
        let raw = ZIG.replace("[declaration]", "[overrides]\nauthor = \"who\"\n\n[declaration]");
        assert!(matches!(
            parse_manifest(&raw, None),
            Err(DomainError::UnknownField { .. })
        ));
    }

    // ── FilesystemTemplateLoader ─────────────────────────────────────────────

    #[test]
    fn loads_manifests_with_file_skeletons() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "zig/zig.toml", ZIG);
        write(dir.path(), "zig/values.zig.tmpl", ZIG_VALUES);

        let templates = FilesystemTemplateLoader::new(dir.path()).load_all().unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].language(), "zig");
    }

    #[test]
    fn bad_manifest_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "zig.toml", ZIG);
        write(dir.path(), "values.zig.tmpl", ZIG_VALUES);
        write(dir.path(), "broken.toml", "[template]\nlanguage = ");
        write(
            dir.path(),
            "reordered.toml",
            &ZIG.replace("{{Version}}: []const u8,\n", "")
                .replace("language = \"Zig\"", "language = \"zag\""),
        );
        write(dir.path(), "README.md", "not a manifest");

        let templates = FilesystemTemplateLoader::new(dir.path()).load_all().unwrap();

        let ids: Vec<&str> = templates.iter().map(|t| t.language()).collect();
        assert_eq!(ids, vec!["zig"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let loader = FilesystemTemplateLoader::new(dir.path().join("nope"));
        assert!(matches!(
            loader.load_all(),
            Err(DomainError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn load_file_names_the_manifest_in_errors() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "zig.toml", ZIG);

        let loader = FilesystemTemplateLoader::new(dir.path());
        let err = loader.load_file(&dir.path().join("zig.toml")).unwrap_err();

        assert!(err.to_string().contains("zig.toml"));
        assert!(err.to_string().contains("values.zig.tmpl"));
    }
}
