//! Assemble a [`MetadataRecord`] from flags, environment and `--from-json`.
//!
//! Flags (and their `BUILDSTAMP_*` variables) win over values seeded from
//! the JSON file. A `--tag` or `--branch` flag re-derives the descriptor
//! instead of keeping the seeded one.
//!
//! Without `--version` or a seeded version, the version comes from the
//! version variable (`$VERSION` by default), else the tag pattern's capture,
//! else the version file's capture suffixed with the descriptor.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use buildstamp_core::domain::{CanonicalField, MetadataBuilder, MetadataRecord};

use crate::{
    cli::MetadataArgs,
    config::VersionConfig,
    error::{CliResult, IntoCli},
};

/// Sources for a derived version, resolved from flags and config.
#[derive(Debug, Clone, Default)]
pub struct VersionInputs {
    pub env_value: Option<String>,
    pub env_pattern: Option<String>,
    pub tag_pattern: Option<String>,
    pub file: Option<PathBuf>,
    pub file_pattern: String,
}

impl VersionInputs {
    /// Flags win over the `[version]` config section. Reads the configured
    /// version variable from the process environment.
    pub fn resolve(args: &MetadataArgs, config: &VersionConfig) -> Self {
        let env_value = if config.env_var.is_empty() {
            None
        } else {
            std::env::var(&config.env_var).ok()
        };

        Self {
            env_value,
            env_pattern: config.env_pattern.clone(),
            tag_pattern: Some(
                args.version_tag_pattern
                    .clone()
                    .unwrap_or_else(|| config.tag_pattern.clone()),
            ),
            file: args
                .version_file_input
                .clone()
                .or_else(|| config.file.clone()),
            file_pattern: args
                .version_pattern
                .clone()
                .unwrap_or_else(|| config.file_pattern.clone()),
        }
    }

    fn apply(&self, mut builder: MetadataBuilder) -> CliResult<MetadataBuilder> {
        if let Some(value) = &self.env_value {
            builder = builder.version_from_env(value, self.env_pattern.clone());
        }
        if let Some(pattern) = &self.tag_pattern {
            builder = builder.version_from_tag(pattern);
        }
        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)
                .with_cli_context(|| format!("Failed to read version file '{}'", path.display()))?;
            builder =
                builder.version_from_content(path.display().to_string(), content, &self.file_pattern);
        }
        Ok(builder)
    }
}

pub fn assemble(
    args: &MetadataArgs,
    versions: &VersionInputs,
    now: DateTime<Utc>,
) -> CliResult<MetadataRecord> {
    let seed = args.from_json.as_deref().map(read_record).transpose()?;
    let seeded = |field: CanonicalField| {
        seed.as_ref()
            .map(|record| record.get(field))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let mut builder = MetadataRecord::builder();

    match args.release_version.clone().or_else(|| seeded(CanonicalField::Version)) {
        Some(version) => builder = builder.version(version),
        None => builder = versions.apply(builder)?,
    }

    if let Some(hash) = args.commit_hash.clone().or_else(|| seeded(CanonicalField::CommitHash)) {
        builder = builder.commit_hash(hash);
    }

    match (&args.commit_date, &args.git_date) {
        (Some(date), _) => builder = builder.commit_date(date),
        (None, Some(raw)) => builder = builder.commit_date_raw(raw),
        (None, None) => {
            if let Some(date) = seeded(CanonicalField::CommitDate) {
                builder = builder.commit_date(date);
            }
        }
    }

    let derive = args.tag.is_some() || args.branch.is_some();
    let descriptor = args
        .descriptor
        .clone()
        .or_else(|| (!derive).then(|| seeded(CanonicalField::CommitDescriptor)).flatten());
    if let Some(descriptor) = descriptor {
        builder = builder.commit_descriptor(descriptor);
    }
    if let Some(tag) = &args.tag {
        builder = builder.tag(tag);
    }
    if let Some(branch) = &args.branch {
        builder = builder.branch(branch);
    }

    if let Some(date) = args.build_date.clone().or_else(|| seeded(CanonicalField::BuildDate)) {
        builder = builder.build_date(date);
    }

    let record = builder.build(now)?;
    debug!(?record, "Metadata assembled");
    Ok(record)
}

fn read_record(path: &Path) -> CliResult<MetadataRecord> {
    let raw = std::fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;

    serde_json::from_str(&raw)
        .with_cli_context(|| format!("'{}' is not a build info JSON document", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap()
    }

    fn write_json(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("build.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn flags_only() {
        let args = MetadataArgs {
            release_version: Some("1.4.0".into()),
            commit_hash: Some("a1b2c3d4e5f6".into()),
            git_date: Some("2024-05-01 14:00:00 +0200".into()),
            branch: Some("feature/x".into()),
            ..Default::default()
        };

        let record = assemble(&args, &VersionInputs::default(), now()).unwrap();
        assert_eq!(record.version(), "1.4.0");
        assert_eq!(record.commit_date(), "2024-05-01-1200");
        assert_eq!(record.commit_descriptor(), "feature-x-a1b2c3d");
        assert_eq!(record.build_date(), "2024-05-02-0830");
    }

    #[test]
    fn nothing_given_yields_empty_fields_and_now() {
        let record = assemble(&MetadataArgs::default(), &VersionInputs::default(), now()).unwrap();
        assert_eq!(record.version(), "");
        assert_eq!(record.commit_descriptor(), "");
        assert_eq!(record.build_date(), "2024-05-02-0830");
    }

    #[test]
    fn json_seed_with_flag_override() {
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            r#"{"version":"1.0.0","git_hash":"abc","git_date":"2024-01-01-0000","git_smart":"v1.0.0","build_date":"2024-01-02-0000"}"#,
        );
        let args = MetadataArgs {
            from_json: Some(path),
            release_version: Some("1.0.1".into()),
            ..Default::default()
        };

        let record = assemble(&args, &VersionInputs::default(), now()).unwrap();
        assert_eq!(record.version(), "1.0.1");
        assert_eq!(record.commit_hash(), "abc");
        assert_eq!(record.commit_descriptor(), "v1.0.0");
        assert_eq!(record.build_date(), "2024-01-02-0000");
    }

    #[test]
    fn tag_flag_rederives_seeded_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, r#"{"git_hash":"abc","git_tag_or_branch":"main-abc"}"#);
        let args = MetadataArgs {
            from_json: Some(path),
            tag: Some("v2.0.0".into()),
            ..Default::default()
        };

        let record = assemble(&args, &VersionInputs::default(), now()).unwrap();
        assert_eq!(record.commit_descriptor(), "v2.0.0");
        // Missing build_date in the seed falls back to the clock.
        assert_eq!(record.build_date(), "2024-05-02-0830");
    }

    /// Default derivation, detached from the caller's `$VERSION`.
    fn versions(args: &MetadataArgs) -> VersionInputs {
        let config = VersionConfig {
            env_var: String::new(),
            ..VersionConfig::default()
        };
        VersionInputs::resolve(args, &config)
    }

    #[test]
    fn version_flag_beats_derivation() {
        let args = MetadataArgs {
            release_version: Some("1.0.0".into()),
            tag: Some("v2.0.0".into()),
            ..Default::default()
        };
        let inputs = VersionInputs {
            env_value: Some("3.0.0".into()),
            ..versions(&args)
        };

        assert_eq!(assemble(&args, &inputs, now()).unwrap().version(), "1.0.0");
    }

    #[test]
    fn version_variable_beats_tag() {
        let args = MetadataArgs {
            tag: Some("v2.0.0".into()),
            ..Default::default()
        };
        let inputs = VersionInputs {
            env_value: Some("3.0.0".into()),
            ..versions(&args)
        };
        assert_eq!(assemble(&args, &inputs, now()).unwrap().version(), "3.0.0");

        let inputs = versions(&args);
        assert_eq!(assemble(&args, &inputs, now()).unwrap().version(), "2.0.0");
    }

    #[test]
    fn version_file_capture_gets_descriptor_suffix() {
        let dir = TempDir::new().unwrap();
        let readme = dir.path().join("README.md");
        fs::write(&readme, "# tool\n\nVersion: 0.7.1\n").unwrap();

        let args = MetadataArgs {
            commit_hash: Some("a1b2c3d4e5f6".into()),
            branch: Some("main".into()),
            version_file_input: Some(readme),
            ..Default::default()
        };
        let record = assemble(&args, &versions(&args), now()).unwrap();
        assert_eq!(record.version(), "0.7.1-main-a1b2c3d");
    }

    #[test]
    fn flags_override_version_config() {
        let args = MetadataArgs {
            version_tag_pattern: Some("^release-(.+)$".into()),
            version_pattern: Some("v=(\\S+)".into()),
            version_file_input: Some(PathBuf::from("VERSION.txt")),
            ..Default::default()
        };
        let config = VersionConfig {
            env_var: String::new(),
            file: Some(PathBuf::from("README.md")),
            ..VersionConfig::default()
        };

        let inputs = VersionInputs::resolve(&args, &config);
        assert_eq!(inputs.env_value, None);
        assert_eq!(inputs.tag_pattern.as_deref(), Some("^release-(.+)$"));
        assert_eq!(inputs.file, Some(PathBuf::from("VERSION.txt")));
        assert_eq!(inputs.file_pattern, "v=(\\S+)");
    }

    #[test]
    fn unmatched_tag_is_user_error() {
        let args = MetadataArgs {
            tag: Some("nightly".into()),
            ..Default::default()
        };
        let err = assemble(&args, &versions(&args), now()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_version_file_fails() {
        let dir = TempDir::new().unwrap();
        let args = MetadataArgs {
            version_file_input: Some(dir.path().join("absent.md")),
            ..Default::default()
        };

        assert!(assemble(&args, &versions(&args), now()).is_err());
    }

    #[test]
    fn malformed_json_is_user_error() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, "{ not json");
        let args = MetadataArgs {
            from_json: Some(path),
            ..Default::default()
        };

        assert_eq!(assemble(&args, &VersionInputs::default(), now()).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn unparsable_git_date_is_user_error() {
        let args = MetadataArgs {
            git_date: Some("last tuesday".into()),
            ..Default::default()
        };

        assert_eq!(assemble(&args, &VersionInputs::default(), now()).unwrap_err().exit_code(), 2);
    }
}
