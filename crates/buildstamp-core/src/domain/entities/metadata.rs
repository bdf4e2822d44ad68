use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::value_objects::CanonicalField;

/// Format of normalized dates: UTC, minute precision, filename safe.
pub const DATE_FORMAT: &str = "%Y-%m-%d-%H%M";

/// Version pattern applied to tags: `v1.2.3` and `1.2.3` both give `1.2.3`.
pub const DEFAULT_TAG_PATTERN: &str = r"^v?([0-9.]+)$";

/// Version pattern applied to a version input file such as a README.
pub const DEFAULT_FILE_PATTERN: &str = "Version: ([0-9.]+)\n";

/// Git's default committer date format (`git show -s --format=%ci`).
pub const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

const SHORT_HASH_LEN: usize = 7;

/// The five build metadata values.
///
/// Every field is a string that may be empty but is never absent. The JSON
/// form uses the keys of the `build.json` files CI pipelines already emit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    version: String,
    #[serde(rename = "git_hash", default)]
    commit_hash: String,
    #[serde(rename = "git_date", default)]
    commit_date: String,
    #[serde(rename = "git_smart", alias = "git_tag_or_branch", default)]
    commit_descriptor: String,
    #[serde(default)]
    build_date: String,
}

impl MetadataRecord {
    pub fn new(
        version: impl Into<String>,
        commit_hash: impl Into<String>,
        commit_date: impl Into<String>,
        commit_descriptor: impl Into<String>,
        build_date: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            commit_hash: commit_hash.into(),
            commit_date: commit_date.into(),
            commit_descriptor: commit_descriptor.into(),
            build_date: build_date.into(),
        }
    }

    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    pub fn commit_date(&self) -> &str {
        &self.commit_date
    }

    pub fn commit_descriptor(&self) -> &str {
        &self.commit_descriptor
    }

    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Version => &self.version,
            CanonicalField::CommitHash => &self.commit_hash,
            CanonicalField::CommitDate => &self.commit_date,
            CanonicalField::CommitDescriptor => &self.commit_descriptor,
            CanonicalField::BuildDate => &self.build_date,
        }
    }

    /// Fields with their values, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        CanonicalField::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

/// Assembles a [`MetadataRecord`] from partial inputs.
///
/// Explicit values always win. Missing values are derived:
/// - version from the environment value, else the tag, else file content
///   (see [`version_from_env`](Self::version_from_env))
/// - commit date from a raw git date, normalized to UTC
/// - descriptor from tag, else `branch-shorthash`, else the short hash
/// - build date from the clock passed to [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    version: Option<String>,
    env_version: Option<EnvVersion>,
    tag_pattern: Option<String>,
    content_version: Option<ContentVersion>,
    commit_hash: Option<String>,
    commit_date: Option<String>,
    commit_date_raw: Option<String>,
    commit_descriptor: Option<String>,
    tag: Option<String>,
    branch: Option<String>,
    build_date: Option<String>,
}

impl MetadataBuilder {
    /// Seed every field from an existing record.
    pub fn from_record(record: &MetadataRecord) -> Self {
        Self {
            version: Some(record.version.clone()),
            commit_hash: Some(record.commit_hash.clone()),
            commit_date: Some(record.commit_date.clone()),
            commit_descriptor: Some(record.commit_descriptor.clone()),
            build_date: Some(record.build_date.clone()),
            ..Self::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Version taken from an environment variable, first in line when no
    /// explicit version is set. With a `pattern`, its first capture group is
    /// used instead of the whole value. Empty values are ignored.
    pub fn version_from_env(mut self, value: impl Into<String>, pattern: Option<String>) -> Self {
        self.env_version = Some(EnvVersion {
            value: value.into(),
            pattern,
        });
        self
    }

    /// Derive the version from the tag's first capture group of `pattern`.
    /// Consulted after the environment; a tag that does not match is an error.
    pub fn version_from_tag(mut self, pattern: impl Into<String>) -> Self {
        self.tag_pattern = Some(pattern.into());
        self
    }

    /// Derive the version from `content` (read from `origin`), last in line.
    /// The descriptor is appended as `<version>-<descriptor>`, since a file
    /// version alone does not identify the commit.
    pub fn version_from_content(
        mut self,
        origin: impl Into<String>,
        content: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.content_version = Some(ContentVersion {
            origin: origin.into(),
            content: content.into(),
            pattern: pattern.into(),
        });
        self
    }

    pub fn commit_hash(mut self, hash: impl Into<String>) -> Self {
        self.commit_hash = Some(hash.into());
        self
    }

    /// Commit date, used verbatim.
    pub fn commit_date(mut self, date: impl Into<String>) -> Self {
        self.commit_date = Some(date.into());
        self
    }

    /// Commit date as printed by git (or RFC 3339), normalized at build time.
    pub fn commit_date_raw(mut self, raw: impl Into<String>) -> Self {
        self.commit_date_raw = Some(raw.into());
        self
    }

    pub fn commit_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.commit_descriptor = Some(descriptor.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn build_date(mut self, date: impl Into<String>) -> Self {
        self.build_date = Some(date.into());
        self
    }

    pub fn build(self, now: DateTime<Utc>) -> Result<MetadataRecord, DomainError> {
        let commit_hash = self.commit_hash.unwrap_or_default();

        let commit_date = match (self.commit_date, self.commit_date_raw) {
            (Some(date), _) => date,
            (None, Some(raw)) => normalize_git_date(&raw)?,
            (None, None) => String::new(),
        };

        let commit_descriptor = self.commit_descriptor.unwrap_or_else(|| {
            smart_descriptor(self.tag.as_deref(), self.branch.as_deref(), &commit_hash)
        });

        let build_date = self
            .build_date
            .unwrap_or_else(|| now.format(DATE_FORMAT).to_string());

        let version = match self.version {
            Some(version) => version,
            None => derive_version(
                self.env_version,
                self.tag.as_deref(),
                self.tag_pattern.as_deref(),
                self.content_version,
                &commit_descriptor,
            )?,
        };

        Ok(MetadataRecord {
            version,
            commit_hash,
            commit_date,
            commit_descriptor,
            build_date,
        })
    }
}

#[derive(Debug, Clone)]
struct EnvVersion {
    value: String,
    pattern: Option<String>,
}

#[derive(Debug, Clone)]
struct ContentVersion {
    origin: String,
    content: String,
    pattern: String,
}

fn derive_version(
    env: Option<EnvVersion>,
    tag: Option<&str>,
    tag_pattern: Option<&str>,
    content: Option<ContentVersion>,
    descriptor: &str,
) -> Result<String, DomainError> {
    if let Some(env) = env.filter(|e| !e.value.is_empty()) {
        return match env.pattern.as_deref().filter(|p| !p.is_empty()) {
            Some(pattern) => extract_version("the version variable", &env.value, pattern),
            None => Ok(env.value),
        };
    }

    let tag = tag.filter(|t| !t.is_empty());
    if let (Some(tag), Some(pattern)) = (tag, tag_pattern.filter(|p| !p.is_empty())) {
        return extract_version(&format!("tag '{tag}'"), tag, pattern);
    }

    match content {
        Some(input) => {
            let version = extract_version(&input.origin, &input.content, &input.pattern)?;
            Ok(if descriptor.is_empty() {
                version
            } else {
                format!("{version}-{descriptor}")
            })
        }
        None => Ok(String::new()),
    }
}

/// First capture group of `pattern` in `content`.
///
/// `input` names the content in the error when nothing matches.
pub fn extract_version(input: &str, content: &str, pattern: &str) -> Result<String, DomainError> {
    let re = Regex::new(pattern).map_err(|e| DomainError::InvalidVersionPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    if re.captures_len() < 2 {
        return Err(DomainError::InvalidVersionPattern {
            pattern: pattern.to_string(),
            reason: "no capture group".into(),
        });
    }

    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DomainError::NoVersionInContent {
            input: input.to_string(),
            pattern: pattern.to_string(),
        })
}

/// Parse a git or RFC 3339 date and format it as [`DATE_FORMAT`] in UTC.
pub fn normalize_git_date(raw: &str) -> Result<String, DomainError> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, GIT_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|date| date.with_timezone(&Utc).format(DATE_FORMAT).to_string())
        .map_err(|e| DomainError::InvalidMetadata {
            field: CanonicalField::CommitDate,
            reason: format!("cannot parse '{raw}': {e}"),
        })
}

/// Tag if there is one, else `branch-shorthash`, else the short hash.
pub fn smart_descriptor(tag: Option<&str>, branch: Option<&str>, hash: &str) -> String {
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        return tag.to_string();
    }

    let short = short_hash(hash);
    match branch.map(clean_branch).filter(|b| !b.is_empty()) {
        Some(branch) if !short.is_empty() => format!("{branch}-{short}"),
        Some(branch) => branch,
        None => short.to_string(),
    }
}

pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(SHORT_HASH_LEN) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// Collapse every run of characters outside `[A-Za-z0-9_-]` into one `-`.
fn clean_branch(branch: &str) -> String {
    let mut out = String::with_capacity(branch.len());
    let mut in_run = false;

    for c in branch.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }

    out
}
