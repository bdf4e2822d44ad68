//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `BUILDSTAMP__SECTION__KEY`, e.g.
//!    `BUILDSTAMP__DEFAULTS__LANGUAGES=c,go`
//! 3. Config file: `--config FILE`, else `./.buildstamp.toml`, else
//!    [`AppConfig::config_path`]
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use buildstamp_core::domain::{DEFAULT_FILE_PATTERN, DEFAULT_TAG_PATTERN};

/// File name of the project-local configuration.
pub const LOCAL_CONFIG_FILE: &str = ".buildstamp.toml";

const ENV_PREFIX: &str = "BUILDSTAMP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// What to render when flags do not say.
    pub defaults: Defaults,
    /// Where and how results are written.
    pub output: OutputConfig,
    /// Extra template manifests.
    pub templates: TemplateConfig,
    /// How a version is derived when `--version` is absent.
    pub version: VersionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Languages for `generate` without `--lang`; the first one is used by
    /// `render`.
    pub languages: Vec<String>,
    /// `smart` or `tag_or_branch`.
    pub descriptor_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`. `--output-format` wins.
    pub format: String,
    pub build_info_file: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub local_path: Option<PathBuf>,
}

/// Version derivation, tried in field order after an explicit version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Variable holding the version. Empty disables it.
    pub env_var: String,
    /// Optional regex applied to the variable; its first group is the version.
    pub env_pattern: Option<String>,
    /// Regex applied to `--tag`. Empty disables tag derivation.
    pub tag_pattern: String,
    /// File searched with `file_pattern`, e.g. `README.md`. Off unless set.
    pub file: Option<PathBuf>,
    pub file_pattern: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            env_var: "VERSION".into(),
            env_pattern: None,
            tag_pattern: DEFAULT_TAG_PATTERN.into(),
            file: None,
            file_pattern: DEFAULT_FILE_PATTERN.into(),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            languages: vec!["c".into()],
            descriptor_name: "smart".into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            no_color: false,
            format: "auto".into(),
            build_info_file: None,
            version_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// skipped when absent.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to serialise default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Loading explicit config file");
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = Self::resolve_file(None) {
                    debug!(path = %path.display(), "Loading config file");
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("defaults.languages")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// The config file that [`load`](Self::load) reads, if any.
    pub fn resolve_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        [PathBuf::from(LOCAL_CONFIG_FILE), Self::config_path()]
            .into_iter()
            .find(|p| p.is_file())
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.buildstamp.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "buildstamp", "buildstamp")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Look up a dotted key such as `defaults.languages`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let root = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(&root, |value, segment| value.get(segment))
            .cloned()
    }
}
