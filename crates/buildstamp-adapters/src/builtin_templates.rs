//! Built-in language templates and user template discovery.
//!
//! The built-in manifests are compiled into the binary with `include_str!`
//! and parsed once, on first use, behind a [`OnceLock`]. Afterwards they are
//! shared read-only as `Arc<LanguageTemplate>`.
//!
//! # User template resolution order
//!
//! [`user_template_dirs`] lists the directories searched for extra manifests,
//! highest priority first:
//!
//! 1. The explicit directory (`--templates-dir`, or `templates.local_path`
//!    from the config file).
//! 2. **`$BUILDSTAMP_TEMPLATES_DIR`**.
//! 3. **`./.buildstamp/templates`** relative to the current directory.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use tracing::{debug, instrument};

use buildstamp_core::domain::{DomainError, LanguageTemplate};

use crate::template_loader::parse_manifest;

/// Environment variable naming an extra templates directory.
pub const TEMPLATES_DIR_ENV: &str = "BUILDSTAMP_TEMPLATES_DIR";

/// Project-local templates directory, relative to the working directory.
pub const LOCAL_TEMPLATES_DIR: &str = ".buildstamp/templates";

const MANIFESTS: &[(&str, &str)] = &[
    ("c", include_str!("../templates/c.toml")),
    ("csharp", include_str!("../templates/csharp.toml")),
    ("go", include_str!("../templates/go.toml")),
    ("java", include_str!("../templates/java.toml")),
    ("json", include_str!("../templates/json.toml")),
    ("python", include_str!("../templates/python.toml")),
    ("rust", include_str!("../templates/rust.toml")),
    ("shell", include_str!("../templates/shell.toml")),
    ("typescript", include_str!("../templates/typescript.toml")),
];

static BUILTIN: OnceLock<Result<Vec<Arc<LanguageTemplate>>, DomainError>> = OnceLock::new();

/// All built-in templates, ordered by language id.
///
/// An invalid built-in manifest is a load error for the whole set.
pub fn all_templates() -> Result<Vec<Arc<LanguageTemplate>>, DomainError> {
    BUILTIN.get_or_init(load_builtin).clone()
}

/// Raw TOML of a built-in manifest, for use as a starting point for custom
/// templates.
pub fn manifest_source(language: &str) -> Option<&'static str> {
    MANIFESTS
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(language))
        .map(|(_, raw)| *raw)
}

#[instrument]
fn load_builtin() -> Result<Vec<Arc<LanguageTemplate>>, DomainError> {
    let templates = MANIFESTS
        .iter()
        .map(|(id, raw)| {
            parse_manifest(raw, None).map(Arc::new).map_err(|e| {
                DomainError::InvalidTemplate(format!("built-in manifest '{id}': {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = templates.len(), "built-in templates parsed");
    Ok(templates)
}

/// Candidate user template directories, highest priority first.
///
/// Directories are not checked for existence here.
pub fn user_template_dirs(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);

    if let Some(dir) = explicit {
        paths.push(dir.to_path_buf());
    }

    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
        if !env_dir.trim().is_empty() {
            let p = PathBuf::from(env_dir);
            debug!(path = %p.display(), "candidate from $BUILDSTAMP_TEMPLATES_DIR");
            paths.push(p);
        }
    }

    paths.push(PathBuf::from(LOCAL_TEMPLATES_DIR));
    paths
}
