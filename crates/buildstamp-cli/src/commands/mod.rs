//! Command handlers, one module per subcommand.

use std::path::Path;

use buildstamp_adapters::InMemoryCatalog;
use buildstamp_core::{
    application::RenderService,
    domain::{DescriptorName, NamingRegistry},
};

use crate::{
    cli::DescriptorNameArg,
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod check;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod metadata;
pub mod render;

/// Render service over the built-in templates plus any user manifests.
///
/// `--templates-dir` wins over `templates.local_path` from the config.
pub(crate) fn render_service(
    templates_dir: Option<&Path>,
    config: &AppConfig,
    descriptor: DescriptorName,
) -> CliResult<RenderService> {
    let explicit = templates_dir.or(config.templates.local_path.as_deref());
    let catalog = InMemoryCatalog::discover(explicit)?;

    Ok(RenderService::new(Box::new(catalog))
        .with_registry(NamingRegistry::standard().with_descriptor(descriptor)))
}

/// The descriptor spelling: flag, else config, else `smart`.
pub(crate) fn descriptor_name(
    flag: Option<DescriptorNameArg>,
    config: &AppConfig,
) -> CliResult<DescriptorName> {
    match flag {
        Some(arg) => Ok(arg.into()),
        None => config
            .defaults
            .descriptor_name
            .parse()
            .map_err(|_| CliError::ConfigError {
                message: format!(
                    "defaults.descriptor_name must be 'smart' or 'tag_or_branch', got '{}'",
                    config.defaults.descriptor_name
                ),
                source: None,
            }),
    }
}
