//! `buildstamp render`: print a rendered pair, write nothing.

use chrono::Utc;

use crate::{
    cli::{Part, RenderArgs},
    commands::{descriptor_name, metadata, render_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let language = args
        .language
        .clone()
        .or_else(|| config.defaults.languages.first().cloned())
        .ok_or_else(|| {
            CliError::invalid_input("no language given; pass --lang or set defaults.languages")
        })?;

    let versions = metadata::VersionInputs::resolve(&args.metadata, &config.version);
    let record = metadata::assemble(&args.metadata, &versions, Utc::now())?;
    let descriptor = descriptor_name(args.metadata.descriptor_name, &config)?;
    let service = render_service(args.templates_dir.as_deref(), &config, descriptor)?;

    let pair = service.render_checked(&record, &language)?;

    if output.is_json() {
        output.json(&pair)?;
        return Ok(());
    }

    match args.part {
        Part::Declaration => output.content(pair.declaration())?,
        Part::Definition => output.content(pair.definition())?,
        Part::Both => {
            output.header(&format!("==> {} <==", pair.files().declaration))?;
            output.content(pair.declaration())?;
            output.header(&format!("==> {} <==", pair.files().definition))?;
            output.content(pair.definition())?;
        }
    }

    Ok(())
}
