//! `buildstamp check`: run the consistency validator on files on disk.

use serde_json::json;
use tracing::instrument;

use buildstamp_adapters::LocalFilesystem;
use buildstamp_core::application::StampService;

use crate::{
    cli::CheckArgs,
    commands::{descriptor_name, render_service},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(language = %args.language))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let descriptor = descriptor_name(args.descriptor_name, &config)?;
    let service = render_service(args.templates_dir.as_deref(), &config, descriptor)?;

    let files = StampService::new(Box::new(LocalFilesystem::new()));
    let declaration = files.read(&args.declaration)?;
    let definition = files.read(&args.definition)?;

    service.check(&args.language, args.convention, &declaration, &definition)?;

    if output.is_json() {
        output.json(&json!({
            "language": args.language,
            "declaration": args.declaration,
            "definition": args.definition,
            "consistent": true,
        }))?;
    } else {
        output.success(&format!(
            "{} and {} agree on all five fields",
            args.declaration.display(),
            args.definition.display()
        ))?;
    }

    Ok(())
}
