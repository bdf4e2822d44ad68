//! `buildstamp generate`: render pairs and write them to disk.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use buildstamp_adapters::LocalFilesystem;
use buildstamp_core::{
    application::{StampService, WriteOptions, WrittenFile, WrittenPair},
    domain::{MetadataRecord, RenderedPair},
};

use crate::{
    cli::GenerateArgs,
    commands::{descriptor_name, metadata, render_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Report {
    metadata: MetadataRecord,
    dry_run: bool,
    pairs: Vec<PairReport>,
    exports: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PairReport {
    language: String,
    declaration: PathBuf,
    definition: PathBuf,
}

impl From<&WrittenPair> for PairReport {
    fn from(w: &WrittenPair) -> Self {
        Self {
            language: w.language.clone(),
            declaration: w.declaration.clone(),
            definition: w.definition.clone(),
        }
    }
}

#[instrument(skip_all)]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let languages = if args.languages.is_empty() {
        config.defaults.languages.clone()
    } else {
        args.languages.clone()
    };
    if languages.is_empty() {
        return Err(CliError::invalid_input(
            "no language given; pass --lang or set defaults.languages",
        ));
    }

    let versions = metadata::VersionInputs::resolve(&args.metadata, &config.version);
    let record = metadata::assemble(&args.metadata, &versions, Utc::now())?;
    let descriptor = descriptor_name(args.metadata.descriptor_name, &config)?;
    let service = render_service(args.templates_dir.as_deref(), &config, descriptor)?;

    // Render everything before writing anything, so an unknown language or a
    // failed check leaves the tree untouched.
    let mut pairs: Vec<RenderedPair> = Vec::with_capacity(languages.len());
    for language in &languages {
        let pair = if args.check {
            service.render_checked(&record, language)?
        } else {
            service.render(&record, language)?
        };
        if pairs.iter().any(|p| p.language() == pair.language()) {
            info!(language = pair.language(), "Duplicate language skipped");
            continue;
        }
        pairs.push(pair);
    }

    let stamp = StampService::new(Box::new(LocalFilesystem::new()));
    let options = WriteOptions {
        force: args.force,
        dry_run: args.dry_run,
    };
    let out_dir = args.out_dir.clone().unwrap_or_else(|| config.output.dir.clone());
    let build_info_file = args
        .build_info_file
        .clone()
        .or_else(|| config.output.build_info_file.clone());
    let version_file = args
        .version_file
        .clone()
        .or_else(|| config.output.version_file.clone());

    // Refuse the whole batch if any target exists, so a clash on the last
    // file does not leave the first ones written.
    let exports: Vec<&Path> = [&build_info_file, &version_file]
        .into_iter()
        .filter_map(|path| path.as_deref())
        .collect();
    stamp.preflight(&pairs, &out_dir, &exports, options)?;

    let mut report = Report {
        metadata: record.clone(),
        dry_run: args.dry_run,
        pairs: Vec::with_capacity(pairs.len()),
        exports: Vec::new(),
    };

    for pair in &pairs {
        let written = stamp.write_pair(pair, &out_dir, options)?;
        report_pair(&output, &written, args.dry_run)?;
        report.pairs.push(PairReport::from(&written));
    }

    if let Some(path) = build_info_file {
        let json = serde_json::to_string_pretty(&record).map_err(|e| CliError::InvalidInput {
            message: "metadata cannot be serialised".into(),
            source: Some(Box::new(e)),
        })?;
        let written = stamp.write_file(&path, &format!("{json}\n"), options)?;
        report_export(&output, &written, "build info")?;
        report.exports.push(written.path);
    }

    if let Some(path) = version_file {
        let written = stamp.write_file(&path, &format!("{}\n", record.version()), options)?;
        report_export(&output, &written, "version")?;
        report.exports.push(written.path);
    }

    if output.is_json() {
        output.json(&report)?;
    } else if !args.dry_run {
        output.success(&format!(
            "Stamped {} language(s) into {}",
            report.pairs.len(),
            display_dir(&out_dir)
        ))?;
    }

    Ok(())
}

fn report_pair(output: &OutputManager, written: &WrittenPair, dry_run: bool) -> CliResult<()> {
    if output.is_json() {
        return Ok(());
    }
    let verb = if dry_run { "Would write" } else { "Wrote" };
    output.info(&format!(
        "{verb} {} and {} ({})",
        written.declaration.display(),
        written.definition.display(),
        written.language
    ))?;
    Ok(())
}

fn report_export(output: &OutputManager, written: &WrittenFile, what: &str) -> CliResult<()> {
    if output.is_json() {
        return Ok(());
    }
    let verb = if written.written { "Wrote" } else { "Would write" };
    output.info(&format!("{verb} {what} file {}", written.path.display()))?;
    Ok(())
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() || dir == Path::new(".") {
        "the current directory".into()
    } else {
        dir.display().to_string()
    }
}
