//! `buildstamp list`

use buildstamp_core::application::LanguageInfo;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::{descriptor_name, render_service},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let descriptor = descriptor_name(None, &config)?;
    let service = render_service(args.templates_dir.as_deref(), &config, descriptor)?;
    let languages = service.languages()?;

    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available languages:")?;
            for info in &languages {
                output.print(&table_row(info))?;
            }
        }
        ListFormat::List => {
            for info in &languages {
                output.content(&info.language)?;
            }
        }
        ListFormat::Json => output.json(&languages)?,
        ListFormat::Csv => {
            output.content("language,aliases,convention,declaration,definition")?;
            for info in &languages {
                output.content(&csv_row(info))?;
            }
        }
    }

    Ok(())
}

fn table_row(info: &LanguageInfo) -> String {
    let aliases = if info.aliases.is_empty() {
        String::new()
    } else {
        format!(" ({})", info.aliases.join(", "))
    };
    format!(
        "  {:<12} {:<16} {} + {}{}",
        info.language, info.convention, info.declaration_file, info.definition_file, aliases
    )
}

fn csv_row(info: &LanguageInfo) -> String {
    format!(
        "{},{},{},{},{}",
        info.language,
        info.aliases.join(";"),
        info.convention,
        info.declaration_file,
        info.definition_file
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> LanguageInfo {
        LanguageInfo {
            language: "go".into(),
            name: "Go".into(),
            aliases: vec!["golang".into()],
            convention: "PascalCase".into(),
            declaration_file: "buildinfo.go".into(),
            definition_file: "buildinfo_values.go".into(),
            description: String::new(),
        }
    }

    #[test]
    fn csv_row_joins_aliases() {
        assert_eq!(
            csv_row(&info()),
            "go,golang,PascalCase,buildinfo.go,buildinfo_values.go"
        );
    }

    #[test]
    fn table_row_mentions_files_and_aliases() {
        let row = table_row(&info());
        assert!(row.contains("buildinfo.go + buildinfo_values.go"));
        assert!(row.ends_with("(golang)"));
    }
}
