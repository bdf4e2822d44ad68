//! `buildstamp config`: inspect configuration values.

use std::path::Path;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&Path>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            })?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.content(&display_value(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.header("Current configuration:")?;
                output.content(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            let path = AppConfig::resolve_file(config_file).unwrap_or_else(AppConfig::config_path);
            output.content(&path.display().to_string())?;
        }
    }

    Ok(())
}

/// Strings print bare; everything else as JSON.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_print_without_quotes() {
        assert_eq!(display_value(&json!("smart")), "smart");
    }

    #[test]
    fn lists_print_as_json() {
        assert_eq!(display_value(&json!(["c", "go"])), r#"["c","go"]"#);
    }

    #[test]
    fn unset_prints_empty() {
        assert_eq!(display_value(&serde_json::Value::Null), "");
    }
}
