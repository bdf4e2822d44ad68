//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use buildstamp_core::domain::{DescriptorName, NamingConvention};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "buildstamp",
    bin_name = "buildstamp",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Stamp build metadata into source files",
    long_about = "buildstamp renders version, commit and build date information \
                  into a declaration/definition pair of source files for C, Go, \
                  Rust, Python, TypeScript, Java, C#, shell or JSON, and checks \
                  that such pairs agree on their field names.",
    after_help = "EXAMPLES:\n\
        \x20 buildstamp generate --lang c --version 1.4.0 --commit-hash $(git rev-parse HEAD)\n\
        \x20 buildstamp render --lang go --from-json build.json\n\
        \x20 buildstamp check --lang c --declaration version.h --definition version.c\n\
        \x20 buildstamp completions bash > /usr/share/bash-completion/completions/buildstamp",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render and write build info files.
    #[command(
        visible_alias = "gen",
        about = "Write build info files for one or more languages",
        after_help = "EXAMPLES:\n\
            \x20 buildstamp generate --lang c --version 1.4.0 --tag v1.4.0\n\
            \x20 buildstamp gen -l go -l json --from-json build.json --out-dir internal/buildinfo\n\
            \x20 buildstamp gen -l rust --check --dry-run"
    )]
    Generate(GenerateArgs),

    /// Print a rendered pair without writing anything.
    #[command(
        about = "Print the rendered pair for one language",
        after_help = "EXAMPLES:\n\
            \x20 buildstamp render --lang python --version 2.0.0\n\
            \x20 buildstamp render --lang c --output-format json"
    )]
    Render(RenderArgs),

    /// Check that a declaration and a definition agree on field names.
    #[command(
        about = "Validate an existing declaration/definition pair",
        after_help = "EXAMPLES:\n\
            \x20 buildstamp check --lang c --declaration version.h --definition version.c\n\
            \x20 buildstamp check --lang c --declaration version.h --definition main.c --convention camel"
    )]
    Check(CheckArgs),

    /// List available languages.
    #[command(
        visible_alias = "ls",
        about = "List available languages",
        after_help = "EXAMPLES:\n\
            \x20 buildstamp list\n\
            \x20 buildstamp list --format json"
    )]
    List(ListArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 buildstamp init           # user config directory\n\
            \x20 buildstamp init --local   # ./.buildstamp.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 buildstamp completions bash > ~/.local/share/bash-completion/completions/buildstamp\n\
            \x20 buildstamp completions zsh  > ~/.zfunc/_buildstamp\n\
            \x20 buildstamp completions fish > ~/.config/fish/completions/buildstamp.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 buildstamp config get defaults.languages\n\
            \x20 buildstamp config list\n\
            \x20 buildstamp config path"
    )]
    Config(ConfigCommands),
}

// ── metadata ──────────────────────────────────────────────────────────────────

/// The five metadata values and the inputs they can be derived from.
///
/// Every flag falls back to a `BUILDSTAMP_*` environment variable.
#[derive(Debug, Default, Args)]
pub struct MetadataArgs {
    /// Release version, e.g. `1.4.0`.
    #[arg(
        long = "version",
        value_name = "VERSION",
        env = "BUILDSTAMP_VERSION",
        help = "Release version"
    )]
    pub release_version: Option<String>,

    #[arg(
        long = "commit-hash",
        value_name = "HASH",
        env = "BUILDSTAMP_COMMIT_HASH",
        help = "Full commit hash"
    )]
    pub commit_hash: Option<String>,

    /// Commit date, used verbatim.
    #[arg(
        long = "commit-date",
        value_name = "DATE",
        env = "BUILDSTAMP_COMMIT_DATE",
        conflicts_with = "git_date",
        help = "Commit date, used as given"
    )]
    pub commit_date: Option<String>,

    /// Commit date as printed by `git log --format=%ci` (or RFC 3339),
    /// normalized to UTC `YYYY-MM-DD-HHMM`.
    #[arg(
        long = "git-date",
        value_name = "DATE",
        env = "BUILDSTAMP_GIT_DATE",
        help = "Commit date in git format, normalized to UTC"
    )]
    pub git_date: Option<String>,

    /// Commit descriptor. Derived from `--tag`/`--branch` when absent.
    #[arg(
        long = "descriptor",
        value_name = "TEXT",
        env = "BUILDSTAMP_DESCRIPTOR",
        help = "Commit descriptor (tag, or branch-shorthash)"
    )]
    pub descriptor: Option<String>,

    #[arg(
        long = "tag",
        value_name = "TAG",
        env = "BUILDSTAMP_TAG",
        help = "Tag pointing at the commit"
    )]
    pub tag: Option<String>,

    #[arg(
        long = "branch",
        value_name = "BRANCH",
        env = "BUILDSTAMP_BRANCH",
        help = "Branch the commit is on"
    )]
    pub branch: Option<String>,

    /// Build date. Defaults to now, UTC `YYYY-MM-DD-HHMM`.
    #[arg(
        long = "build-date",
        value_name = "DATE",
        env = "BUILDSTAMP_BUILD_DATE",
        help = "Build date (default: now)"
    )]
    pub build_date: Option<String>,

    /// Regex whose first capture group turns `--tag` into the version.
    #[arg(
        long = "version-tag-pattern",
        value_name = "REGEX",
        env = "BUILDSTAMP_VERSION_TAG_PATTERN",
        help = "Derive the version from the tag (default: ^v?([0-9.]+)$)"
    )]
    pub version_tag_pattern: Option<String>,

    /// File to read the version from when neither `--version`, the version
    /// variable nor the tag gives one. The descriptor is appended.
    #[arg(
        long = "version-file-input",
        value_name = "FILE",
        env = "BUILDSTAMP_VERSION_FILE_INPUT",
        help = "Derive the version from a file, e.g. README.md"
    )]
    pub version_file_input: Option<PathBuf>,

    #[arg(
        long = "version-pattern",
        value_name = "REGEX",
        env = "BUILDSTAMP_VERSION_PATTERN",
        help = "Regex applied to --version-file-input (default: 'Version: ([0-9.]+)\\n')"
    )]
    pub version_pattern: Option<String>,

    /// Seed all five values from a build info JSON document.
    #[arg(
        long = "from-json",
        value_name = "FILE",
        help = "Read metadata from a build info JSON file"
    )]
    pub from_json: Option<PathBuf>,

    /// Historical name of the descriptor field.
    #[arg(
        long = "descriptor-name",
        value_enum,
        value_name = "NAME",
        help = "Descriptor field name [default: from config, else smart]"
    )]
    pub descriptor_name: Option<DescriptorNameArg>,
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Target languages. Repeatable or comma separated.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANGUAGE",
        value_delimiter = ',',
        help = "Target language(s) [default: from config]"
    )]
    pub languages: Vec<String>,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    #[arg(
        short = 'o',
        long = "out-dir",
        value_name = "DIR",
        help = "Directory for the generated files [default: from config, else .]"
    )]
    pub out_dir: Option<PathBuf>,

    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Directory of extra template manifests"
    )]
    pub templates_dir: Option<PathBuf>,

    /// Validate each pair before writing it.
    #[arg(long = "check", help = "Validate the rendered pairs before writing")]
    pub check: bool,

    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Also write the metadata as a build info JSON document.
    #[arg(
        long = "build-info-file",
        value_name = "FILE",
        help = "Also write the metadata as JSON"
    )]
    pub build_info_file: Option<PathBuf>,

    /// Also write the bare version string.
    #[arg(
        long = "version-file",
        value_name = "FILE",
        help = "Also write the version string"
    )]
    pub version_file: Option<PathBuf>,
}

// ── render ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANGUAGE",
        help = "Target language [default: first from config]"
    )]
    pub language: Option<String>,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    #[arg(long = "templates-dir", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    #[arg(
        long = "part",
        value_enum,
        default_value = "both",
        help = "Which half to print"
    )]
    pub part: Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Part {
    Declaration,
    Definition,
    Both,
}

// ── check ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(short = 'l', long = "lang", value_name = "LANGUAGE", help = "Language of the pair")]
    pub language: String,

    #[arg(long = "declaration", value_name = "FILE", help = "Declaration file (header, interface, ...)")]
    pub declaration: PathBuf,

    #[arg(long = "definition", value_name = "FILE", help = "Definition file")]
    pub definition: PathBuf,

    /// Expected naming convention, instead of the template's.
    #[arg(
        long = "convention",
        value_name = "CONVENTION",
        value_parser = parse_convention,
        help = "Expected naming convention [default: the template's]"
    )]
    pub convention: Option<NamingConvention>,

    #[arg(long = "descriptor-name", value_enum, value_name = "NAME")]
    pub descriptor_name: Option<DescriptorNameArg>,

    #[arg(long = "templates-dir", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,
}

fn parse_convention(s: &str) -> Result<NamingConvention, String> {
    s.parse().map_err(|e: buildstamp_core::domain::DomainError| e.to_string())
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    #[arg(long = "templates-dir", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One language id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.buildstamp.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.languages`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path of the configuration file in effect.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// CLI spelling of [`DescriptorName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DescriptorNameArg {
    /// `commit_smart`
    Smart,
    /// `commit_tag_or_branch`
    #[value(alias = "tag_or_branch")]
    TagOrBranch,
}

impl From<DescriptorNameArg> for DescriptorName {
    fn from(arg: DescriptorNameArg) -> Self {
        match arg {
            DescriptorNameArg::Smart => DescriptorName::Smart,
            DescriptorNameArg::TagOrBranch => DescriptorName::TagOrBranch,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "buildstamp",
            "generate",
            "--lang",
            "c,go",
            "-l",
            "json",
            "--version",
            "1.4.0",
            "--tag",
            "v1.4.0",
            "--check",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.languages, vec!["c", "go", "json"]);
        assert_eq!(args.metadata.release_version.as_deref(), Some("1.4.0"));
        assert_eq!(args.metadata.tag.as_deref(), Some("v1.4.0"));
        assert!(args.check);
    }

    #[test]
    fn gen_alias() {
        let cli = Cli::parse_from(["buildstamp", "gen", "-l", "rust"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn commit_date_conflicts_with_git_date() {
        let result = Cli::try_parse_from([
            "buildstamp",
            "render",
            "--commit-date",
            "2024-05-01-1200",
            "--git-date",
            "2024-05-01 12:00:00 +0000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_parses_convention_aliases() {
        let cli = Cli::parse_from([
            "buildstamp",
            "check",
            "--lang",
            "c",
            "--declaration",
            "version.h",
            "--definition",
            "version.c",
            "--convention",
            "camel",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("expected Check command");
        };
        assert_eq!(args.convention, Some(NamingConvention::CamelCase));
    }

    #[test]
    fn check_rejects_unknown_convention() {
        let result = Cli::try_parse_from([
            "buildstamp",
            "check",
            "--lang",
            "c",
            "--declaration",
            "a",
            "--definition",
            "b",
            "--convention",
            "train",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn descriptor_name_accepts_both_spellings() {
        for spelling in ["tag-or-branch", "tag_or_branch"] {
            let cli = Cli::parse_from([
                "buildstamp",
                "render",
                "--descriptor-name",
                spelling,
            ]);
            let Commands::Render(args) = cli.command else {
                panic!("expected Render command");
            };
            assert_eq!(
                args.metadata.descriptor_name.map(DescriptorName::from),
                Some(DescriptorName::TagOrBranch)
            );
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["buildstamp", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
