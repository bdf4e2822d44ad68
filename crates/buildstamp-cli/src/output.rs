//! Output management and formatting.
//!
//! Status lines go through [`OutputManager`] and respect `--quiet` and
//! `--no-color`. Payloads (rendered source, JSON documents) go through
//! [`OutputManager::content`] and [`OutputManager::json`], which always
//! write.

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// `--output-format` wins over `output.format` from the config; `auto`
    /// resolves to human on a terminal and plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_str(&config.output.format, true).unwrap_or(OutputFormat::Auto)
            }
            explicit => explicit,
        };

        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Status lines ──────────────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// `✓ <msg>`
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status("\u{2713}", msg, |s| s.green().bold().to_string())
    }

    /// `⚠ <msg>`
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status("\u{26a0}", msg, |s| s.yellow().bold().to_string())
    }

    /// `ℹ <msg>`
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status("\u{2139}", msg, |s| s.blue().bold().to_string())
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if !self.supports_color() {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    fn status(&self, mark: &str, msg: &str, paint: impl Fn(&str) -> String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if !self.supports_color() {
            format!("{mark} {msg}")
        } else {
            format!("{} {msg}", paint(mark))
        };
        self.term.write_line(&line)
    }

    // ── Payloads ──────────────────────────────────────────────────────────

    /// Write text exactly as given. Not suppressed by `--quiet`.
    pub fn content(&self, text: &str) -> io::Result<()> {
        self.term.write_str(text)?;
        if !text.ends_with('\n') {
            self.term.write_line("")?;
        }
        Ok(())
    }

    /// Pretty-printed JSON document. Not suppressed by `--quiet`.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    pub fn is_json(&self) -> bool {
        self.format() == OutputFormat::Json
    }
}
