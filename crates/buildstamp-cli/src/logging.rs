//! Tracing subscriber initialisation.
//!
//! Only the CLI installs a subscriber; `buildstamp-core` and
//! `buildstamp-adapters` only emit spans and events.
//!
//! | Flag(s)   | Filter level |
//! |-----------|--------------|
//! | (none)    | WARN         |
//! | `-v`      | INFO         |
//! | `-vv`     | DEBUG        |
//! | `-vvv`    | TRACE        |
//! | `--quiet` | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

const CRATES: [&str; 3] = ["buildstamp", "buildstamp_core", "buildstamp_adapters"];

/// Initialise the global tracing subscriber. Logs go to stderr so stdout
/// stays clean for rendered output and JSON.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(derive_level(args))));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// One directive per workspace crate, all at `level`.
fn filter_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
