//! Shell completion generation.

use std::io;

use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::CliResult;

const BIN_NAME: &str = "buildstamp";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    match args.shell {
        Shell::Bash => write_completions(shells::Bash, &mut io::stdout()),
        Shell::Zsh => write_completions(shells::Zsh, &mut io::stdout()),
        Shell::Fish => write_completions(shells::Fish, &mut io::stdout()),
        Shell::PowerShell => write_completions(shells::PowerShell, &mut io::stdout()),
        Shell::Elvish => write_completions(shells::Elvish, &mut io::stdout()),
    }
    Ok(())
}

fn write_completions(shell: impl Generator, out: &mut dyn io::Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}
