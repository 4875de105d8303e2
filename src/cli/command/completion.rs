use std::io;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueEnum};
use clap_complete::{generate, Generator, Shell};

use crate::cli::build_cli;

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

pub fn spec() -> Command {
    Command::new("completion")
        .about("Generate shell completion scripts")
        .long_about(
            "Generate shell completion scripts for bima.\n\n\
            Installation examples:\n  \
            Bash:       bima completion bash > /usr/local/etc/bash_completion.d/bima\n  \
            Zsh:        bima completion zsh > ~/.zsh/completion/_bima\n  \
            Fish:       bima completion fish > ~/.config/fish/completions/bima.fish\n  \
            PowerShell: bima completion powershell > bima.ps1",
        )
        .arg(
            Arg::new("shell")
                .help("Shell type to generate completion for")
                .value_parser(clap::value_parser!(CompletionShell))
                .required(true),
        )
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let Some(shell) = matches.get_one::<CompletionShell>("shell") else {
        anyhow::bail!("Shell argument is required");
    };

    let mut cmd = build_cli();
    let bin_name = cmd.get_name().to_string();
    print_completions(Shell::from(shell.clone()), &mut cmd, bin_name);

    Ok(())
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command, bin_name: String) {
    generate(gen, cmd, bin_name, &mut io::stdout());
}
