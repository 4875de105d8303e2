use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::workdir;
use crate::cli::CLI_VERSION;
use crate::code_generation::language::go::toolchain::{GoToolchain, UpgradeOutcome};
use crate::shared::shell::SystemShell;

pub fn spec() -> Command {
    Command::new("upgrade")
        .visible_alias("upg")
        .about("Rebuild bima from its latest release and install it")
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let dir = workdir(matches)?;
    match GoToolchain::new(&SystemShell, &dir).upgrade(CLI_VERSION)? {
        UpgradeOutcome::UpToDate(_) => println!("Bima Cli is already up to date"),
        UpgradeOutcome::Upgraded(version) => println!("Bima Cli is upgraded to {}", version),
    }
    Ok(())
}
