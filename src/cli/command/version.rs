use std::fs;

use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::workdir;
use crate::cli::CLI_VERSION;
use crate::code_generation::language::go::toolchain::framework_version;

pub fn spec() -> Command {
    Command::new("version")
        .visible_alias("v")
        .about("Show the framework version of the application and the CLI version")
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let go_mod = workdir(matches)?.join("go.mod");
    let framework = fs::read_to_string(go_mod)
        .ok()
        .and_then(|content| framework_version(&content))
        .unwrap_or_else(|| "unknown".to_string());

    println!("Framework: {}", framework);
    println!("Cli: {}", CLI_VERSION);
    Ok(())
}
