use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::run_steps;
use crate::code_generation::language::go::toolchain::Step;

pub fn spec() -> Command {
    Command::new("makesure")
        .visible_alias("mks")
        .about("Install or update the protoc plugins bima applications need")
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    run_steps(matches, &[Step::Clean, Step::InstallPlugins])?;
    println!("Toolchain installed");
    Ok(())
}
