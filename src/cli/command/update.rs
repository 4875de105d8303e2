use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::run_steps;
use crate::code_generation::language::go::toolchain::Step;

pub fn spec() -> Command {
    Command::new("update")
        .visible_alias("upd")
        .about("Update Go dependencies")
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    run_steps(matches, &[Step::Update, Step::Dump])
}
