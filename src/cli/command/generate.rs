use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::run_steps;
use crate::code_generation::language::go::toolchain::Step;

pub fn spec() -> Command {
    Command::new("generate")
        .visible_aliases(["gen", "genproto"])
        .about("Generate Go code from the proto files")
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    run_steps(matches, &[Step::GenProto, Step::Clean, Step::Dump])
}
