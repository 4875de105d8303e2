use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::{name_arg, run_steps, text_arg};
use crate::code_generation::language::go::toolchain::Step;

pub fn spec() -> Command {
    Command::new("build")
        .visible_aliases(["install", "compile"])
        .about("Tidy dependencies, regenerate the container and compile the application")
        .arg(name_arg("Output binary name"))
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let name = text_arg(matches, "name");
    if name.is_empty() {
        println!("Usage: bima build <name>");
        return Ok(());
    }

    run_steps(
        matches,
        &[
            Step::Clean,
            Step::Dump,
            Step::Build {
                output: name,
                debug: false,
            },
        ],
    )
}
