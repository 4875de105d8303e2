use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use crate::cli::command::shared::{run_steps, text_arg};
use crate::code_generation::language::go::toolchain::Step;

const DEBUG_BINARY: &str = "bima";

pub fn spec() -> Command {
    Command::new("run")
        .visible_alias("rn")
        .about("Run the application")
        .long_about(
            "Run the application with `go run`.\n\
            \n\
            `bima run debug` compiles without optimisations first and runs the binary, \
            so a debugger can be attached with `bima debug <pid>`.",
        )
        .arg(
            Arg::new("mode")
                .help("`debug` to build a debuggable binary first")
                .value_parser(["debug"]),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Application config file")
                .value_name("FILE")
                .default_value(".env"),
        )
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let config = text_arg(matches, "file");

    if text_arg(matches, "mode") == "debug" {
        return run_steps(
            matches,
            &[
                Step::Build {
                    output: DEBUG_BINARY.to_string(),
                    debug: true,
                },
                Step::Execute {
                    binary: DEBUG_BINARY.to_string(),
                    config,
                },
            ],
        );
    }

    run_steps(matches, &[Step::Run { config }])
}
