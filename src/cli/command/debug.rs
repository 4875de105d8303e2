use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use crate::cli::command::shared::{run_steps, text_arg};
use crate::code_generation::language::go::toolchain::Step;

pub fn spec() -> Command {
    Command::new("debug")
        .visible_alias("dbg")
        .about("Attach a headless delve debugger to a running application")
        .arg(Arg::new("pid").help("Process id of the application").value_name("PID"))
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    let argument = text_arg(matches, "pid");
    if argument.is_empty() {
        println!("Usage: bima debug <pid>");
        return Ok(());
    }

    let Ok(pid) = argument.parse::<u32>() else {
        println!("PID must be a number");
        return Ok(());
    };

    run_steps(matches, &[Step::Attach { pid }])
}
