pub mod command;

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// Version reported by `bima version` and compared by `bima upgrade`.
pub const CLI_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// The full command tree, shared by `main` and shell completion.
pub fn build_cli() -> Command {
    let version = env!("CARGO_PKG_VERSION");

    Command::new("bima")
        .about(format!("Bima v{} - Bima Framework Toolkit", version))
        .long_about(
            "Bima creates applications from the bima skeleton, generates modules \
            (proto schema, model, provider wiring, Swagger entry) and removes them again, \
            and wraps the Go toolchain steps a bima application needs.",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("workdir")
                .long("workdir")
                .help("Application directory (defaults to the current directory)")
                .env("BIMA_WORKDIR")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v, -vv, -vvv)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(command::create::spec())
        .subcommand(command::module::spec())
        .subcommand(command::dump::spec())
        .subcommand(command::build::spec())
        .subcommand(command::update::spec())
        .subcommand(command::clean::spec())
        .subcommand(command::generate::spec())
        .subcommand(command::run::spec())
        .subcommand(command::debug::spec())
        .subcommand(command::version::spec())
        .subcommand(command::upgrade::spec())
        .subcommand(command::makesure::spec())
        .subcommand(command::completion::spec())
        .version(version)
}
