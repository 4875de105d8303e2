use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches};

use crate::code_generation::language::go::toolchain::{GoToolchain, Step};
use crate::shared::error::BimaError;
use crate::shared::shell::SystemShell;

/// Application directory: `--workdir`, `BIMA_WORKDIR`, or the current directory.
pub fn workdir(matches: &ArgMatches) -> Result<PathBuf> {
    match matches.try_get_one::<PathBuf>("workdir").ok().flatten() {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("Failed to resolve the current directory"),
    }
}

/// Trimmed value of a positional argument, empty when absent.
pub fn text_arg(matches: &ArgMatches, id: &str) -> String {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

pub fn name_arg(help: &'static str) -> Arg {
    Arg::new("name").help(help).value_name("NAME").required(false)
}

pub fn dry_run_arg() -> Arg {
    Arg::new("dry-run")
        .long("dry-run")
        .help("Show the changes without writing anything")
        .action(ArgAction::SetTrue)
}

pub fn skip_toolchain_arg() -> Arg {
    Arg::new("skip-toolchain")
        .long("skip-toolchain")
        .help("Do not run go/protoc steps before and after the change")
        .action(ArgAction::SetTrue)
}

/// Print graceful errors (bad input, empty module, cancelled prompt) and
/// turn them into `None`; everything else stays an error.
pub fn graceful<T>(result: Result<T, BimaError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_graceful() => {
            println!("{}", err);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Run toolchain steps inside the application directory.
pub fn run_steps(matches: &ArgMatches, steps: &[Step]) -> Result<()> {
    let dir = workdir(matches)?;
    GoToolchain::new(&SystemShell, &dir).run_steps(steps)?;
    Ok(())
}
