use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

use crate::cli::command::shared::{
    dry_run_arg, graceful, name_arg, skip_toolchain_arg, text_arg, workdir,
};
use crate::code_generation::language::go::toolchain::{GoToolchain, Step};
use crate::project_management::config::loader::{load_or_default, FileConfigLoader};
use crate::project_management::config::workspace::Workspace;
use crate::project_management::module::registration::{RegistrationEngine, RegistrationOutcome};
use crate::project_management::module::unregistration::{RemovalOutcome, UnregistrationEngine};
use crate::shared::prompter::InquirePrompter;
use crate::shared::shell::SystemShell;
use crate::shared::utils::diff::show_diff;

pub fn spec() -> Command {
    Command::new("module")
        .visible_alias("mod")
        .about("Add or remove application modules")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("add")
                .visible_alias("new")
                .about("Generate a module and register it")
                .long_about(
                    "Interactively collect the module columns, then write:\n\
                    • protos/<name>.proto\n\
                    • <plural>/model.go and <plural>/module.go\n\
                    • the module entry in configs/modules.yaml and configs/provider.go\n\
                    • the Swagger entry in swaggers/modules.json\n\
                    \n\
                    Afterwards the proto bindings and the DI container are regenerated.",
                )
                .arg(name_arg("Module name, e.g. order"))
                .arg(
                    Arg::new("api-version")
                        .help("API version used in the generated routes (default v1)")
                        .value_name("VERSION"),
                )
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .help("Application config file providing the database driver")
                        .value_name("FILE")
                        .default_value(".env")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(dry_run_arg())
                .arg(skip_toolchain_arg()),
        )
        .subcommand(
            Command::new("remove")
                .visible_aliases(["rm", "rem"])
                .about("Remove a module and every file generated for it")
                .arg(name_arg("Module name, e.g. order"))
                .arg(dry_run_arg())
                .arg(skip_toolchain_arg()),
        )
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("add", sub_matches)) => add(sub_matches),
        Some(("remove", sub_matches)) => remove(sub_matches),
        _ => unreachable!(),
    }
}

fn uses_toolchain(matches: &ArgMatches) -> bool {
    !matches.get_flag("dry-run") && !matches.get_flag("skip-toolchain")
}

fn add(matches: &ArgMatches) -> Result<()> {
    let name = text_arg(matches, "name");
    if name.is_empty() {
        println!("Usage: bima module add <name>");
        return Ok(());
    }

    let dir = workdir(matches)?;
    let toolchain = GoToolchain::new(&SystemShell, &dir);
    let with_toolchain = uses_toolchain(matches);
    if with_toolchain {
        toolchain.run_steps(&[Step::Dump])?;
    }

    let workspace = Workspace::open(&dir).context("Failed to open the bima application")?;
    let config_file = matches
        .get_one::<PathBuf>("file")
        .map(|file| dir.join(file))
        .unwrap_or_else(|| dir.join(".env"));
    let env = load_or_default(&FileConfigLoader, &config_file)
        .with_context(|| format!("Failed to load {}", config_file.display()))?;

    let api_version = matches.get_one::<String>("api-version").map(String::as_str);
    let prompter = InquirePrompter;
    let engine = RegistrationEngine::new(&workspace, &prompter, env.driver());

    println!("Welcome to Bima Skeleton Module Generator");
    let outcome = match graceful(engine.add(&name, api_version, matches.get_flag("dry-run")))? {
        Some(outcome) => outcome,
        None => return Ok(()),
    };

    match outcome {
        RegistrationOutcome::Registered { location, .. } => {
            println!("Module {} registered in {}", name, location.display());
        }
        RegistrationOutcome::AlreadyRegistered { key } => {
            println!("Module {} is already registered", key);
            return Ok(());
        }
        RegistrationOutcome::DryRun { diff, .. } => {
            show_diff(&diff);
            return Ok(());
        }
    }

    if with_toolchain {
        toolchain.run_steps(&[Step::GenProto, Step::Clean, Step::Dump, Step::Clean])?;
    }
    Ok(())
}

fn remove(matches: &ArgMatches) -> Result<()> {
    let name = text_arg(matches, "name");
    if name.is_empty() {
        println!("Usage: bima module remove <name>");
        return Ok(());
    }

    let dir = workdir(matches)?;
    let toolchain = GoToolchain::new(&SystemShell, &dir);
    let with_toolchain = uses_toolchain(matches);
    if with_toolchain {
        toolchain.run_steps(&[Step::Dump])?;
    }

    let workspace = Workspace::open(&dir).context("Failed to open the bima application")?;
    let engine = UnregistrationEngine::new(&workspace);
    let outcome = match graceful(engine.remove(&name, matches.get_flag("dry-run")))? {
        Some(outcome) => outcome,
        None => return Ok(()),
    };

    match outcome {
        RemovalOutcome::NotRegistered { .. } => {
            println!("Module is not registered");
            return Ok(());
        }
        RemovalOutcome::Removed { leftovers, .. } => {
            for path in &leftovers {
                println!("  ⚠ Could not delete {}", workspace.relative(path).display());
            }
            println!("Module {} deleted", name);
        }
        RemovalOutcome::DryRun { diff, .. } => {
            show_diff(&diff);
            return Ok(());
        }
    }

    if with_toolchain {
        toolchain.run_steps(&[Step::Dump, Step::Clean])?;
    }
    Ok(())
}
