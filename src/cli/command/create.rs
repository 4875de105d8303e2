use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::cli::command::shared::{graceful, name_arg, skip_toolchain_arg, text_arg, workdir};
use crate::code_generation::core::naming::to_title_case;
use crate::code_generation::language::go::scaffold_generator::{ComponentKind, ScaffoldGenerator};
use crate::code_generation::language::go::toolchain::{GoToolchain, Step};
use crate::shared::shell::SystemShell;

fn component_spec(name: &'static str, alias: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .visible_alias(alias)
        .about(about)
        .arg(name_arg("Type name of the component"))
        .arg(skip_toolchain_arg())
}

pub fn spec() -> Command {
    Command::new("create")
        .visible_alias("new")
        .about("Create an application or a component inside one")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("app")
                .visible_alias("project")
                .about("Create a new application from the bima skeleton")
                .arg(name_arg("Application directory name"))
                .arg(skip_toolchain_arg()),
        )
        .subcommand(component_spec("middleware", "mid", "Create middlewares/<name>.go"))
        .subcommand(component_spec("driver", "drv", "Create drivers/<name>.go"))
        .subcommand(component_spec("adapter", "adp", "Create adapters/<name>.go"))
        .subcommand(component_spec("route", "rt", "Create routes/<name>.go"))
}

pub fn action(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("app", sub_matches)) => create_app(sub_matches),
        Some(("middleware", sub_matches)) => create_component(sub_matches, ComponentKind::Middleware),
        Some(("driver", sub_matches)) => create_component(sub_matches, ComponentKind::Driver),
        Some(("adapter", sub_matches)) => create_component(sub_matches, ComponentKind::Adapter),
        Some(("route", sub_matches)) => create_component(sub_matches, ComponentKind::Route),
        _ => unreachable!(),
    }
}

fn create_app(matches: &ArgMatches) -> Result<()> {
    let name = text_arg(matches, "name");
    if name.is_empty() {
        println!("Usage: bima create app <name>");
        return Ok(());
    }

    let dir = workdir(matches)?;
    let generator = ScaffoldGenerator::new(&SystemShell, &dir);
    let app_dir = match graceful(generator.create_app(&name, chrono::Utc::now()))? {
        Some(app_dir) => app_dir,
        None => return Ok(()),
    };

    if !matches.get_flag("skip-toolchain") {
        GoToolchain::new(&SystemShell, &app_dir).run_steps(&[
            Step::Fetch,
            Step::Dump,
            Step::Update,
        ])?;
    }

    println!("{} application created", to_title_case(&name));
    println!("Move to {} folder and type bima run", name);
    Ok(())
}

fn create_component(matches: &ArgMatches, kind: ComponentKind) -> Result<()> {
    let name = text_arg(matches, "name");
    if name.is_empty() {
        println!("Usage: bima create {} <name>", kind.label().to_lowercase());
        return Ok(());
    }

    let dir = workdir(matches)?;
    let generator = ScaffoldGenerator::new(&SystemShell, &dir);
    if graceful(generator.create_component(kind, &name))?.is_none() {
        return Ok(());
    }

    if !matches.get_flag("skip-toolchain") {
        GoToolchain::new(&SystemShell, &dir).run_steps(&[Step::Clean])?;
    }

    println!("{} {} created", kind.label(), to_title_case(&name));
    Ok(())
}
