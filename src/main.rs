use bima::cli::{build_cli, command};
use bima::shared::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"), matches.get_flag("quiet"))?;

    match matches.subcommand() {
        Some(("create", sub_matches)) => command::create::action(sub_matches),
        Some(("module", sub_matches)) => command::module::action(sub_matches),
        Some(("dump", sub_matches)) => command::dump::action(sub_matches),
        Some(("build", sub_matches)) => command::build::action(sub_matches),
        Some(("update", sub_matches)) => command::update::action(sub_matches),
        Some(("clean", sub_matches)) => command::clean::action(sub_matches),
        Some(("generate", sub_matches)) => command::generate::action(sub_matches),
        Some(("run", sub_matches)) => command::run::action(sub_matches),
        Some(("debug", sub_matches)) => command::debug::action(sub_matches),
        Some(("version", sub_matches)) => command::version::action(sub_matches),
        Some(("upgrade", sub_matches)) => command::upgrade::action(sub_matches),
        Some(("makesure", sub_matches)) => command::makesure::action(sub_matches),
        Some(("completion", sub_matches)) => command::completion::action(sub_matches),
        _ => unreachable!(),
    }
}
