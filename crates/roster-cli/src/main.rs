//! `roster` command-line tool
//!
//! Resolves engineer names and migrates legacy planning snapshots.

mod commands;
mod logging;
mod snapshot;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn data_arg() -> Arg {
    Arg::new("data")
        .long("data")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON snapshot with engineers and planningRecords")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML migration config")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn cli() -> Command {
    Command::new("roster")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Engineer identity resolution and legacy planning migration")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format (level from RUST_LOG)"),
        )
        .subcommand(
            Command::new("migrate")
                .about("Link legacy planning records to engineers")
                .arg(data_arg())
                .arg(config_arg())
                .arg(json_arg())
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Do not write the snapshot back"),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print canonical keys for names")
                .arg(json_arg())
                .arg(
                    Arg::new("names")
                        .required(true)
                        .num_args(1..)
                        .help("Names to normalize"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve names to engineers")
                .arg(data_arg())
                .arg(config_arg())
                .arg(json_arg())
                .arg(
                    Arg::new("names")
                        .required(true)
                        .num_args(1..)
                        .help("Names to resolve"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Suggest engineers whose name contains the query")
                .arg(data_arg())
                .arg(Arg::new("query").required(true).help("Search text")),
        )
}

fn strings(args: &clap::ArgMatches, id: &str) -> Vec<String> {
    args.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let log_format = matches
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    logging::init(log_format)?;

    match matches.subcommand() {
        Some(("migrate", args)) => {
            let data = args.get_one::<PathBuf>("data").context("--data is required")?;
            let config = args.get_one::<PathBuf>("config");

            let success = commands::migrate(
                data,
                config.map(PathBuf::as_path),
                args.get_flag("json"),
                args.get_flag("dry-run"),
            )
            .await?;

            std::process::exit(if success { 0 } else { 1 });
        }
        Some(("normalize", args)) => {
            commands::normalize_names(&strings(args, "names"), args.get_flag("json"))?;
        }
        Some(("resolve", args)) => {
            let data = args.get_one::<PathBuf>("data").context("--data is required")?;
            let config = args.get_one::<PathBuf>("config");

            commands::resolve(
                data,
                config.map(PathBuf::as_path),
                &strings(args, "names"),
                args.get_flag("json"),
            )
            .await?;
        }
        Some(("search", args)) => {
            let data = args.get_one::<PathBuf>("data").context("--data is required")?;
            let query = args.get_one::<String>("query").context("query is required")?;

            commands::search_names(data, query).await?;
        }
        _ => {
            cli().print_help()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn log_format_is_global() {
        let matches = cli()
            .try_get_matches_from(["roster", "normalize", "Jan", "--log-format", "json"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("log-format").map(String::as_str),
            Some("json")
        );
    }

    #[test]
    fn migrate_requires_data() {
        assert!(cli().try_get_matches_from(["roster", "migrate"]).is_err());
    }
}
