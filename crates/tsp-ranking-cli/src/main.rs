use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use tsp_ranking_cli::rank::input::RankCommandConfig;
use tsp_ranking_cli::rank::run_and_write;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default()
                .filter_or("TSP_RANK_LOG", "error,tsp_ranking=info,tsp_ranking_cli=info"),
        )
        .init();

    let matches = Command::new("tsp-rank")
        .version(clap::crate_version!())
        .about("Bagged top-scoring-pair feature ranking for two-class datasets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("rank")
                .about("Rank the attributes of a CSV/TSV dataset")
                .arg(
                    Arg::new("data")
                        .help("Path to the dataset (*.csv, *.tsv or *.tab). Overrides the config file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON ranking configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write the ranking (*.csv or *.tsv). Defaults to stdout.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("class_column")
                        .long("class-column")
                        .help("Name of the class column. Defaults to the last column.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("runs")
                        .short('r')
                        .long("runs")
                        .help("Number of bagging runs")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("objects_pct")
                        .long("objects-pct")
                        .help("Percentage of instances sampled for scoring")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("top_pairs")
                        .long("top-pairs")
                        .help("Pairs kept per run")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("top_attributes")
                        .short('n')
                        .long("top-attributes")
                        .help("Number of ranked attributes to output")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Random seed for reproducible rankings")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("pair_enumeration")
                        .long("pair-enumeration")
                        .help("Score unordered (i < j) or ordered (i != j) attribute pairs")
                        .value_parser(["unordered", "ordered"]),
                )
                .arg(
                    Arg::new("exhaustion")
                        .long("exhaustion")
                        .help("What to do when unused attributes run out before all runs are drawn")
                        .value_parser(["stop-early", "shrink-last", "abort"]),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Suppress progress diagnostics")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("default-config")
                .about("Print the default JSON ranking configuration"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("rank", rank_matches)) => handle_rank(rank_matches),
        Some(("default-config", _)) => {
            println!("{}", serde_json::to_string_pretty(&RankCommandConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_rank(matches: &ArgMatches) -> Result<()> {
    let config_path = matches.get_one::<PathBuf>("config");
    match config_path {
        Some(path) => log::info!("[TSP::Rank] Using config: {:?}", path),
        None => log::info!("[TSP::Rank] No config provided; using defaults."),
    }

    let config = RankCommandConfig::from_arguments(config_path, matches)?;
    log::info!("[TSP::Rank] Ranking attributes of {}", config.data_file);

    match run_and_write(&config) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Ranking failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
