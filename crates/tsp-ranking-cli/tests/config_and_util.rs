//! Integration tests for rank command config parsing and util helpers.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use tsp_ranking::config::{ExhaustionPolicy, PairEnumeration};
use tsp_ranking::io::delimiter_for_path;
use tsp_ranking_cli::rank::input::RankCommandConfig;
use tsp_ranking_cli::util::validate_data_file;

/// Mirror of the `rank` subcommand arguments read by `RankCommandConfig`.
fn rank_command() -> Command {
    Command::new("rank")
        .arg(Arg::new("data"))
        .arg(Arg::new("config").long("config").value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("output_file").long("output"))
        .arg(Arg::new("class_column").long("class-column"))
        .arg(Arg::new("runs").long("runs").value_parser(clap::value_parser!(usize)))
        .arg(Arg::new("objects_pct").long("objects-pct").value_parser(clap::value_parser!(f64)))
        .arg(Arg::new("top_pairs").long("top-pairs").value_parser(clap::value_parser!(usize)))
        .arg(
            Arg::new("top_attributes")
                .long("top-attributes")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(Arg::new("seed").long("seed").value_parser(clap::value_parser!(u64)))
        .arg(Arg::new("pair_enumeration").long("pair-enumeration"))
        .arg(Arg::new("exhaustion").long("exhaustion"))
        .arg(Arg::new("quiet").long("quiet").action(ArgAction::SetTrue))
}

fn data_file(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "a,b,class\n1,2,x\n2,1,y\n").unwrap();
    path.to_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// validate_data_file / delimiter_for_path
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);
    assert!(validate_data_file(&path).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_data_file(path.to_str().unwrap()).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_data_file("/nonexistent/path/data.tsv").is_err());
}

#[test]
fn delimiter_follows_extension() {
    assert_eq!(delimiter_for_path(&PathBuf::from("out.tsv")), Some(b'\t'));
    assert_eq!(delimiter_for_path(&PathBuf::from("out.CSV")), Some(b','));
    assert_eq!(delimiter_for_path(&PathBuf::from("out.json")), None);
}

#[test]
fn validate_accepts_tab_files_the_reader_accepts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tab");
    std::fs::write(&path, "a\tb\tclass\n1\t2\tx\n2\t1\ty\n").unwrap();
    assert!(validate_data_file(path.to_str().unwrap()).is_ok());
    assert_eq!(delimiter_for_path(&path), Some(b'\t'));

    let dataset = tsp_ranking::io::read_dataset(&path).unwrap();
    assert_eq!(dataset.num_attributes(), 3);
    assert_eq!(dataset.num_instances(), 2);
}

// ---------------------------------------------------------------------------
// RankCommandConfig
// ---------------------------------------------------------------------------

#[test]
fn default_config_values() {
    let cfg = RankCommandConfig::default();
    assert!(cfg.data_file.is_empty());
    assert!(cfg.output_file.is_none());
    assert_eq!(cfg.ranking.run_count, 100);
    assert_eq!(cfg.ranking.top_attributes_out, 100);
}

#[test]
fn config_round_trips_json() {
    let cfg = RankCommandConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let cfg2: RankCommandConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg.ranking, cfg2.ranking);
    assert_eq!(cfg.version, cfg2.version);
}

#[test]
fn command_line_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let data = data_file(&dir);
    let matches = rank_command().get_matches_from([
        "rank",
        data.as_str(),
        "--runs",
        "7",
        "--objects-pct",
        "50",
        "--seed",
        "3",
        "--pair-enumeration",
        "ordered",
        "--exhaustion",
        "abort",
        "--quiet",
    ]);

    let cfg = RankCommandConfig::from_arguments(None, &matches).unwrap();
    assert_eq!(cfg.data_file, data);
    assert_eq!(cfg.ranking.run_count, 7);
    assert_eq!(cfg.ranking.objects_in_run_pct, 50.0);
    assert_eq!(cfg.ranking.seed, Some(3));
    assert_eq!(cfg.ranking.pair_enumeration, PairEnumeration::Ordered);
    assert_eq!(cfg.ranking.exhaustion_policy, ExhaustionPolicy::Abort);
    assert!(!cfg.ranking.debug);
    assert_eq!(cfg.ranking.top_pairs_per_run, 100);
}

#[test]
fn json_config_is_loaded_and_partially_defaulted() {
    let dir = tempfile::tempdir().unwrap();
    let data = data_file(&dir);
    let config_path = dir.path().join("rank.json");
    let json = serde_json::json!({
        "data_file": data,
        "class_column": "class",
        "ranking": { "run_count": 12, "top_attributes_out": 5 },
        "output_file": 42
    });
    std::fs::write(&config_path, json.to_string()).unwrap();

    let matches = rank_command().get_matches_from(["rank", "--runs", "4"]);
    let cfg = RankCommandConfig::from_arguments(Some(&config_path), &matches).unwrap();

    assert_eq!(cfg.data_file, data);
    assert_eq!(cfg.class_column.as_deref(), Some("class"));
    // invalid value falls back to the default
    assert!(cfg.output_file.is_none());
    // command line wins over the file
    assert_eq!(cfg.ranking.run_count, 4);
    assert_eq!(cfg.ranking.top_attributes_out, 5);
    assert_eq!(cfg.ranking.objects_in_run_pct, 66.0);
}

#[test]
fn missing_data_file_is_rejected() {
    let matches = rank_command().get_matches_from(["rank"]);
    assert!(RankCommandConfig::from_arguments(None, &matches).is_err());
}

#[test]
fn invalid_ranking_field_keeps_the_valid_ones() {
    let dir = tempfile::tempdir().unwrap();
    let data = data_file(&dir);
    let config_path = dir.path().join("rank.json");
    let json = serde_json::json!({
        "data_file": data,
        "ranking": {
            "run_count": 5,
            "seed": 9,
            "top_pairs_per_run": -1,
            "exhaustion_policy": "shrink-last"
        }
    });
    std::fs::write(&config_path, json.to_string()).unwrap();

    let matches = rank_command().get_matches_from(["rank"]);
    let cfg = RankCommandConfig::from_arguments(Some(&config_path), &matches).unwrap();

    assert_eq!(cfg.ranking.run_count, 5);
    assert_eq!(cfg.ranking.seed, Some(9));
    assert_eq!(cfg.ranking.exhaustion_policy, ExhaustionPolicy::ShrinkLast);
    assert_eq!(cfg.ranking.top_pairs_per_run, 100);
}

#[test]
fn printed_default_config_loads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let data = data_file(&dir);
    let config_path = dir.path().join("rank.json");
    let mut cfg = RankCommandConfig::default();
    cfg.data_file = data;
    cfg.ranking.exhaustion_policy = ExhaustionPolicy::Abort;
    std::fs::write(&config_path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

    let matches = rank_command().get_matches_from(["rank"]);
    let loaded = RankCommandConfig::from_arguments(Some(&config_path), &matches).unwrap();
    assert_eq!(loaded.ranking, cfg.ranking);
    assert_eq!(loaded.data_file, cfg.data_file);
}
