//! The `rank` command: load a dataset, run a ranking session, write the result.
pub mod input;
pub mod output;

use anyhow::Result;
use std::path::Path;

use tsp_ranking::feature_selection::tsp::{rank_attributes, RankingOutcome};
use tsp_ranking::io::read_dataset_with_config;
use tsp_ranking::Dataset;

use input::RankCommandConfig;
use output::write_ranking;

/// Run a ranking session as described by `config`.
pub fn run_ranking(config: &RankCommandConfig) -> Result<(Dataset, RankingOutcome)> {
    let dataset = read_dataset_with_config(&config.data_file, &config.reader_config())?;
    if config.ranking.debug {
        dataset.log_summary();
    }

    let outcome = rank_attributes(&dataset, &config.ranking)?;
    let fallback_runs = outcome.runs.iter().filter(|run| run.used_fallback).count();
    log::info!(
        "[TSP::Rank] {} runs completed ({} with fallback scoring)",
        outcome.runs.len(),
        fallback_runs
    );

    Ok((dataset, outcome))
}

/// Run the ranking and write its output.
pub fn run_and_write(config: &RankCommandConfig) -> Result<()> {
    let (dataset, outcome) = run_ranking(config)?;
    write_ranking(
        &outcome,
        &dataset,
        config.output_file.as_deref().map(Path::new),
    )
}
