//! Bagged top-scoring-pair attribute ranking.
//!
//! Many small subsets of attributes are scored pair by pair on a fixed
//! instance sample, and the per-run orderings are merged into one ranking
//! with a logarithmic position weight.
pub mod bagging;
pub mod estimator;
pub mod evaluator;
pub mod types;

pub use bagging::{BaggingRanker, RankingOutcome, RunSummary};
pub use estimator::{PairEstimator, SoftRatioEstimator, ThresholdEstimator};
pub use evaluator::{SubsetEvaluation, SubsetEvaluator, TspSubsetEval};
pub use types::{AttributeRank, AttributeSubset, ScoredPair};

use crate::config::RankingConfig;
use crate::data_handling::Dataset;
use crate::error::Result;
use crate::sampling::rng_from_seed;

/// Run a full ranking session: build the evaluator, then bag and aggregate.
///
/// All random draws come from one generator seeded with `config.seed`, so a
/// fixed seed reproduces the ranking exactly.
pub fn rank_attributes(dataset: &Dataset, config: &RankingConfig) -> Result<RankingOutcome> {
    let mut rng = rng_from_seed(config.seed);
    let evaluator = TspSubsetEval::build(dataset, config, &mut rng)?;
    BaggingRanker::new(config, &mut rng).rank_detailed(evaluator.data(), &evaluator)
}
