//! Bagging driver and rank aggregation.
//!
//! Each run draws a fresh subset of `floor(sqrt(num_attributes))` attributes
//! that no earlier run of the session used, evaluates its pairs and keeps the
//! best `top_pairs_per_run`. A pair at 1-based position `p` of its run adds
//!
//! weight(p) = ln(p) / ln(0.3) + | ln(top_attributes_out + 1) / ln(0.3) |
//!
//! to the rank of both of its attributes. Attributes no kept pair touches
//! keep a rank of negative infinity and sort last.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ExhaustionPolicy, RankingConfig};
use crate::data_handling::Dataset;
use crate::error::{RankingError, Result};
use crate::feature_selection::tsp::evaluator::SubsetEvaluator;
use crate::feature_selection::tsp::types::{AttributeRank, AttributeSubset, ScoredPair};
use crate::sampling::AttributePool;

/// Base of the positional decay.
const DECAY_BASE: f64 = 0.3;

/// Attributes drawn per run for a dataset with `num_attributes` columns.
pub fn subset_size(num_attributes: usize) -> usize {
    (num_attributes as f64).sqrt().floor() as usize
}

fn decay(position: usize) -> f64 {
    (position as f64).ln() / DECAY_BASE.ln()
}

/// Weight added for a pair at 1-based `position` within its run.
///
/// Strictly decreasing in `position`, and positive up to
/// `top_attributes_out`.
pub fn position_weight(position: usize, top_attributes_out: usize) -> f64 {
    decay(position) + decay(top_attributes_out + 1).abs()
}

/// Sum position weights of all kept pairs into one rank per attribute.
///
/// Returns one entry per attribute index in `0..num_attributes`, in index order.
pub fn aggregate_runs(
    runs: &[Vec<ScoredPair>],
    num_attributes: usize,
    top_attributes_out: usize,
) -> Vec<AttributeRank> {
    let mut ranks: Vec<AttributeRank> = (0..num_attributes).map(AttributeRank::new).collect();

    for run in runs {
        for (pos, pair) in run.iter().enumerate() {
            let weight = position_weight(pos + 1, top_attributes_out);
            ranks[pair.i].add_ranking(weight, pair.score);
            ranks[pair.j].add_ranking(weight, pair.score);
        }
    }

    ranks
}

/// Summary of one bagging run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub subset: Vec<usize>,
    pub kept_pairs: Vec<ScoredPair>,
    pub used_fallback: bool,
}

/// Outcome of a ranking session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Ranked attributes, best first, `top_attributes_out` long (clamped to
    /// the number of non-class attributes).
    pub ranking: Vec<AttributeRank>,
    pub runs: Vec<RunSummary>,
}

impl RankingOutcome {
    /// Attribute indices of the ranking, best first.
    pub fn attributes(&self) -> Vec<usize> {
        self.ranking.iter().map(|rank| rank.attribute).collect()
    }
}

/// Runs the bagging loop over an evaluator and aggregates the results.
pub struct BaggingRanker<'a, R: Rng + ?Sized> {
    config: &'a RankingConfig,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> BaggingRanker<'a, R> {
    pub fn new(config: &'a RankingConfig, rng: &'a mut R) -> Self {
        BaggingRanker { config, rng }
    }

    /// Rank the attributes of `dataset`, returning the best
    /// `top_attributes_out` indices.
    pub fn rank<E: SubsetEvaluator + ?Sized>(
        &mut self,
        dataset: &Dataset,
        evaluator: &E,
    ) -> Result<Vec<usize>> {
        Ok(self.rank_detailed(dataset, evaluator)?.attributes())
    }

    /// Like [`BaggingRanker::rank`], keeping the accumulated ranks and the
    /// per-run summaries.
    pub fn rank_detailed<E: SubsetEvaluator + ?Sized>(
        &mut self,
        dataset: &Dataset,
        evaluator: &E,
    ) -> Result<RankingOutcome> {
        let num_attributes = dataset.num_attributes();
        let class_index = dataset.class_index();
        let size = subset_size(num_attributes);
        let mut pool = AttributePool::new(num_attributes, class_index);
        let mut runs: Vec<RunSummary> = Vec::with_capacity(self.config.run_count);

        if self.config.debug {
            log::info!(
                "Bagging {} runs of {} attributes with the {} evaluator",
                self.config.run_count,
                size,
                evaluator.name()
            );
        }

        for run in 0..self.config.run_count {
            if self.config.debug {
                log::info!("Iteration no. {}", run + 1);
            }

            let (attributes, last_run) = match pool.draw(size, &mut *self.rng) {
                Some(attributes) => (attributes, false),
                None => {
                    let remaining = pool.remaining();
                    match self.config.exhaustion_policy {
                        ExhaustionPolicy::Abort => {
                            return Err(RankingError::InsufficientAttributes {
                                run: run + 1,
                                remaining,
                                required: size,
                            })
                        }
                        ExhaustionPolicy::ShrinkLast if remaining >= 2 => {
                            log::warn!(
                                "Only {} unused attributes left; running a final smaller subset",
                                remaining
                            );
                            match pool.draw(remaining, &mut *self.rng) {
                                Some(attributes) => (attributes, true),
                                None => break,
                            }
                        }
                        _ => {
                            log::warn!(
                                "Attribute pool exhausted after {} of {} runs ({} left, {} needed)",
                                run,
                                self.config.run_count,
                                remaining,
                                size
                            );
                            break;
                        }
                    }
                }
            };

            let subset = AttributeSubset::new(attributes);
            let evaluation = evaluator.evaluate_subset(&subset);
            let kept_pairs: Vec<ScoredPair> = evaluation
                .pairs
                .into_iter()
                .take(self.config.top_pairs_per_run)
                .collect();

            log::debug!(
                "Run {}: subset {:?}, kept {} pairs{}",
                run + 1,
                subset.attributes(),
                kept_pairs.len(),
                if evaluation.used_fallback { " (fallback estimator)" } else { "" }
            );
            if let Some(best) = kept_pairs.first() {
                log::trace!("Run {} best pair: {}", run + 1, best);
            }

            runs.push(RunSummary {
                subset: subset.attributes().to_vec(),
                kept_pairs,
                used_fallback: evaluation.used_fallback,
            });

            if last_run {
                break;
            }
        }

        let kept: Vec<Vec<ScoredPair>> = runs.iter().map(|run| run.kept_pairs.clone()).collect();
        let ranking = finalize_ranking(
            aggregate_runs(&kept, num_attributes, self.config.top_attributes_out),
            class_index,
            self.config.top_attributes_out,
        );

        if self.config.debug {
            log::info!(
                "Ranked {} attributes from {} runs",
                ranking.len(),
                runs.len()
            );
        }

        Ok(RankingOutcome { ranking, runs })
    }
}

/// Drop the class attribute, sort best first and keep `limit` entries.
fn finalize_ranking(
    mut ranks: Vec<AttributeRank>,
    class_index: usize,
    limit: usize,
) -> Vec<AttributeRank> {
    ranks.retain(|rank| rank.attribute != class_index);
    if limit > ranks.len() {
        log::warn!(
            "Requested {} ranked attributes but only {} are available",
            limit,
            ranks.len()
        );
    }
    ranks.sort_by(|a, b| a.cmp_desc(b));
    ranks.truncate(limit);
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_size_is_floor_sqrt() {
        assert_eq!(subset_size(6), 2);
        assert_eq!(subset_size(9), 3);
        assert_eq!(subset_size(15), 3);
        assert_eq!(subset_size(16), 4);
    }

    #[test]
    fn test_position_weight_strictly_decreases() {
        let top = 10;
        let weights: Vec<f64> = (1..=top).map(|p| position_weight(p, top)).collect();
        for pair in weights.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert!(weights.iter().all(|&w| w > 0.0));
        assert!((weights[0] - decay(top + 1).abs()).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_adds_weight_to_both_attributes() {
        let runs = vec![
            vec![ScoredPair::new(0, 1, 0.9), ScoredPair::new(0, 2, 0.4)],
            vec![ScoredPair::new(3, 4, 0.7)],
        ];
        let ranks = aggregate_runs(&runs, 6, 5);
        let w1 = position_weight(1, 5);
        let w2 = position_weight(2, 5);

        assert!((ranks[0].rank - (w1 + w2)).abs() < 1e-12);
        assert!((ranks[1].rank - w1).abs() < 1e-12);
        assert!((ranks[2].rank - w2).abs() < 1e-12);
        assert!((ranks[3].rank - w1).abs() < 1e-12);
        assert_eq!(ranks[5].rank, f64::NEG_INFINITY);
    }

    #[test]
    fn test_finalize_excludes_class_and_pads_with_untouched() {
        let runs = vec![vec![ScoredPair::new(1, 3, 0.9)]];
        let ranks = aggregate_runs(&runs, 5, 4);
        let ranking = finalize_ranking(ranks, 4, 4);
        let order: Vec<usize> = ranking.iter().map(|r| r.attribute).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert!(!ranking[2].is_ranked());
    }
}
