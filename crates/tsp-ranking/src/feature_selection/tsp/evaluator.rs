use rand::Rng;

use crate::config::{PairEnumeration, RankingConfig};
use crate::data_handling::Dataset;
use crate::error::{RankingError, Result};
use crate::feature_selection::tsp::estimator::{
    average_ratio, score_pair, PairEstimator, SoftRatioEstimator, ThresholdEstimator,
};
use crate::feature_selection::tsp::types::{sort_by_score_desc, AttributeSubset, ScoredPair};
use crate::sampling::InstanceSample;

/// Scores the attribute pairs of a subset. This is the seam the bagging
/// ranker drives.
pub trait SubsetEvaluator {
    /// Pairs of `subset`, sorted best first.
    fn evaluate_subset(&self, subset: &AttributeSubset) -> SubsetEvaluation;

    fn name(&self) -> &str {
        "subset_evaluator"
    }
}

/// Result of evaluating one subset.
#[derive(Debug, Clone)]
pub struct SubsetEvaluation {
    /// Scored pairs, best first, `NaN` scores last.
    pub pairs: Vec<ScoredPair>,
    /// Whether the tie on the top two pairs triggered the fallback estimator.
    pub used_fallback: bool,
}

/// Top-scoring-pair evaluator built over a fixed instance sample.
///
/// The sample is drawn once in [`TspSubsetEval::build`] and shared by every
/// subsequent evaluation.
pub struct TspSubsetEval {
    data: Dataset,
    sample: InstanceSample,
    enumeration: PairEnumeration,
    primary: Box<dyn PairEstimator>,
    fallback: Box<dyn PairEstimator>,
    debug: bool,
}

impl TspSubsetEval {
    /// Filter out instances with a missing class and draw the instance sample.
    ///
    /// # Errors
    ///
    /// `RankingError::InvalidData` when no instance is left after filtering,
    /// when fewer than two classes are present, or when the requested sample
    /// does not fit the data.
    pub fn build<R: Rng + ?Sized>(
        dataset: &Dataset,
        config: &RankingConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if config.debug {
            log::info!("Starting building evaluator");
        }

        let data = dataset.delete_with_missing_class();
        if data.num_instances() == 0 {
            return Err(RankingError::InvalidData(
                "no instances with a known class".to_string(),
            ));
        }
        let counts = data.class_counts();
        if counts.iter().any(|&count| count == 0) {
            return Err(RankingError::InvalidData(format!(
                "two classes required, found class counts {:?}",
                counts
            )));
        }

        let sample = InstanceSample::draw(&data, config.objects_in_run_pct, rng)?;
        log::debug!(
            "Sampled {} of {} instances (class counts {:?})",
            sample.len(),
            data.num_instances(),
            sample.class_counts()
        );

        Ok(TspSubsetEval {
            data,
            sample,
            enumeration: config.pair_enumeration,
            primary: Box::new(ThresholdEstimator),
            fallback: Box::new(SoftRatioEstimator),
            debug: config.debug,
        })
    }

    /// Replace the primary and fallback estimators.
    pub fn with_estimators(
        mut self,
        primary: Box<dyn PairEstimator>,
        fallback: Box<dyn PairEstimator>,
    ) -> Self {
        self.primary = primary;
        self.fallback = fallback;
        self
    }

    pub fn sample(&self) -> &InstanceSample {
        &self.sample
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Candidate pairs of a subset, in enumeration order.
    pub fn candidate_pairs(&self, subset: &AttributeSubset) -> Vec<(usize, usize)> {
        enumerate_pairs(subset, self.enumeration)
    }

    fn score_list(&self, estimator: &dyn PairEstimator, pairs: &[(usize, usize)]) -> Vec<ScoredPair> {
        pairs
            .iter()
            .map(|&(i, j)| {
                let avg_ratio = average_ratio(&self.data, &self.sample, i, j);
                let score = score_pair(estimator, &self.data, &self.sample, i, j, avg_ratio);
                ScoredPair::new(i, j, score)
            })
            .collect()
    }
}

impl SubsetEvaluator for TspSubsetEval {
    fn evaluate_subset(&self, subset: &AttributeSubset) -> SubsetEvaluation {
        if self.debug {
            log::info!("Starting evaluating subset {:?}", subset.attributes());
        }

        let pairs = self.candidate_pairs(subset);
        let mut result = self.score_list(self.primary.as_ref(), &pairs);
        sort_by_score_desc(&mut result);

        let used_fallback = top_two_tied(&result);
        if used_fallback {
            log::debug!(
                "Top pairs tied at {}; rescoring with the {} estimator",
                result[0].score,
                self.fallback.name()
            );
            result = self.score_list(self.fallback.as_ref(), &pairs);
            sort_by_score_desc(&mut result);
        }

        SubsetEvaluation {
            pairs: result,
            used_fallback,
        }
    }

    fn name(&self) -> &str {
        "tsp"
    }
}

/// Attribute pairs of a subset. `Unordered` yields `i < j`, `Ordered` every
/// `i != j`.
pub fn enumerate_pairs(subset: &AttributeSubset, enumeration: PairEnumeration) -> Vec<(usize, usize)> {
    let attrs = subset.attributes();
    let mut pairs = Vec::new();
    for (a, &i) in attrs.iter().enumerate() {
        for (b, &j) in attrs.iter().enumerate() {
            let keep = match enumeration {
                PairEnumeration::Unordered => a < b,
                PairEnumeration::Ordered => a != b,
            };
            if keep {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Whether the two best pairs of a sorted list share the same score.
/// Two `NaN` scores count as tied.
fn top_two_tied(sorted: &[ScoredPair]) -> bool {
    match sorted {
        [first, second, ..] => first.sort_key() == second.sort_key(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::rng_from_seed;
    use ndarray::Array2;

    #[test]
    fn test_enumerate_unordered_pairs() {
        let subset = AttributeSubset::new(vec![5, 1, 3]);
        let pairs = enumerate_pairs(&subset, PairEnumeration::Unordered);
        assert_eq!(pairs, vec![(1, 3), (1, 5), (3, 5)]);
    }

    #[test]
    fn test_enumerate_ordered_pairs_includes_lowest_attribute() {
        let subset = AttributeSubset::new(vec![0, 2, 4]);
        let pairs = enumerate_pairs(&subset, PairEnumeration::Ordered);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&(0, 4)));
        assert!(pairs.contains(&(4, 0)));
        assert!(pairs.iter().all(|(i, j)| i != j));
    }

    #[test]
    fn test_top_two_tied() {
        let tied = [ScoredPair::new(0, 1, 0.5), ScoredPair::new(0, 2, 0.5)];
        let untied = [ScoredPair::new(0, 1, 0.6), ScoredPair::new(0, 2, 0.5)];
        let both_nan = [ScoredPair::new(0, 1, f64::NAN), ScoredPair::new(0, 2, f64::NAN)];
        assert!(top_two_tied(&tied));
        assert!(!top_two_tied(&untied));
        assert!(top_two_tied(&both_nan));
        assert!(!top_two_tied(&tied[..1]));
    }

    #[test]
    fn test_build_requires_two_classes() {
        let values = Array2::from_shape_fn((6, 3), |(row, col)| {
            if col == 2 {
                0.0
            } else {
                (row + 1) as f64
            }
        });
        let data = Dataset::new(values, 2).unwrap();
        let mut rng = rng_from_seed(Some(1));
        let result = TspSubsetEval::build(&data, &RankingConfig::default(), &mut rng);
        assert!(matches!(result, Err(RankingError::InvalidData(_))));
    }

    #[test]
    fn test_build_rejects_data_without_known_classes() {
        let values = Array2::from_elem((4, 3), f64::NAN);
        let data = Dataset::new(values, 2).unwrap();
        let mut rng = rng_from_seed(Some(1));
        assert!(TspSubsetEval::build(&data, &RankingConfig::default(), &mut rng).is_err());
    }

    /// Same indicator for every instance, so every pair scores 0.
    struct ConstantIndicator;

    impl PairEstimator for ConstantIndicator {
        fn indicator(&self, _ratio: Option<f64>, _avg_ratio: f64) -> f64 {
            1.0
        }
    }

    /// 1 when the numerator attribute is the larger one.
    struct RatioAboveOne;

    impl PairEstimator for RatioAboveOne {
        fn indicator(&self, ratio: Option<f64>, _avg_ratio: f64) -> f64 {
            match ratio {
                Some(r) if r > 1.0 => 1.0,
                _ => 0.0,
            }
        }

        fn name(&self) -> &str {
            "ratio_above_one"
        }
    }

    #[test]
    fn test_custom_estimators_drive_the_fallback() {
        let values = ndarray::array![
            [1.0, 2.0, 3.0, 0.0],
            [2.0, 4.0, 3.0, 0.0],
            [4.0, 2.0, 3.0, 1.0],
            [8.0, 4.0, 3.0, 1.0],
        ];
        let data = Dataset::new(values, 3).unwrap();
        let config = RankingConfig {
            objects_in_run_pct: 100.0,
            debug: false,
            ..RankingConfig::default()
        };
        let mut rng = rng_from_seed(Some(1));
        let evaluator = TspSubsetEval::build(&data, &config, &mut rng)
            .unwrap()
            .with_estimators(Box::new(ConstantIndicator), Box::new(RatioAboveOne));
        assert_eq!(evaluator.name(), "tsp");

        let evaluation = evaluator.evaluate_subset(&AttributeSubset::new(vec![0, 1, 2]));
        assert!(evaluation.used_fallback);
        assert_eq!(evaluation.pairs.len(), 3);
        assert_eq!(evaluation.pairs[0].score, 1.0);
        assert_eq!(evaluation.pairs[1].score, 1.0);
        let last = evaluation.pairs[2];
        assert_eq!((last.i, last.j, last.score), (1, 2, 0.0));
    }
}
