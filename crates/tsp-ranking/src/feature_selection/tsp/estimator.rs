//! Top-scoring-pair statistic for one ordered attribute pair.
//!
//! For a pair `(i, j)` every sampled instance contributes an indicator
//! derived from the ratio `value(i) / value(j)` and the mean of that ratio
//! over the sample. The per-class indicator sums are turned into class
//! probabilities, and the score is the absolute difference between the two:
//!
//! score = | P(first class) - P(second class) |
//!
//! Ratios are never computed when either value is zero (or missing); such
//! instances contribute 0 to the mean and to the indicator sums.
use crate::data_handling::{Dataset, NUM_CLASSES};
use crate::sampling::InstanceSample;

/// Per-instance indicator of a pair estimator.
pub trait PairEstimator {
    /// Indicator for one instance, given its ratio (`None` when undefined)
    /// and the sample's mean ratio.
    fn indicator(&self, ratio: Option<f64>, avg_ratio: f64) -> f64;

    fn name(&self) -> &str {
        "estimator"
    }
}

/// Hard 0/1 indicator: 1 when the instance ratio is below the mean ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEstimator;

impl PairEstimator for ThresholdEstimator {
    fn indicator(&self, ratio: Option<f64>, avg_ratio: f64) -> f64 {
        match ratio {
            Some(r) if r < avg_ratio => 1.0,
            _ => 0.0,
        }
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

/// Soft indicator `r / (avg + r)`, used to break ties left by the hard one.
///
/// A non-finite result (`avg + r == 0` with negative values) counts as 0,
/// like an undefined ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftRatioEstimator;

impl PairEstimator for SoftRatioEstimator {
    fn indicator(&self, ratio: Option<f64>, avg_ratio: f64) -> f64 {
        match ratio.map(|r| r / (avg_ratio + r)) {
            Some(soft) if soft.is_finite() => soft,
            _ => 0.0,
        }
    }

    fn name(&self) -> &str {
        "soft_ratio"
    }
}

/// `value(i) / value(j)` for one instance, undefined when either value is
/// zero or not finite.
#[inline]
pub fn ratio(dataset: &Dataset, row: usize, i: usize, j: usize) -> Option<f64> {
    let vi = dataset.value(row, i);
    let vj = dataset.value(row, j);
    if vi == 0.0 || vj == 0.0 || !vi.is_finite() || !vj.is_finite() {
        None
    } else {
        Some(vi / vj)
    }
}

/// Mean ratio of the pair over the sample. `NaN` for an empty sample.
pub fn average_ratio(dataset: &Dataset, sample: &InstanceSample, i: usize, j: usize) -> f64 {
    let total: f64 = sample
        .rows()
        .iter()
        .map(|&row| ratio(dataset, row, i, j).unwrap_or(0.0))
        .sum();
    total / sample.len() as f64
}

/// Score the ordered pair `(i, j)` with the given estimator.
///
/// A class without sampled instances yields a `NaN` probability and hence a
/// `NaN` score.
pub fn score_pair<E: PairEstimator + ?Sized>(
    estimator: &E,
    dataset: &Dataset,
    sample: &InstanceSample,
    i: usize,
    j: usize,
    avg_ratio: f64,
) -> f64 {
    let mut indicator_sums = [0.0; NUM_CLASSES];
    for (row, class) in sample.iter() {
        indicator_sums[class] += estimator.indicator(ratio(dataset, row, i, j), avg_ratio);
    }

    let counts = sample.class_counts();
    let first = class_probability(indicator_sums[0], counts[0]);
    let second = class_probability(indicator_sums[1], counts[1]);
    (first - second).abs()
}

fn class_probability(indicator_sum: f64, class_count: usize) -> f64 {
    if class_count == 0 {
        f64::NAN
    } else {
        indicator_sum / class_count as f64
    }
}
