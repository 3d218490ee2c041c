use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Score of one attribute pair within a subset evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPair {
    pub i: usize,
    pub j: usize,
    /// Discrimination score; `NaN` when a class had no sampled instances.
    pub score: f64,
}

impl ScoredPair {
    pub fn new(i: usize, j: usize, score: f64) -> Self {
        debug_assert_ne!(i, j, "a pair needs two distinct attributes");
        ScoredPair { i, j, score }
    }

    /// Score used for ordering: `NaN` ranks as negative infinity.
    pub fn sort_key(&self) -> f64 {
        score_key(self.score)
    }
}

impl fmt::Display for ScoredPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "i = {}, j = {}, score = {}", self.i, self.j, self.score)
    }
}

pub fn score_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Sort pairs best first. `NaN` scores end up last; equal scores keep
/// their enumeration order.
pub fn sort_by_score_desc(pairs: &mut [ScoredPair]) {
    pairs.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
}

/// Accumulated rank of one attribute over all runs of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeRank {
    pub attribute: usize,
    /// Sum of position weights; negative infinity until the first contribution.
    pub rank: f64,
    /// Best score among the kept pairs that contributed, used to order equal ranks.
    pub best_score: f64,
}

impl AttributeRank {
    pub fn new(attribute: usize) -> Self {
        AttributeRank {
            attribute,
            rank: f64::NEG_INFINITY,
            best_score: f64::NEG_INFINITY,
        }
    }

    /// Add the weight of one kept pair with the given pair score.
    pub fn add_ranking(&mut self, weight: f64, score: f64) {
        if self.rank == f64::NEG_INFINITY {
            self.rank = weight;
        } else {
            self.rank += weight;
        }
        self.best_score = self.best_score.max(score_key(score));
    }

    pub fn is_ranked(&self) -> bool {
        self.rank > f64::NEG_INFINITY
    }

    /// Best rank first. Equal ranks go by best pair score, then by
    /// ascending attribute index.
    pub fn cmp_desc(&self, other: &AttributeRank) -> Ordering {
        other
            .rank
            .total_cmp(&self.rank)
            .then(other.best_score.total_cmp(&self.best_score))
            .then(self.attribute.cmp(&other.attribute))
    }
}

/// A set of attribute indices evaluated together in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSubset {
    attributes: Vec<usize>,
}

impl AttributeSubset {
    pub fn new(mut attributes: Vec<usize>) -> Self {
        attributes.sort_unstable();
        attributes.dedup();
        AttributeSubset { attributes }
    }

    /// Subset of the positions set to `true` in `mask`.
    pub fn from_mask(mask: &[bool]) -> Self {
        AttributeSubset {
            attributes: mask
                .iter()
                .enumerate()
                .filter_map(|(attr, &set)| if set { Some(attr) } else { None })
                .collect(),
        }
    }

    pub fn attributes(&self) -> &[usize] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, attr: usize) -> bool {
        self.attributes.binary_search(&attr).is_ok()
    }
}
