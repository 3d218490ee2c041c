use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Central configuration for one ranking session.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    /// Number of bagging iterations.
    pub run_count: usize,
    /// Percentage of instances sampled when the evaluator is built.
    pub objects_in_run_pct: f64,
    /// Pairs kept from each run before aggregation.
    pub top_pairs_per_run: usize,
    /// Size of the final attribute ranking.
    pub top_attributes_out: usize,
    /// Emit progress diagnostics at `info` level.
    pub debug: bool,
    /// Seed for every random draw of the session. `None` draws from entropy.
    pub seed: Option<u64>,
    pub pair_enumeration: PairEnumeration,
    pub exhaustion_policy: ExhaustionPolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            run_count: 100,
            objects_in_run_pct: 66.0,
            top_pairs_per_run: 100,
            top_attributes_out: 100,
            debug: true,
            seed: None,
            pair_enumeration: PairEnumeration::default(),
            exhaustion_policy: ExhaustionPolicy::default(),
        }
    }
}

impl RankingConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Which attribute pairs of a subset get scored.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PairEnumeration {
    /// Every pair `(i, j)` with `i < j`: k(k-1)/2 pairs for a subset of k.
    #[default]
    Unordered,
    /// Every pair `(i, j)` with `i != j`: k(k-1) pairs for a subset of k.
    Ordered,
}

/// What to do once fewer unused attributes remain than a subset needs.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExhaustionPolicy {
    /// Stop drawing and aggregate the runs completed so far.
    #[default]
    StopEarly,
    /// Run one last subset made of whatever is left (at least two attributes), then stop.
    ShrinkLast,
    /// Fail the whole session with `RankingError::InsufficientAttributes`.
    Abort,
}

impl FromStr for PairEnumeration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unordered" => Ok(PairEnumeration::Unordered),
            "ordered" => Ok(PairEnumeration::Ordered),
            _ => Err(format!(
                "Unknown pair enumeration: {}. Expected 'unordered' or 'ordered'",
                s
            )),
        }
    }
}

impl FromStr for ExhaustionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "stop_early" => Ok(ExhaustionPolicy::StopEarly),
            "shrink_last" => Ok(ExhaustionPolicy::ShrinkLast),
            "abort" => Ok(ExhaustionPolicy::Abort),
            _ => Err(format!(
                "Unknown exhaustion policy: {}. Expected 'stop-early', 'shrink-last' or 'abort'",
                s
            )),
        }
    }
}

impl fmt::Display for PairEnumeration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PairEnumeration::Unordered => write!(f, "unordered"),
            PairEnumeration::Ordered => write!(f, "ordered"),
        }
    }
}

impl fmt::Display for ExhaustionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExhaustionPolicy::StopEarly => write!(f, "stop-early"),
            ExhaustionPolicy::ShrinkLast => write!(f, "shrink-last"),
            ExhaustionPolicy::Abort => write!(f, "abort"),
        }
    }
}
