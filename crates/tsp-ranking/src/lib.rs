//! tsp-ranking: bagged top-scoring-pair feature ranking.
//!
//! Attributes of a labeled, two-class numeric dataset are ranked by how well
//! ratios between pairs of them separate the classes. Instead of scoring all
//! pairs at once, many disjoint random attribute subsets are scored on a
//! fixed instance sample and the per-run results are merged into one
//! ranking.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod feature_selection;
pub mod io;
pub mod sampling;

pub use config::RankingConfig;
pub use data_handling::Dataset;
pub use error::{RankingError, Result};
pub use feature_selection::tsp::rank_attributes;
