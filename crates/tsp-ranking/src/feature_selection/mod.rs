//! Feature selection utilities.
//!
//! This module contains the bagged top-scoring-pair (TSP) ranking of
//! attributes for binary classification.
pub mod tsp;
