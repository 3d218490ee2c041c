use thiserror::Error;

/// Errors raised while building an evaluator or running a ranking session.
///
/// Degenerate pair scores are not errors: they are carried as `NaN` and
/// sorted last.
#[derive(Debug, Error)]
pub enum RankingError {
    /// The dataset cannot be ranked (no instances, one class, bad class values, ...).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The pool of unused attributes ran dry before all runs were drawn.
    #[error(
        "run {run}: only {remaining} unused attributes left, {required} required per subset"
    )]
    InsufficientAttributes {
        run: usize,
        remaining: usize,
        required: usize,
    },
}

pub type Result<T> = std::result::Result<T, RankingError>;
