//! Errors raised while evaluating a Bellman step.

use super::grid::Position;
use crate::Discrete;
use thiserror::Error;

/// Every variant is a precondition violation by the caller. Nothing here is
/// transient, so nothing is retried.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BellmanError {
    /// A next-state produced by the move rule has no utility entry.
    #[error("no utility entry for position {0}")]
    MissingUtilityEntry(Position),

    #[error("position {0} is outside the grid")]
    OutOfGrid(Position),

    #[error("invalid action index {0}, expected 0..=3")]
    InvalidAction(Discrete),

    #[error("discount factor {0} outside (0, 1]")]
    InvalidDiscount(f64),

    #[error("invalid transition weights: {0}")]
    InvalidWeights(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for BellmanError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BellmanError>;
