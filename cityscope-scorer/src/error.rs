//! Error types raised while scoring and ranking regions.

use thiserror::Error;

use crate::Dimension;

/// Errors raised by the scorer, filter and re-ranker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A weight was negative, NaN or infinite.
    #[error("weight for {dimension} must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Dimension carrying the bad weight.
        dimension: Dimension,
        /// The rejected value.
        value: f64,
    },
    /// No region was left to rank.
    #[error("no regions match the request")]
    EmptyCandidateSet,
}
