//! Scoring and ranking for CityScope regions.
//!
//! The crate turns a [`MetricTable`](cityscope_core::MetricTable) into
//! rankings in three pure steps:
//! - **Normalization** rescales each raw metric onto `0.0..=100.0` across the
//!   candidate set present at call time. Constant and missing metrics score
//!   the neutral midpoint of 50.
//! - **Composite scoring** combines the normalized dimensions with
//!   caller-supplied [`ScoreWeights`] and ranks regions, breaking ties by
//!   input order.
//! - **Intent re-ranking** recognises a fixed set of keyword [`Intent`]s in
//!   free text, nudges the composite additively and explains what it did.
//!
//! [`CandidateFilter`] narrows a scored table without re-normalizing it.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use cityscope_core::{MetricRow, MetricTable};
//! use cityscope_scorer::{ScoreWeights, rerank, score};
//!
//! let row = |id: &str, rent: f64| MetricRow {
//!     region_id: id.into(),
//!     name: id.into(),
//!     city: None,
//!     area_km2: 1.0,
//!     counts: BTreeMap::new(),
//!     rent: Some(rent),
//!     population: None,
//!     attributes: BTreeMap::new(),
//! };
//! let table = MetricTable::from_rows(vec![row("a", 2100.0), row("b", 1400.0)]);
//! let scored = score(&table, &ScoreWeights::default())?;
//! let picks = rerank(&scored, "something affordable", 1)?;
//! assert_eq!(picks.ranked[0].region.region_id(), "b");
//! # Ok::<(), cityscope_scorer::ScoringError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod composite;
mod error;
mod filter;
mod intent;
pub mod normalize;
mod rerank;
mod weights;

pub use composite::{DimensionScores, ScoreTable, ScoredRegion, composite, score};
pub use error::ScoringError;
pub use filter::CandidateFilter;
pub use intent::{Intent, interpret};
pub use normalize::{MIDPOINT, normalize, normalize_lower_is_better};
pub use rerank::{
    FALLBACK_RATIONALE, RATIONALE_HEADER, RankedRegion, Recommendation, adjusted_score, rationale,
    rerank,
};
pub use weights::{Dimension, ScoreWeights};
