//! Weighted composite scoring and ranking.

use std::collections::BTreeMap;

use cityscope_core::{MetricRow, MetricTable};

use crate::normalize::normalize_optional;
use crate::{Dimension, ScoreWeights, ScoringError};

/// Normalized score per dimension, on the `0.0..=100.0` scale.
pub type DimensionScores = BTreeMap<Dimension, f64>;

/// One region with its normalized and composite scores.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredRegion {
    /// Position of the region in the scored metric table.
    pub input_index: usize,
    /// 1-based rank within the table holding this row.
    pub rank: usize,
    /// Raw metrics the scores were derived from.
    pub metrics: MetricRow,
    /// Normalized score per dimension.
    pub scores: DimensionScores,
    /// Weighted mean of the dimension scores.
    pub composite: f64,
}

impl ScoredRegion {
    /// Region identifier.
    #[must_use]
    pub fn region_id(&self) -> &str {
        &self.metrics.region_id
    }

    /// Normalized score of a dimension.
    #[must_use]
    pub fn score(&self, dimension: Dimension) -> f64 {
        self.scores.get(&dimension).copied().unwrap_or_default()
    }
}

/// Scored regions ordered from best to worst composite.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTable {
    weights: Option<ScoreWeights>,
    rows: Vec<ScoredRegion>,
}

impl ScoreTable {
    /// Weights the table was scored with, if it came from [`score`].
    #[must_use]
    pub const fn weights(&self) -> Option<&ScoreWeights> {
        self.weights.as_ref()
    }

    /// Rows in rank order.
    #[must_use]
    pub fn rows(&self) -> &[ScoredRegion] {
        &self.rows
    }

    /// Iterate rows in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredRegion> {
        self.rows.iter()
    }

    /// Row for a region.
    #[must_use]
    pub fn get(&self, region_id: &str) -> Option<&ScoredRegion> {
        self.rows.iter().find(|row| row.region_id() == region_id)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Region ids in rank order.
    #[must_use]
    pub fn ranking(&self) -> Vec<&str> {
        self.rows.iter().map(ScoredRegion::region_id).collect()
    }

    /// Keep the rows matching `keep` and renumber their ranks.
    #[must_use]
    pub(crate) fn retain(&self, keep: impl Fn(&ScoredRegion) -> bool) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row))
            .cloned()
            .zip(1..)
            .map(|(row, rank)| ScoredRegion { rank, ..row })
            .collect();
        Self {
            weights: self.weights,
            rows,
        }
    }
}

impl<'a> IntoIterator for &'a ScoreTable {
    type Item = &'a ScoredRegion;
    type IntoIter = std::slice::Iter<'a, ScoredRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalize every dimension across `table` and rank by composite score.
///
/// The composite is `Σ wᵢ·sᵢ / Σ wᵢ`, or `0.0` everywhere when all weights
/// are zero. Ties keep metric table order. Normalization only sees the rows
/// in `table`; score a narrowed table with [`MetricTable::retain_ids`] to get
/// scores relative to that subset.
///
/// # Errors
/// Returns [`ScoringError::InvalidWeight`] for negative or non-finite
/// weights.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use cityscope_core::{MetricRow, MetricTable};
/// use cityscope_scorer::{ScoreWeights, score};
///
/// let row = |id: &str, rent: f64| MetricRow {
///     region_id: id.into(),
///     name: id.into(),
///     city: None,
///     area_km2: 1.0,
///     counts: BTreeMap::new(),
///     rent: Some(rent),
///     population: None,
///     attributes: BTreeMap::new(),
/// };
/// let table = MetricTable::from_rows(vec![row("dear", 2500.0), row("cheap", 1200.0)]);
/// let weights = ScoreWeights { rent: 1.0, ..ScoreWeights::ZERO };
///
/// let scored = score(&table, &weights)?;
/// assert_eq!(scored.ranking(), ["cheap", "dear"]);
/// # Ok::<(), cityscope_scorer::ScoringError>(())
/// ```
pub fn score(table: &MetricTable, weights: &ScoreWeights) -> Result<ScoreTable, ScoringError> {
    let validated = weights.validate()?;
    let columns: Vec<(Dimension, Vec<f64>)> = Dimension::ALL
        .iter()
        .map(|&dimension| {
            let raw: Vec<Option<f64>> = table.iter().map(|row| dimension.raw_value(row)).collect();
            (dimension, normalize_optional(&raw, dimension.direction()))
        })
        .collect();

    let mut rows: Vec<ScoredRegion> = table
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let scores: DimensionScores = columns
                .iter()
                .filter_map(|(dimension, values)| values.get(index).map(|v| (*dimension, *v)))
                .collect();
            ScoredRegion {
                input_index: index,
                rank: 0,
                metrics: row.clone(),
                composite: composite(&scores, &validated),
                scores,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.composite.total_cmp(&a.composite));
    for (row, rank) in rows.iter_mut().zip(1..) {
        row.rank = rank;
    }
    log::debug!("scored {} regions", rows.len());
    Ok(ScoreTable {
        weights: Some(validated),
        rows,
    })
}

/// Weighted mean of `scores`; zero when every weight is zero.
#[expect(
    clippy::float_arithmetic,
    reason = "the composite is a weighted arithmetic mean"
)]
#[must_use]
pub fn composite(scores: &DimensionScores, weights: &ScoreWeights) -> f64 {
    let total = weights.total();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = scores
        .iter()
        .map(|(&dimension, &value)| weights.weight(dimension) * value)
        .sum();
    weighted / total
}
