//! Candidate filtering over a scored table.

use cityscope_core::{Bucket, Category};

use crate::{ScoreTable, ScoredRegion, ScoringError};

/// Optional bounds a region must satisfy to stay a candidate.
///
/// Filtering keeps the scores computed over the full table; it never
/// re-normalizes. A region with no known rent or population fails any bound
/// on that value.
///
/// # Examples
/// ```
/// use cityscope_scorer::CandidateFilter;
///
/// let filter = CandidateFilter { max_rent: Some(2200.0), ..CandidateFilter::default() };
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CandidateFilter {
    /// Highest acceptable average rent.
    pub max_rent: Option<f64>,
    /// Smallest acceptable population.
    pub min_population: Option<f64>,
    /// Smallest acceptable number of transit stops.
    pub min_transit_stops: Option<u32>,
    /// Smallest acceptable number of amenities.
    pub min_amenities: Option<u32>,
    /// Smallest acceptable composite score.
    pub min_score: Option<f64>,
    /// Required city, compared case-insensitively.
    pub city: Option<String>,
}

impl CandidateFilter {
    /// Report whether no bound is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check a single scored region against every bound.
    #[must_use]
    pub fn accepts(&self, region: &ScoredRegion) -> bool {
        let metrics = &region.metrics;
        let within_rent = self
            .max_rent
            .is_none_or(|max| metrics.rent.is_some_and(|rent| rent <= max));
        let within_population = self
            .min_population
            .is_none_or(|min| metrics.population.is_some_and(|pop| pop >= min));
        let within_transit = self
            .min_transit_stops
            .is_none_or(|min| metrics.count(Category::Transit) >= min);
        let within_amenities = self
            .min_amenities
            .is_none_or(|min| metrics.bucket_count(Bucket::Amenities) >= min);
        let within_score = self.min_score.is_none_or(|min| region.composite >= min);
        let within_city = self.city.as_deref().is_none_or(|wanted| {
            metrics
                .city
                .as_deref()
                .is_some_and(|city| city.eq_ignore_ascii_case(wanted))
        });
        within_rent
            && within_population
            && within_transit
            && within_amenities
            && within_score
            && within_city
    }

    /// Keep the accepted regions, renumbering ranks from 1.
    ///
    /// # Errors
    /// Returns [`ScoringError::EmptyCandidateSet`] when no region survives.
    pub fn apply(&self, table: &ScoreTable) -> Result<ScoreTable, ScoringError> {
        let kept = table.retain(|region| self.accepts(region));
        log::debug!("filter kept {} of {} regions", kept.len(), table.len());
        if kept.is_empty() {
            Err(ScoringError::EmptyCandidateSet)
        } else {
            Ok(kept)
        }
    }
}
