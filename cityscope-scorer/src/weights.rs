//! Scored dimensions and the caller-supplied weight vector.

use std::fmt;

use cityscope_core::MetricRow;

use crate::ScoringError;
use crate::normalize::Direction;

/// A metric that contributes to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Dimension {
    /// Average rent; cheaper scores higher.
    Affordability,
    /// Transit stops per square kilometre.
    Transit,
    /// Amenities per square kilometre.
    Amenities,
    /// Resident population.
    Size,
    /// Schools per square kilometre.
    Schools,
}

impl Dimension {
    /// Every dimension in scoring order.
    pub const ALL: [Self; 5] = [
        Self::Affordability,
        Self::Transit,
        Self::Amenities,
        Self::Size,
        Self::Schools,
    ];

    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Affordability => "affordability",
            Self::Transit => "transit",
            Self::Amenities => "amenities",
            Self::Size => "size",
            Self::Schools => "schools",
        }
    }

    /// Whether larger raw values are better for this dimension.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Affordability => Direction::LowerIsBetter,
            Self::Transit | Self::Amenities | Self::Size | Self::Schools => {
                Direction::HigherIsBetter
            }
        }
    }

    /// Raw value of this dimension for a row; `None` when the input column
    /// was missing.
    #[must_use]
    pub fn raw_value(self, row: &MetricRow) -> Option<f64> {
        match self {
            Self::Affordability => row.rent,
            Self::Transit => Some(row.transit_per_km2()),
            Self::Amenities => Some(row.amenities_per_km2()),
            Self::Size => row.population,
            Self::Schools => Some(row.schools_per_km2()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative weight per dimension.
///
/// Weights need not sum to one; the composite divides by their sum.
///
/// # Examples
/// ```
/// use cityscope_scorer::{Dimension, ScoreWeights};
///
/// let weights = ScoreWeights::default();
/// assert_eq!(weights.weight(Dimension::Affordability), 0.30);
/// assert_eq!(weights.weight(Dimension::Schools), 0.0);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScoreWeights {
    /// Weight of the affordability dimension.
    #[cfg_attr(feature = "serde", serde(alias = "affordability"))]
    pub rent: f64,
    /// Weight of the transit dimension.
    pub transit: f64,
    /// Weight of the amenities dimension.
    pub amenities: f64,
    /// Weight of the size dimension.
    pub size: f64,
    /// Weight of the schools dimension.
    pub schools: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            rent: 0.30,
            transit: 0.25,
            amenities: 0.25,
            size: 0.20,
            schools: 0.0,
        }
    }
}

impl ScoreWeights {
    /// All weights zero.
    pub const ZERO: Self = Self {
        rent: 0.0,
        transit: 0.0,
        amenities: 0.0,
        size: 0.0,
        schools: 0.0,
    };

    /// Weight assigned to `dimension`.
    #[must_use]
    pub const fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Affordability => self.rent,
            Dimension::Transit => self.transit,
            Dimension::Amenities => self.amenities,
            Dimension::Size => self.size,
            Dimension::Schools => self.schools,
        }
    }

    /// Return a copy with `dimension` set to `value`.
    #[must_use]
    pub const fn with(mut self, dimension: Dimension, value: f64) -> Self {
        match dimension {
            Dimension::Affordability => self.rent = value,
            Dimension::Transit => self.transit = value,
            Dimension::Amenities => self.amenities = value,
            Dimension::Size => self.size = value,
            Dimension::Schools => self.schools = value,
        }
        self
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        Dimension::ALL.iter().map(|&d| self.weight(d)).sum()
    }

    /// Check every weight is finite and non-negative.
    ///
    /// A zero total is valid; the composite is then zero everywhere.
    ///
    /// # Errors
    /// Returns [`ScoringError::InvalidWeight`] naming the first bad weight.
    pub fn validate(self) -> Result<Self, ScoringError> {
        Dimension::ALL
            .iter()
            .map(|&dimension| (dimension, self.weight(dimension)))
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
            .map_or(Ok(self), |(dimension, value)| {
                Err(ScoringError::InvalidWeight { dimension, value })
            })
    }
}
