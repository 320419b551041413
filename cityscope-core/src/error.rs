//! Input invariant violations.
//!
//! These are fatal for a scoring run: a caller receiving one of them gets no
//! partial metric table.

use thiserror::Error;

/// Errors raised while constructing regions, point features or region sets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// The region polygon had no rings or no coordinates.
    #[error("region {region_id} has an empty geometry")]
    EmptyGeometry {
        /// Identifier of the offending region.
        region_id: String,
    },
    /// The region's area was zero or negative after repair.
    #[error("region {region_id} has non-positive area {area_km2} km²")]
    NonPositiveArea {
        /// Identifier of the offending region.
        region_id: String,
        /// Computed area in square kilometres.
        area_km2: f64,
    },
    /// The region's area could not be computed as a finite number.
    #[error("region {region_id} has a non-finite area")]
    NonFiniteArea {
        /// Identifier of the offending region.
        region_id: String,
    },
    /// Two regions in the same set share an identifier.
    #[error("duplicate region id {region_id}")]
    DuplicateRegionId {
        /// The repeated identifier.
        region_id: String,
    },
    /// A coordinate was NaN or infinite.
    #[error("{owner} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// Description of the feature or region holding the coordinate.
        owner: String,
        /// Offending x value.
        x: f64,
        /// Offending y value.
        y: f64,
    },
    /// A region population was negative or not finite.
    #[error("region {region_id} has invalid population {population}")]
    InvalidPopulation {
        /// Identifier of the offending region.
        region_id: String,
        /// Supplied population.
        population: f64,
    },
}

/// Failures of a region acquisition strategy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquisitionError {
    /// The source returned no candidate features at all.
    #[error("{source_name}: no candidate features")]
    NoFeatures {
        /// Name of the strategy that failed.
        source_name: String,
    },
    /// No candidate feature had polygonal geometry.
    #[error("{source_name}: no polygonal features")]
    NoPolygons {
        /// Name of the strategy that failed.
        source_name: String,
    },
    /// Polygons were found but none carried a usable name.
    #[error("{source_name}: no named polygons")]
    Unnamed {
        /// Name of the strategy that failed.
        source_name: String,
    },
    /// A candidate could not be turned into a valid region.
    #[error(transparent)]
    InvalidRegion(#[from] InputError),
    /// Every strategy in the chain failed.
    #[error("all {} region sources failed", attempts.len())]
    Exhausted {
        /// Each strategy's name with the error it returned, in order.
        attempts: Vec<(String, AcquisitionError)>,
    },
}
