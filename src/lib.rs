//! Facade crate for the CityScope region scoring engine.
//!
//! This crate re-exports the spatial aggregation types from `cityscope-core`
//! and the scoring, filtering and re-ranking API from `cityscope-scorer`.
//!
//! # Examples
//!
//! ```
//! use geo::polygon;
//! use cityscope_engine::{
//!     Category, CoordinateFrame, PointFeature, Region, RegionSet, ScoreWeights, aggregate,
//!     assign, rerank, score,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let west = polygon![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0), (x: 0.01, y: 0.01), (x: 0.0, y: 0.01)];
//! let east = polygon![(x: 0.01, y: 0.0), (x: 0.02, y: 0.0), (x: 0.02, y: 0.01), (x: 0.01, y: 0.01)];
//! let regions = RegionSet::new(vec![
//!     Region::from_polygon("west", "West", west, CoordinateFrame::Wgs84)?,
//!     Region::from_polygon("east", "East", east, CoordinateFrame::Wgs84)?,
//! ])?;
//! let stop = PointFeature::new(1, Category::Transit, geo::Coord { x: 0.015, y: 0.005 }, CoordinateFrame::Wgs84)?;
//!
//! let assignment = assign(&[stop], &regions);
//! let table = aggregate(&assignment.categories_by_region(), &regions);
//! let scored = score(&table, &ScoreWeights::default())?;
//! assert_eq!(scored.ranking(), ["east", "west"]);
//!
//! let picks = rerank(&scored, "car-free", 1)?;
//! assert_eq!(picks.ranked[0].region.region_id(), "east");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use cityscope_core::{
    AcquisitionChain, AcquisitionError, Assignment, Bucket, CandidateFeature, Category,
    CoordinateFrame, GridSource, InputError, MetricRow, MetricTable, PointFeature, PointMatch,
    Region, RegionCategories, RegionRents, RegionSet, RegionSource, RentKey, RentObservation,
    StaticSource, Tags, aggregate, assign, category_of, select_rents,
};

pub use cityscope_scorer::{
    CandidateFilter, Dimension, Intent, Recommendation, RankedRegion, ScoreTable, ScoreWeights,
    ScoredRegion, ScoringError, interpret, rerank, score,
};
