//! Core domain types for the CityScope engine.
//!
//! Regions and point features are validated at construction and converted
//! into one common WGS84 frame, so the stages downstream never see invalid
//! geometry or mixed reference frames. The pipeline stages in this crate are
//! pure functions:
//!
//! - [`assign`] joins point features onto regions by containment.
//! - [`aggregate`] counts the joined categories and derives densities.
//! - [`select_rents`] reduces rent observations to one value per region.
//!
//! [`AcquisitionChain`] produces the regions themselves from an ordered list
//! of strategies.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod acquisition;
mod assign;
mod category;
mod error;
mod frame;
mod metrics;
mod point;
mod region;
mod rent;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use acquisition::{
    AcquisitionChain, CandidateFeature, GridSource, NAME_TAGS, RegionSource, StaticSource,
};
pub use assign::{Assignment, PointMatch, RegionCategories, assign};
pub use category::{Category, Tags, category_of};
pub use error::{AcquisitionError, InputError};
pub use frame::CoordinateFrame;
pub use metrics::{Bucket, MetricRow, MetricTable, aggregate};
pub use point::PointFeature;
pub use region::{Region, RegionSet};
pub use rent::{RegionRents, RentKey, RentObservation, select_rents};
