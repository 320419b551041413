//! Spatial containment join of point features onto regions.
//!
//! Region envelopes go into an R\*-tree so each point only runs exact
//! containment tests against the few regions whose bounding box covers it.
//! Containment is boundary-inclusive, and a point covered by several regions
//! goes to the one that appears first in the [`RegionSet`].

use std::collections::BTreeMap;

use geo::{BoundingRect, Intersects, Point};
use rstar::{AABB, RTree, RTreeObject};

use crate::{Category, PointFeature, RegionSet};

/// Categories of the points assigned to each region, keyed by region id.
pub type RegionCategories = BTreeMap<String, Vec<Category>>;

/// A single point-to-region match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointMatch {
    /// Identifier of the matched point.
    pub point_id: u64,
    /// Identifier of the enclosing region.
    pub region_id: String,
    /// Category carried over from the point.
    pub category: Category,
}

/// Result of [`assign`]: only the points that matched a region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    matches: Vec<PointMatch>,
    unassigned: usize,
}

impl Assignment {
    /// Matches in point input order.
    pub fn iter(&self) -> std::slice::Iter<'_, PointMatch> {
        self.matches.iter()
    }

    /// Region assigned to a point, if any.
    #[must_use]
    pub fn region_of(&self, point_id: u64) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.point_id == point_id)
            .map(|m| m.region_id.as_str())
    }

    /// Number of matched points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Report whether no point matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of points that fell outside every region.
    #[must_use]
    pub const fn unassigned(&self) -> usize {
        self.unassigned
    }

    /// Group matched categories by region.
    ///
    /// Regions without matches are absent here; the aggregator fills them
    /// with zeros.
    #[must_use]
    pub fn categories_by_region(&self) -> RegionCategories {
        let mut grouped = RegionCategories::new();
        for m in &self.matches {
            grouped
                .entry(m.region_id.clone())
                .or_default()
                .push(m.category);
        }
        grouped
    }
}

struct RegionEnvelope {
    order: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Assign each point to at most one enclosing region.
///
/// Both inputs are already in WGS84, so no conversion happens here. Points
/// outside every region are counted in [`Assignment::unassigned`] and
/// otherwise ignored.
///
/// # Examples
/// ```
/// use geo::{Coord, polygon};
/// use cityscope_core::{Category, CoordinateFrame, PointFeature, Region, RegionSet, assign};
///
/// # fn main() -> Result<(), cityscope_core::InputError> {
/// let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
/// let regions = RegionSet::new(vec![Region::from_polygon("a", "A", square, CoordinateFrame::Wgs84)?])?;
/// let inside = PointFeature::new(1, Category::School, Coord { x: 0.5, y: 0.5 }, CoordinateFrame::Wgs84)?;
/// let outside = PointFeature::new(2, Category::School, Coord { x: 5.0, y: 5.0 }, CoordinateFrame::Wgs84)?;
///
/// let assignment = assign(&[inside, outside], &regions);
/// assert_eq!(assignment.region_of(1), Some("a"));
/// assert_eq!(assignment.region_of(2), None);
/// assert_eq!(assignment.unassigned(), 1);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn assign(points: &[PointFeature], regions: &RegionSet) -> Assignment {
    let envelopes = regions
        .iter()
        .enumerate()
        .filter_map(|(order, region)| {
            region.geometry().bounding_rect().map(|rect| RegionEnvelope {
                order,
                envelope: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            })
        })
        .collect();
    let tree = RTree::bulk_load(envelopes);
    let slice = regions.as_slice();

    let mut assignment = Assignment::default();
    for feature in points {
        let point = Point::from(feature.location);
        let query = AABB::from_point([feature.location.x, feature.location.y]);
        let first = tree
            .locate_in_envelope_intersecting(&query)
            .filter_map(|candidate| {
                slice
                    .get(candidate.order)
                    .filter(|region| region.geometry().intersects(&point))
                    .map(|region| (candidate.order, region))
            })
            .min_by_key(|(order, _)| *order);

        match first {
            Some((_, region)) => assignment.matches.push(PointMatch {
                point_id: feature.id,
                region_id: region.id().to_owned(),
                category: feature.category,
            }),
            None => assignment.unassigned += 1,
        }
    }

    log::debug!(
        "assigned {} of {} points to {} regions ({} unassigned)",
        assignment.matches.len(),
        points.len(),
        regions.len(),
        assignment.unassigned
    );
    assignment
}
