//! Regions: the polygonal units that get scored.
//!
//! A [`Region`] is validated when it is built. Its geometry is converted to
//! WGS84 and canonicalized exactly once, and its area is fixed at that point,
//! so downstream stages can rely on `area_km2 > 0` without guarding.

use std::collections::{BTreeMap, HashSet};

use geo::{BooleanOps, CoordsIter, GeodesicArea, MultiPolygon, Polygon, Validation};

use crate::{CoordinateFrame, InputError};

const SQUARE_METRES_PER_KM2: f64 = 1_000_000.0;

/// A bounded polygonal area with scalar attributes.
///
/// # Examples
/// ```
/// use geo::{MultiPolygon, polygon};
/// use cityscope_core::{CoordinateFrame, Region};
///
/// # fn main() -> Result<(), cityscope_core::InputError> {
/// let square = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 0.01, y: 0.0),
///     (x: 0.01, y: 0.01),
///     (x: 0.0, y: 0.01),
/// ];
/// let region = Region::new("r1", "Downtown", MultiPolygon::new(vec![square]), CoordinateFrame::Wgs84)?;
/// assert!(region.area_km2() > 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    id: String,
    name: String,
    city: Option<String>,
    geometry: MultiPolygon<f64>,
    area_km2: f64,
    population: Option<f64>,
    attributes: BTreeMap<String, f64>,
}

impl Region {
    /// Build a region whose area is derived from its geometry.
    ///
    /// The polygons are converted from `frame` to WGS84 and measured
    /// geodesically. Invalid polygons are first repaired by a boolean union
    /// with the empty set, which splits self-intersecting rings and drops
    /// degenerate ones. Valid polygons keep their vertices unchanged.
    ///
    /// # Errors
    /// Returns [`InputError`] when the geometry is empty, holds non-finite
    /// coordinates, or has no positive area after repair.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        geometry: MultiPolygon<f64>,
        frame: CoordinateFrame,
    ) -> Result<Self, InputError> {
        let id = id.into();
        let repaired = prepare_geometry(&id, &geometry, frame)?;
        let area_km2 = repaired.geodesic_area_unsigned() / SQUARE_METRES_PER_KM2;
        Self::assemble(id, name.into(), repaired, area_km2)
    }

    /// Build a region from a single polygon.
    ///
    /// # Errors
    /// See [`Region::new`].
    pub fn from_polygon(
        id: impl Into<String>,
        name: impl Into<String>,
        polygon: Polygon<f64>,
        frame: CoordinateFrame,
    ) -> Result<Self, InputError> {
        Self::new(id, name, MultiPolygon::new(vec![polygon]), frame)
    }

    /// Build a region with an externally surveyed area, such as an official
    /// land area that excludes water.
    ///
    /// The geometry is still converted and repaired; only the measurement is
    /// taken from the caller.
    ///
    /// # Errors
    /// Returns [`InputError`] when the geometry is invalid or `area_km2` is
    /// not a positive finite number.
    pub fn with_area(
        id: impl Into<String>,
        name: impl Into<String>,
        geometry: MultiPolygon<f64>,
        frame: CoordinateFrame,
        area_km2: f64,
    ) -> Result<Self, InputError> {
        let id = id.into();
        let repaired = prepare_geometry(&id, &geometry, frame)?;
        Self::assemble(id, name.into(), repaired, area_km2)
    }

    fn assemble(
        id: String,
        name: String,
        geometry: MultiPolygon<f64>,
        area_km2: f64,
    ) -> Result<Self, InputError> {
        if !area_km2.is_finite() {
            return Err(InputError::NonFiniteArea { region_id: id });
        }
        if area_km2 <= 0.0 {
            return Err(InputError::NonPositiveArea {
                region_id: id,
                area_km2,
            });
        }
        Ok(Self {
            id,
            name,
            city: None,
            geometry,
            area_km2,
            population: None,
            attributes: BTreeMap::new(),
        })
    }

    /// Attach the city the region belongs to.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Attach a population count.
    ///
    /// # Errors
    /// Returns [`InputError::InvalidPopulation`] when `population` is negative
    /// or not finite.
    pub fn with_population(mut self, population: f64) -> Result<Self, InputError> {
        if !(population.is_finite() && population >= 0.0) {
            return Err(InputError::InvalidPopulation {
                region_id: self.id,
                population,
            });
        }
        self.population = Some(population);
        Ok(self)
    }

    /// Attach an extra raw metric.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// City or wider area label, if known.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Canonical WGS84 geometry.
    #[must_use]
    pub const fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Area in square kilometres; always positive.
    #[must_use]
    pub const fn area_km2(&self) -> f64 {
        self.area_km2
    }

    /// Resident population, if known.
    #[must_use]
    pub const fn population(&self) -> Option<f64> {
        self.population
    }

    /// Extra raw metrics keyed by name.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, f64> {
        &self.attributes
    }
}

fn prepare_geometry(
    region_id: &str,
    geometry: &MultiPolygon<f64>,
    frame: CoordinateFrame,
) -> Result<MultiPolygon<f64>, InputError> {
    if geometry.coords_count() == 0 {
        return Err(InputError::EmptyGeometry {
            region_id: region_id.to_owned(),
        });
    }
    if let Some(bad) = geometry
        .coords_iter()
        .find(|c| !(c.x.is_finite() && c.y.is_finite()))
    {
        return Err(InputError::NonFiniteCoordinate {
            owner: format!("region {region_id}"),
            x: bad.x,
            y: bad.y,
        });
    }
    let converted = frame.polygons_to_wgs84(geometry);
    // Valid input keeps its exact vertices so neighbours still share edges.
    if converted.is_valid() {
        return Ok(converted);
    }
    let repaired = converted.union(&MultiPolygon::new(Vec::new()));
    if repaired.0.len() != converted.0.len() {
        log::warn!(
            "region {region_id}: repair changed polygon count from {} to {}",
            converted.0.len(),
            repaired.0.len()
        );
    }
    Ok(repaired)
}

/// An ordered collection of regions with unique identifiers.
///
/// Input order is preserved; it is the tie-break order used when a point
/// falls inside more than one region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// Validate and wrap a list of regions.
    ///
    /// # Errors
    /// Returns [`InputError::DuplicateRegionId`] for the first repeated id.
    pub fn new(regions: Vec<Region>) -> Result<Self, InputError> {
        let mut seen = HashSet::with_capacity(regions.len());
        for region in &regions {
            if !seen.insert(region.id()) {
                return Err(InputError::DuplicateRegionId {
                    region_id: region.id().to_owned(),
                });
            }
        }
        Ok(Self { regions })
    }

    /// Iterate over the regions in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Regions as a slice, in input order.
    #[must_use]
    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id() == id)
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Report whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
