//! JSON scoring request and the pipeline that evaluates it.

use std::collections::BTreeMap;

use cityscope_core::{
    Category, CoordinateFrame, InputError, MetricTable, PointFeature, Region, RegionSet,
    RentKey, RentObservation, Tags, aggregate, assign, select_rents,
};
use cityscope_scorer::{CandidateFilter, ScoreWeights};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Deserializer, Serialize};

/// A scoring request as read from disk.
///
/// Every coordinate in the request uses `frame`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct ScoringRequest {
    #[serde(default)]
    pub(crate) frame: CoordinateFrame,
    pub(crate) regions: Vec<RegionInput>,
    #[serde(default)]
    pub(crate) points: Vec<PointInput>,
    #[serde(default)]
    pub(crate) rents: Vec<RentObservation>,
    #[serde(default)]
    pub(crate) rent_key: Option<RentKey>,
    #[serde(default = "fill_missing_rents_default")]
    pub(crate) fill_missing_rents: bool,
    #[serde(default)]
    pub(crate) weights: Option<ScoreWeights>,
    #[serde(default)]
    pub(crate) filter: CandidateFilter,
}

const fn fill_missing_rents_default() -> bool {
    true
}

/// One region: polygons given as rings of `[x, y]` pairs, exterior first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RegionInput {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) population: Option<f64>,
    /// Surveyed area overriding the geodesic measurement.
    #[serde(default)]
    pub(crate) area_km2: Option<f64>,
    pub(crate) polygons: Vec<Vec<Vec<[f64; 2]>>>,
    #[serde(default)]
    pub(crate) attributes: BTreeMap<String, f64>,
}

/// One point of interest. Without an explicit category the tags classify it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct PointInput {
    pub(crate) id: u64,
    pub(crate) x: f64,
    pub(crate) y: f64,
    #[serde(default, deserialize_with = "category_from_name")]
    pub(crate) category: Option<Category>,
    #[serde(default)]
    pub(crate) tags: Tags,
    #[serde(default)]
    pub(crate) name: Option<String>,
}

fn category_from_name<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|name| name.parse().map_err(serde::de::Error::custom))
        .transpose()
}

/// Metrics derived from a request, ready for scoring.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Evaluation {
    pub(crate) table: MetricTable,
    pub(crate) unassigned_points: usize,
}

impl RegionInput {
    fn geometry(&self) -> MultiPolygon<f64> {
        let polygons = self
            .polygons
            .iter()
            .filter_map(|rings| {
                let mut lines = rings.iter().map(|ring| {
                    LineString::from(
                        ring.iter()
                            .map(|&[x, y]| Coord { x, y })
                            .collect::<Vec<_>>(),
                    )
                });
                let exterior = lines.next()?;
                Some(Polygon::new(exterior, lines.collect()))
            })
            .collect();
        MultiPolygon::new(polygons)
    }

    fn to_region(&self, frame: CoordinateFrame) -> Result<Region, InputError> {
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        let mut region = match self.area_km2 {
            Some(area) => Region::with_area(self.id.clone(), name, self.geometry(), frame, area)?,
            None => Region::new(self.id.clone(), name, self.geometry(), frame)?,
        };
        if let Some(city) = &self.city {
            region = region.with_city(city.clone());
        }
        if let Some(population) = self.population {
            region = region.with_population(population)?;
        }
        for (attribute, value) in &self.attributes {
            region = region.with_attribute(attribute.clone(), *value);
        }
        Ok(region)
    }
}

impl PointInput {
    fn to_feature(&self, frame: CoordinateFrame) -> Result<PointFeature, InputError> {
        let location = Coord {
            x: self.x,
            y: self.y,
        };
        let feature = match self.category {
            Some(category) => PointFeature::new(self.id, category, location, frame)?,
            None => PointFeature::from_tags(self.id, location, &self.tags, frame)?,
        };
        Ok(match &self.name {
            Some(name) => feature.with_name(name.clone()),
            None => feature,
        })
    }
}

impl ScoringRequest {
    /// Validated regions in request order.
    pub(crate) fn region_set(&self) -> Result<RegionSet, InputError> {
        let regions = self
            .regions
            .iter()
            .map(|region| region.to_region(self.frame))
            .collect::<Result<Vec<_>, _>>()?;
        RegionSet::new(regions)
    }

    /// Validated point features in request order.
    pub(crate) fn point_features(&self) -> Result<Vec<PointFeature>, InputError> {
        self.points
            .iter()
            .map(|point| point.to_feature(self.frame))
            .collect()
    }

    /// Assign points, aggregate counts and attach rents.
    pub(crate) fn evaluate(&self) -> Result<Evaluation, InputError> {
        let regions = self.region_set()?;
        let points = self.point_features()?;
        let assignment = assign(&points, &regions);
        let table = aggregate(&assignment.categories_by_region(), &regions);
        let table = match &self.rent_key {
            Some(key) => {
                let selected = select_rents(&self.rents, key);
                let rents = if self.fill_missing_rents {
                    selected.fill_missing(regions.iter().map(Region::id))
                } else {
                    selected
                };
                table.with_rents(&rents)
            }
            None => {
                if !self.rents.is_empty() {
                    log::warn!(
                        "ignoring {} rent observations without a rent_key",
                        self.rents.len()
                    );
                }
                table
            }
        };
        log::info!(
            "evaluated {} regions, {} points unassigned",
            table.len(),
            assignment.unassigned()
        );
        Ok(Evaluation {
            table,
            unassigned_points: assignment.unassigned(),
        })
    }

    /// Request weights, or the defaults when the file names none.
    pub(crate) fn base_weights(&self) -> ScoreWeights {
        self.weights.unwrap_or_default()
    }
}
