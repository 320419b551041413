//! Region acquisition strategies tried in order.
//!
//! A [`RegionSource`] turns some already-materialized input into regions.
//! [`AcquisitionChain`] runs several sources until one succeeds, so a caller
//! can prefer named administrative boundaries and fall back to a synthetic
//! [`GridSource`] when none are usable.

use std::collections::HashSet;

use geo::{Area, BooleanOps, BoundingRect, Geometry, MultiPolygon, Rect};

use crate::{AcquisitionError, CoordinateFrame, Region, Tags};

/// Tags searched for a display name, in priority order.
pub const NAME_TAGS: [&str; 4] = ["name", "name:en", "place_name", "addr:city"];

/// A strategy producing regions.
pub trait RegionSource {
    /// Short label used in logs and errors.
    fn name(&self) -> &str;

    /// Produce the regions, or explain why this strategy cannot.
    ///
    /// # Errors
    /// Returns an [`AcquisitionError`] describing the failure.
    fn acquire(&self) -> Result<Vec<Region>, AcquisitionError>;
}

/// Ordered list of sources; the first success wins.
#[derive(Default)]
pub struct AcquisitionChain {
    sources: Vec<Box<dyn RegionSource>>,
}

impl AcquisitionChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to try after the existing ones.
    #[must_use]
    pub fn then(mut self, source: impl RegionSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Run the sources in order.
    ///
    /// # Errors
    /// Returns [`AcquisitionError::Exhausted`] with every attempt's error when
    /// no source succeeds, including when the chain is empty.
    pub fn acquire(&self) -> Result<Vec<Region>, AcquisitionError> {
        let mut attempts = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            log::info!("acquiring regions from {}", source.name());
            match source.acquire() {
                Ok(regions) => {
                    log::info!("{} produced {} regions", source.name(), regions.len());
                    return Ok(regions);
                }
                Err(err) => {
                    log::warn!("{} failed: {err}", source.name());
                    attempts.push((source.name().to_owned(), err));
                }
            }
        }
        Err(AcquisitionError::Exhausted { attempts })
    }
}

/// A raw candidate boundary with its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFeature {
    /// Geometry as delivered; only polygons and multipolygons are used.
    pub geometry: Geometry<f64>,
    /// OpenStreetMap-style tags.
    pub tags: Tags,
}

impl CandidateFeature {
    /// First non-blank name among [`NAME_TAGS`].
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        NAME_TAGS
            .iter()
            .filter_map(|key| self.tags.get(*key))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    fn polygons(&self) -> Option<MultiPolygon<f64>> {
        match &self.geometry {
            Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
            Geometry::MultiPolygon(polygons) => Some(polygons.clone()),
            _ => None,
        }
    }
}

/// Regions taken from pre-fetched candidate boundaries.
///
/// Candidates with repeated geometry or a repeated name keep only the first
/// occurrence. Region ids are the display names.
#[derive(Debug, Clone)]
pub struct StaticSource {
    label: String,
    features: Vec<CandidateFeature>,
    frame: CoordinateFrame,
    city: Option<String>,
}

impl StaticSource {
    /// Wrap candidates given in `frame`.
    pub fn new(
        label: impl Into<String>,
        features: Vec<CandidateFeature>,
        frame: CoordinateFrame,
    ) -> Self {
        Self {
            label: label.into(),
            features,
            frame,
            city: None,
        }
    }

    /// Label every produced region with a city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    fn error(&self, make: fn(String) -> AcquisitionError) -> AcquisitionError {
        make(self.label.clone())
    }
}

impl RegionSource for StaticSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn acquire(&self) -> Result<Vec<Region>, AcquisitionError> {
        if self.features.is_empty() {
            return Err(self.error(|source_name| AcquisitionError::NoFeatures { source_name }));
        }

        let mut unique: Vec<&CandidateFeature> = Vec::new();
        for feature in &self.features {
            if !unique.iter().any(|kept| kept.geometry == feature.geometry) {
                unique.push(feature);
            }
        }
        let polygonal: Vec<(MultiPolygon<f64>, &CandidateFeature)> = unique
            .into_iter()
            .filter_map(|feature| feature.polygons().map(|polygons| (polygons, feature)))
            .collect();
        if polygonal.is_empty() {
            return Err(self.error(|source_name| AcquisitionError::NoPolygons { source_name }));
        }

        let mut names = HashSet::new();
        let mut regions = Vec::new();
        for (polygons, feature) in polygonal {
            let Some(name) = feature.display_name() else {
                continue;
            };
            if !names.insert(name.to_owned()) {
                log::warn!("{}: skipping repeated name {name}", self.label);
                continue;
            }
            let region = Region::new(name, name, polygons, self.frame)?;
            regions.push(match &self.city {
                Some(city) => region.with_city(city.clone()),
                None => region,
            });
        }
        if regions.is_empty() {
            return Err(self.error(|source_name| AcquisitionError::Unnamed { source_name }));
        }
        Ok(regions)
    }
}

/// Synthetic regions from a regular grid over a study-area boundary.
///
/// The grid is laid out in Web Mercator over the boundary's bounding box and
/// every cell is clipped to the boundary. Rows count upward from the southern
/// edge and columns eastward from the western edge; both are 1-based in the
/// `Grid_<row>_<col>` names.
#[derive(Debug, Clone)]
pub struct GridSource {
    boundary: MultiPolygon<f64>,
    rows: u32,
    cols: u32,
    city: Option<String>,
}

impl GridSource {
    /// Default number of rows and columns.
    pub const DEFAULT_DIVISIONS: u32 = 6;

    /// Grid over a WGS84 `boundary` with the default 6×6 layout.
    #[must_use]
    pub fn new(boundary: MultiPolygon<f64>) -> Self {
        Self {
            boundary,
            rows: Self::DEFAULT_DIVISIONS,
            cols: Self::DEFAULT_DIVISIONS,
            city: None,
        }
    }

    /// Override the grid dimensions.
    #[must_use]
    pub const fn with_divisions(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Label every produced region with a city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    fn cell(bounds: Rect<f64>, rows: u32, cols: u32, row: u32, col: u32) -> Rect<f64> {
        let width = bounds.width() / f64::from(cols);
        let height = bounds.height() / f64::from(rows);
        let min = bounds.min();
        Rect::new(
            (min.x + f64::from(col) * width, min.y + f64::from(row) * height),
            (
                min.x + f64::from(col + 1) * width,
                min.y + f64::from(row + 1) * height,
            ),
        )
    }
}

impl RegionSource for GridSource {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn acquire(&self) -> Result<Vec<Region>, AcquisitionError> {
        let no_polygons = || AcquisitionError::NoPolygons {
            source_name: self.name().to_owned(),
        };
        let projected = CoordinateFrame::WebMercator.polygons_from_wgs84(&self.boundary);
        let bounds = projected.bounding_rect().ok_or_else(no_polygons)?;
        if self.rows == 0 || self.cols == 0 {
            return Err(no_polygons());
        }

        let mut regions = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = Self::cell(bounds, self.rows, self.cols, row, col).to_polygon();
                let clipped = cell.intersection(&projected);
                if clipped.unsigned_area() <= 0.0 {
                    continue;
                }
                let id = format!("Grid_{}_{}", row + 1, col + 1);
                let region = Region::new(id.clone(), id, clipped, CoordinateFrame::WebMercator)?;
                regions.push(match &self.city {
                    Some(city) => region.with_city(city.clone()),
                    None => region,
                });
            }
        }
        if regions.is_empty() {
            return Err(no_polygons());
        }
        Ok(regions)
    }
}
