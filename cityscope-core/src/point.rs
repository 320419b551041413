//! Point features: categorised locations that are counted per region.
//!
//! Points are validated and converted to WGS84 when built, so the spatial
//! join only ever sees finite coordinates in one frame.

use geo::Coord;

use crate::{Category, CoordinateFrame, InputError, Tags, category_of};

/// A categorised, geolocated feature such as a school or bus stop.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cityscope_core::{Category, CoordinateFrame, PointFeature};
///
/// # fn main() -> Result<(), cityscope_core::InputError> {
/// let stop = PointFeature::new(7, Category::Transit, Coord { x: -123.1, y: 49.3 }, CoordinateFrame::Wgs84)?
///     .with_name("Main St Station");
/// assert_eq!(stop.name.as_deref(), Some("Main St Station"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointFeature {
    /// Unique identifier.
    pub id: u64,
    /// Fixed category of the feature.
    pub category: Category,
    /// WGS84 position.
    pub location: Coord<f64>,
    /// Optional display name.
    pub name: Option<String>,
}

impl PointFeature {
    /// Validate a coordinate in `frame` and build a feature in WGS84.
    ///
    /// # Errors
    /// Returns [`InputError::NonFiniteCoordinate`] when either component is
    /// NaN or infinite, before or after conversion.
    pub fn new(
        id: u64,
        category: Category,
        location: Coord<f64>,
        frame: CoordinateFrame,
    ) -> Result<Self, InputError> {
        ensure_finite(id, location)?;
        let converted = frame.to_wgs84(location);
        ensure_finite(id, converted)?;
        Ok(Self {
            id,
            category,
            location: converted,
            name: None,
        })
    }

    /// Classify a raw tagged feature and build it.
    ///
    /// The `name` tag, when present and non-empty, becomes the display name.
    ///
    /// # Errors
    /// See [`PointFeature::new`].
    pub fn from_tags(
        id: u64,
        location: Coord<f64>,
        tags: &Tags,
        frame: CoordinateFrame,
    ) -> Result<Self, InputError> {
        let feature = Self::new(id, category_of(tags), location, frame)?;
        Ok(match tags.get("name").filter(|n| !n.trim().is_empty()) {
            Some(name) => feature.with_name(name.clone()),
            None => feature,
        })
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

fn ensure_finite(id: u64, location: Coord<f64>) -> Result<(), InputError> {
    if location.x.is_finite() && location.y.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFiniteCoordinate {
            owner: format!("point {id}"),
            x: location.x,
            y: location.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    #[case(f64::NEG_INFINITY, 1.0)]
    fn rejects_non_finite_coordinates(#[case] x: f64, #[case] y: f64) {
        let err = PointFeature::new(1, Category::Park, Coord { x, y }, CoordinateFrame::Wgs84)
            .expect_err("non-finite coordinate");
        assert!(matches!(err, InputError::NonFiniteCoordinate { .. }));
    }

    #[rstest]
    fn converts_mercator_location() {
        let feature = PointFeature::new(
            1,
            Category::Mall,
            Coord { x: 111_319.49, y: 0.0 },
            CoordinateFrame::WebMercator,
        )
        .expect("valid");
        assert!((feature.location.x - 1.0).abs() < 1e-6);
    }

    #[rstest]
    fn from_tags_classifies_and_names() {
        let tags = Tags::from([
            ("amenity".to_owned(), "hospital".to_owned()),
            ("name".to_owned(), "General".to_owned()),
        ]);
        let feature = PointFeature::from_tags(3, Coord { x: 0.0, y: 0.0 }, &tags, CoordinateFrame::Wgs84)
            .expect("valid");
        assert_eq!(feature.category, Category::Hospital);
        assert_eq!(feature.name.as_deref(), Some("General"));
    }

    #[rstest]
    fn unknown_tags_become_other() {
        let tags = Tags::from([("name".to_owned(), "   ".to_owned())]);
        let feature = PointFeature::from_tags(4, Coord { x: 0.0, y: 0.0 }, &tags, CoordinateFrame::Wgs84)
            .expect("valid");
        assert_eq!(feature.category, Category::Other);
        assert!(feature.name.is_none());
    }
}
