//! Coordinate reference frames accepted at the input boundary.
//!
//! Every containment test runs in WGS84 (`x = longitude`, `y = latitude`).
//! Inputs supplied in another frame are converted once, when the owning
//! [`Region`](crate::Region) or [`PointFeature`](crate::PointFeature) is
//! built, and never again afterwards.

use geo::{Coord, MapCoords, MultiPolygon};

/// Equatorial radius of the WGS84 ellipsoid in metres, as used by EPSG:3857.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A supported source coordinate reference system.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cityscope_core::CoordinateFrame;
///
/// let origin = CoordinateFrame::WebMercator.to_wgs84(Coord { x: 0.0, y: 0.0 });
/// assert!(origin.x.abs() < 1e-12 && origin.y.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CoordinateFrame {
    /// EPSG:4326 longitude/latitude in degrees.
    #[default]
    Wgs84,
    /// EPSG:3857 spherical Mercator in metres.
    WebMercator,
}

impl CoordinateFrame {
    /// EPSG code of the frame.
    #[must_use]
    pub const fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
        }
    }

    /// Convert a coordinate expressed in this frame to WGS84.
    #[must_use]
    pub fn to_wgs84(self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Wgs84 => coord,
            Self::WebMercator => Coord {
                x: (coord.x / EARTH_RADIUS_M).to_degrees(),
                y: (2.0 * (coord.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
                    .to_degrees(),
            },
        }
    }

    /// Convert a WGS84 coordinate into this frame.
    #[must_use]
    pub fn from_wgs84(self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Wgs84 => coord,
            Self::WebMercator => Coord {
                x: coord.x.to_radians() * EARTH_RADIUS_M,
                y: (std::f64::consts::FRAC_PI_4 + coord.y.to_radians() / 2.0)
                    .tan()
                    .ln()
                    * EARTH_RADIUS_M,
            },
        }
    }

    /// Convert a whole polygon set from this frame to WGS84.
    #[must_use]
    pub fn polygons_to_wgs84(self, polygons: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        match self {
            Self::Wgs84 => polygons.clone(),
            Self::WebMercator => polygons.map_coords(|c| self.to_wgs84(c)),
        }
    }

    /// Convert a whole WGS84 polygon set into this frame.
    #[must_use]
    pub fn polygons_from_wgs84(self, polygons: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        match self {
            Self::Wgs84 => polygons.clone(),
            Self::WebMercator => polygons.map_coords(|c| self.from_wgs84(c)),
        }
    }
}
