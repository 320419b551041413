//! Small geometry builders shared by unit and behaviour tests.

use geo::{Coord, MultiPolygon, polygon};

use crate::{Category, CoordinateFrame, PointFeature, Region};

/// Axis-aligned WGS84 square with its lower-left corner at
/// `(min_x, min_y)`.
///
/// # Panics
/// Panics when the square is degenerate or non-finite.
#[must_use]
pub fn square_region(id: &str, min_x: f64, min_y: f64, side: f64) -> Region {
    let (max_x, max_y) = (min_x + side, min_y + side);
    let square = polygon![
        (x: min_x, y: min_y),
        (x: max_x, y: min_y),
        (x: max_x, y: max_y),
        (x: min_x, y: max_y),
    ];
    Region::from_polygon(id, id, square, CoordinateFrame::Wgs84)
        .unwrap_or_else(|err| panic!("test square {id} is invalid: {err}"))
}

/// Unit-degree square at `min_x` carrying a fixed surveyed area.
///
/// # Panics
/// Panics when `area_km2` is not positive and finite.
#[must_use]
pub fn region_with_area(id: &str, min_x: f64, area_km2: f64) -> Region {
    let square = polygon![
        (x: min_x, y: 0.0),
        (x: min_x + 1.0, y: 0.0),
        (x: min_x + 1.0, y: 1.0),
        (x: min_x, y: 1.0),
    ];
    Region::with_area(
        id,
        id,
        MultiPolygon::new(vec![square]),
        CoordinateFrame::Wgs84,
        area_km2,
    )
    .unwrap_or_else(|err| panic!("test region {id} is invalid: {err}"))
}

/// WGS84 point feature at `(x, y)`.
///
/// # Panics
/// Panics when a coordinate is non-finite.
#[must_use]
pub fn feature(id: u64, category: Category, x: f64, y: f64) -> PointFeature {
    PointFeature::new(id, category, Coord { x, y }, CoordinateFrame::Wgs84)
        .unwrap_or_else(|err| panic!("test point {id} is invalid: {err}"))
}
