//! Point feature categories and the tag classifier that assigns them.
//!
//! The enum is closed: every feature lands in exactly one variant, and
//! anything the classifier does not recognise becomes [`Category::Other`]
//! rather than being dropped.
//!
//! # Examples
//! ```
//! use cityscope_core::Category;
//!
//! assert_eq!(Category::School.as_str(), "school");
//! assert_eq!(Category::Transit.to_string(), "transit");
//! ```

use std::collections::HashMap;

/// OpenStreetMap-style key/value tags attached to a raw feature.
pub type Tags = HashMap<String, String>;

/// Category of a point feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Category {
    /// Schools, colleges and universities.
    School,
    /// Bus stations, stops and rail stations.
    Transit,
    /// Public parks.
    Park,
    /// Shopping malls.
    Mall,
    /// Hospitals.
    Hospital,
    /// Restaurants, cafes and fast food.
    Restaurant,
    /// Supermarkets, convenience stores and greengrocers.
    Grocery,
    /// Anything the classifier does not recognise.
    Other,
}

impl Category {
    /// Categories that always receive an explicit count in a metric row.
    pub const SCORED: [Self; 7] = [
        Self::School,
        Self::Transit,
        Self::Park,
        Self::Mall,
        Self::Hospital,
        Self::Restaurant,
        Self::Grocery,
    ];

    /// Return the category as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use cityscope_core::Category;
    ///
    /// assert_eq!(Category::Grocery.as_str(), "grocery");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::School => "school",
            Self::Transit => "transit",
            Self::Park => "park",
            Self::Mall => "mall",
            Self::Hospital => "hospital",
            Self::Restaurant => "restaurant",
            Self::Grocery => "grocery",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Parse a category name. Plural and `_stops` spellings used by older
    /// exports are accepted alongside the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "school" | "schools" => Ok(Self::School),
            "transit" | "transit_stops" | "transit_stop" => Ok(Self::Transit),
            "park" | "parks" => Ok(Self::Park),
            "mall" | "malls" => Ok(Self::Mall),
            "hospital" | "hospitals" => Ok(Self::Hospital),
            "restaurant" | "restaurants" => Ok(Self::Restaurant),
            "grocery" | "groceries" => Ok(Self::Grocery),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// Classify a raw feature from its tags.
///
/// The rules are checked in a fixed order and the first match wins, so a
/// feature tagged both `amenity=school` and `leisure=park` is a school.
/// Unrecognised features are classified as [`Category::Other`].
///
/// # Examples
/// ```
/// use cityscope_core::{Category, Tags, category_of};
///
/// let tags = Tags::from([("amenity".to_owned(), "university".to_owned())]);
/// assert_eq!(category_of(&tags), Category::School);
/// assert_eq!(category_of(&Tags::new()), Category::Other);
/// ```
#[must_use]
pub fn category_of(tags: &Tags) -> Category {
    let value = |key: &str| tags.get(key).map(String::as_str);

    let amenity = value("amenity");
    let shop = value("shop");

    if matches!(amenity, Some("school" | "college" | "university")) {
        return Category::School;
    }
    if is_transit(tags) {
        return Category::Transit;
    }
    if amenity == Some("hospital") {
        return Category::Hospital;
    }
    if matches!(amenity, Some("restaurant" | "cafe" | "fast_food")) {
        return Category::Restaurant;
    }
    if shop == Some("mall") {
        return Category::Mall;
    }
    if matches!(shop, Some("supermarket" | "convenience" | "greengrocer")) {
        return Category::Grocery;
    }
    if value("leisure") == Some("park") {
        return Category::Park;
    }
    Category::Other
}

fn is_transit(tags: &Tags) -> bool {
    let value = |key: &str| tags.get(key).map(String::as_str);
    value("amenity") == Some("bus_station")
        || value("highway") == Some("bus_stop")
        || tags.contains_key("public_transport")
        || matches!(value("railway"), Some("station" | "halt" | "tram_stop"))
}
