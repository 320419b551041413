//! Keyword intents recognised in free-text requests.
//!
//! This is a fixed lookup table, not language understanding: an intent is
//! active when any of its keywords occurs as a substring of the lower-cased
//! text. The same text always yields the same intents in table order.

use std::fmt;

use crate::Dimension;

/// A preference inferred from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Intent {
    /// Cheaper rent.
    Budget,
    /// Amenities and larger neighbourhoods.
    Family,
    /// Affordability, transit and amenities together.
    Student,
    /// Transit access.
    Transit,
    /// Food and nightlife, approximated by amenity density.
    Restaurants,
    /// Green space, approximated by amenity density.
    Parks,
    /// Smaller, calmer neighbourhoods.
    Quiet,
}

impl Intent {
    /// Every intent in table order.
    pub const ALL: [Self; 7] = [
        Self::Budget,
        Self::Family,
        Self::Student,
        Self::Transit,
        Self::Restaurants,
        Self::Parks,
        Self::Quiet,
    ];

    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Family => "family",
            Self::Student => "student",
            Self::Transit => "transit",
            Self::Restaurants => "restaurants",
            Self::Parks => "parks",
            Self::Quiet => "quiet",
        }
    }

    /// Lower-case keywords that activate the intent.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Budget => &["cheap", "affordable", "budget", "low rent", "expensive"],
            Self::Family => &["family", "kids", "children", "school"],
            Self::Student => &["student", "university", "college"],
            Self::Transit => &[
                "transit", "skytrain", "bus", "no car", "car-free", "walkable", "walk",
            ],
            Self::Restaurants => &[
                "restaurant",
                "food",
                "cafe",
                "coffee",
                "nightlife",
                "bar",
            ],
            Self::Parks => &["park", "green", "nature", "outdoor"],
            Self::Quiet => &["quiet", "calm", "peaceful", "not busy", "less crowded"],
        }
    }

    /// Multipliers applied to normalized dimension scores and added to the
    /// composite. Negative values penalize.
    #[must_use]
    pub const fn adjustments(self) -> &'static [(Dimension, f64)] {
        match self {
            Self::Budget => &[(Dimension::Affordability, 0.4)],
            Self::Family => &[(Dimension::Amenities, 0.3), (Dimension::Size, 0.2)],
            Self::Student => &[
                (Dimension::Affordability, 0.3),
                (Dimension::Transit, 0.3),
                (Dimension::Amenities, 0.2),
            ],
            Self::Transit => &[(Dimension::Transit, 0.4)],
            Self::Restaurants => &[(Dimension::Amenities, 0.3)],
            Self::Parks => &[(Dimension::Amenities, 0.2)],
            Self::Quiet => &[(Dimension::Size, -0.2)],
        }
    }

    /// Fixed rationale sentence, without the bullet.
    #[must_use]
    pub const fn rationale(self) -> &'static str {
        match self {
            Self::Budget => "I prioritized cheaper rent.",
            Self::Family => {
                "I boosted areas with more amenities and larger neighbourhood size (better for families)."
            }
            Self::Student => {
                "I focused on affordability, transit access, and amenities for a student lifestyle."
            }
            Self::Transit => "I preferred neighbourhoods with more transit stops.",
            Self::Restaurants => {
                "I preferred neighbourhoods with richer amenity density (restaurants, cafes, etc.)."
            }
            Self::Parks => {
                "I slightly favoured neighbourhoods that are richer in amenities, including parks."
            }
            Self::Quiet => {
                "I slightly down-ranked the most dense / busy neighbourhoods to keep things quieter."
            }
        }
    }

    /// Report whether `lowered` contains any keyword of this intent.
    fn matches(self, lowered: &str) -> bool {
        self.keywords().iter().any(|keyword| lowered.contains(keyword))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active intents for `text`, in table order.
///
/// # Examples
/// ```
/// use cityscope_scorer::{Intent, interpret};
///
/// assert_eq!(
///     interpret("Cheap student near TRANSIT"),
///     vec![Intent::Budget, Intent::Student, Intent::Transit],
/// );
/// assert!(interpret("somewhere nice").is_empty());
/// ```
#[must_use]
pub fn interpret(text: &str) -> Vec<Intent> {
    let lowered = text.to_lowercase();
    Intent::ALL
        .into_iter()
        .filter(|intent| intent.matches(&lowered))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("family with kids", &[Intent::Family])]
    #[case("quiet place near a park", &[Intent::Parks, Intent::Quiet])]
    #[case("car-free, coffee and nightlife", &[Intent::Transit, Intent::Restaurants])]
    #[case("not too expensive", &[Intent::Budget])]
    #[case("University COLLEGE", &[Intent::Student])]
    fn recognises_keywords(#[case] text: &str, #[case] expected: &[Intent]) {
        assert_eq!(interpret(text), expected);
    }

    #[rstest]
    fn keywords_match_as_substrings() {
        // "barn" contains "bar".
        assert_eq!(interpret("a barn"), vec![Intent::Restaurants]);
    }

    #[rstest]
    fn keywords_are_lower_case() {
        for intent in Intent::ALL {
            for keyword in intent.keywords() {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }
}
