//! Min-max rescaling onto the `0.0..=100.0` score scale.
//!
//! Bounds are always taken from the values passed in, so narrowing the
//! candidate set before normalizing changes every score. That is the
//! intended behaviour: a score says how a region compares with the other
//! candidates in the same call, not with some global reference.

/// Upper end of the score scale.
pub const SCALE_MAX: f64 = 100.0;

/// Score given when a metric carries no discriminating information: every
/// value equal, or the value missing altogether.
pub const MIDPOINT: f64 = 50.0;

/// Whether larger raw values are preferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Larger raw values score higher.
    HigherIsBetter,
    /// Smaller raw values score higher, as with rent.
    LowerIsBetter,
}

/// Rescale `values` onto `0.0..=100.0`.
///
/// When every finite value is equal the result is [`MIDPOINT`] throughout.
/// Non-finite inputs also score [`MIDPOINT`] and do not move the bounds.
///
/// # Examples
/// ```
/// use cityscope_scorer::normalize;
///
/// assert_eq!(normalize(&[10.0, 20.0, 30.0]), vec![0.0, 50.0, 100.0]);
/// assert_eq!(normalize(&[7.0, 7.0]), vec![50.0, 50.0]);
/// ```
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let present: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    normalize_optional(&present, Direction::HigherIsBetter)
}

/// Rescale `values` so the smallest scores highest: `100 - normalize(values)`.
///
/// # Examples
/// ```
/// use cityscope_scorer::normalize_lower_is_better;
///
/// assert_eq!(normalize_lower_is_better(&[1000.0, 2000.0]), vec![100.0, 0.0]);
/// assert_eq!(normalize_lower_is_better(&[900.0]), vec![50.0]);
/// ```
#[must_use]
pub fn normalize_lower_is_better(values: &[f64]) -> Vec<f64> {
    let present: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    normalize_optional(&present, Direction::LowerIsBetter)
}

/// Rescale values that may be missing.
///
/// Missing and non-finite entries score [`MIDPOINT`]; the bounds come from
/// the finite entries alone.
#[must_use]
pub fn normalize_optional(values: &[Option<f64>], direction: Direction) -> Vec<f64> {
    let bounds = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        });
    values
        .iter()
        .map(|value| {
            value
                .filter(|v| v.is_finite())
                .zip(bounds)
                .map_or(MIDPOINT, |(v, (lo, hi))| rescale(v, lo, hi, direction))
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "min-max rescaling is inherently floating point"
)]
fn rescale(value: f64, lo: f64, hi: f64, direction: Direction) -> f64 {
    // Halved operands keep the differences finite across the whole f64 range.
    let range = hi / 2.0 - lo / 2.0;
    if range <= 0.0 {
        return MIDPOINT;
    }
    let scaled = ((value / 2.0 - lo / 2.0) / range * SCALE_MAX).clamp(0.0, SCALE_MAX);
    match direction {
        Direction::HigherIsBetter => scaled,
        Direction::LowerIsBetter => SCALE_MAX - scaled,
    }
}
