//! Per-region metric table produced by the density aggregator.

use std::collections::BTreeMap;

use crate::{Category, RegionCategories, RegionRents, RegionSet};

/// Fixed grouping of categories into scored buckets.
///
/// The grouping is part of the scoring model and cannot be changed at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Bucket {
    /// Schools only.
    Schools,
    /// Transit stops and stations only.
    Transit,
    /// Everyday amenities: malls, parks, hospitals, restaurants and groceries.
    Amenities,
}

impl Bucket {
    /// Categories summed into the bucket.
    #[must_use]
    pub const fn categories(self) -> &'static [Category] {
        match self {
            Self::Schools => &[Category::School],
            Self::Transit => &[Category::Transit],
            Self::Amenities => &[
                Category::Mall,
                Category::Park,
                Category::Hospital,
                Category::Restaurant,
                Category::Grocery,
            ],
        }
    }
}

/// Raw and derived values for one region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricRow {
    /// Region identifier.
    pub region_id: String,
    /// Region display name.
    pub name: String,
    /// City label, if known.
    pub city: Option<String>,
    /// Area in square kilometres.
    pub area_km2: f64,
    /// Point counts for every category, zeros included.
    pub counts: BTreeMap<Category, u32>,
    /// Average monthly rent, if observed.
    pub rent: Option<f64>,
    /// Resident population, if known.
    pub population: Option<f64>,
    /// Extra raw metrics carried over from the region.
    pub attributes: BTreeMap<String, f64>,
}

impl MetricRow {
    /// Count for a category; zero when nothing was assigned.
    #[must_use]
    pub fn count(&self, category: Category) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Points of `category` per square kilometre.
    #[must_use]
    pub fn density(&self, category: Category) -> f64 {
        f64::from(self.count(category)) / self.area_km2
    }

    /// Summed count of the categories in `bucket`.
    #[must_use]
    pub fn bucket_count(&self, bucket: Bucket) -> u32 {
        bucket
            .categories()
            .iter()
            .map(|&category| self.count(category))
            .sum()
    }

    /// Summed points per square kilometre for `bucket`.
    #[must_use]
    pub fn bucket_density(&self, bucket: Bucket) -> f64 {
        f64::from(self.bucket_count(bucket)) / self.area_km2
    }

    /// Schools per square kilometre.
    #[must_use]
    pub fn schools_per_km2(&self) -> f64 {
        self.bucket_density(Bucket::Schools)
    }

    /// Transit stops per square kilometre.
    #[must_use]
    pub fn transit_per_km2(&self) -> f64 {
        self.bucket_density(Bucket::Transit)
    }

    /// Amenities per square kilometre.
    #[must_use]
    pub fn amenities_per_km2(&self) -> f64 {
        self.bucket_density(Bucket::Amenities)
    }
}

/// Metric rows in region input order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricTable {
    rows: Vec<MetricRow>,
}

impl MetricTable {
    /// Wrap pre-built rows.
    #[must_use]
    pub const fn from_rows(rows: Vec<MetricRow>) -> Self {
        Self { rows }
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// Iterate over rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, MetricRow> {
        self.rows.iter()
    }

    /// Look up the row for a region.
    #[must_use]
    pub fn get(&self, region_id: &str) -> Option<&MetricRow> {
        self.rows.iter().find(|row| row.region_id == region_id)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Set each row's rent from the selected observations. Rows without an
    /// observation keep no rent.
    #[must_use]
    pub fn with_rents(mut self, rents: &RegionRents) -> Self {
        for row in &mut self.rows {
            row.rent = rents.get(&row.region_id);
        }
        self
    }

    /// Keep only the rows whose id is in `ids`, preserving order.
    ///
    /// Re-scoring the result normalizes against the smaller candidate set,
    /// which changes every score.
    #[must_use]
    pub fn retain_ids<'a, I>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: Vec<&str> = ids.into_iter().collect();
        Self {
            rows: self
                .rows
                .iter()
                .filter(|row| wanted.contains(&row.region_id.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MetricTable {
    type Item = &'a MetricRow;
    type IntoIter = std::slice::Iter<'a, MetricRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Count assigned categories per region and derive densities.
///
/// Every region gets a row, and every category in
/// [`Category::SCORED`] plus [`Category::Other`] gets an explicit count.
/// Assignments naming unknown regions are ignored.
///
/// # Examples
/// ```
/// use geo::polygon;
/// use cityscope_core::{Category, CoordinateFrame, Region, RegionCategories, RegionSet, aggregate};
///
/// # fn main() -> Result<(), cityscope_core::InputError> {
/// let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
/// let regions = RegionSet::new(vec![
///     Region::from_polygon("a", "A", square, CoordinateFrame::Wgs84)?,
/// ])?;
/// let table = aggregate(&RegionCategories::new(), &regions);
/// assert_eq!(table.rows()[0].count(Category::School), 0);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn aggregate(assignment: &RegionCategories, regions: &RegionSet) -> MetricTable {
    let rows = regions
        .iter()
        .map(|region| {
            let mut counts: BTreeMap<Category, u32> = Category::SCORED
                .iter()
                .chain(std::iter::once(&Category::Other))
                .map(|&category| (category, 0))
                .collect();
            for category in assignment.get(region.id()).into_iter().flatten() {
                *counts.entry(*category).or_insert(0) += 1;
            }
            MetricRow {
                region_id: region.id().to_owned(),
                name: region.name().to_owned(),
                city: region.city().map(str::to_owned),
                area_km2: region.area_km2(),
                counts,
                rent: None,
                population: region.population(),
                attributes: region.attributes().clone(),
            }
        })
        .collect();
    MetricTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::region_with_area;
    use rstest::{fixture, rstest};

    #[fixture]
    fn two_regions() -> RegionSet {
        RegionSet::new(vec![
            region_with_area("A", 0.0, 2.0),
            region_with_area("B", 1.0, 1.0),
        ])
        .expect("unique ids")
    }

    #[rstest]
    fn school_density_divides_by_area(two_regions: RegionSet) {
        let assignment = RegionCategories::from([
            ("A".to_owned(), vec![Category::School; 4]),
            ("B".to_owned(), vec![Category::School; 2]),
        ]);
        let table = aggregate(&assignment, &two_regions);
        let a = table.get("A").expect("row A");
        let b = table.get("B").expect("row B");
        assert!((a.schools_per_km2() - 2.0).abs() < 1e-12);
        assert!((b.schools_per_km2() - 2.0).abs() < 1e-12);
    }

    #[rstest]
    fn empty_assignment_yields_zeros(two_regions: RegionSet) {
        let table = aggregate(&RegionCategories::new(), &two_regions);
        assert_eq!(table.len(), 2);
        for row in &table {
            for category in Category::SCORED {
                assert_eq!(row.counts.get(&category), Some(&0));
                assert!(row.density(category).abs() < f64::EPSILON);
            }
        }
    }

    #[rstest]
    fn amenities_bucket_sums_members(two_regions: RegionSet) {
        let assignment = RegionCategories::from([(
            "B".to_owned(),
            vec![
                Category::Mall,
                Category::Park,
                Category::Hospital,
                Category::School,
                Category::Other,
            ],
        )]);
        let table = aggregate(&assignment, &two_regions);
        let b = table.get("B").expect("row B");
        assert_eq!(b.bucket_count(Bucket::Amenities), 3);
        assert_eq!(b.count(Category::Other), 1);
        assert!((b.amenities_per_km2() - 3.0).abs() < 1e-12);
    }

    #[rstest]
    fn unknown_region_ids_are_ignored(two_regions: RegionSet) {
        let assignment = RegionCategories::from([("Z".to_owned(), vec![Category::Park])]);
        let table = aggregate(&assignment, &two_regions);
        assert!(table.iter().all(|row| row.count(Category::Park) == 0));
    }

    #[rstest]
    fn retain_ids_preserves_order(two_regions: RegionSet) {
        let table = aggregate(&RegionCategories::new(), &two_regions);
        let kept = table.retain_ids(["B"]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.rows()[0].region_id, "B");
    }
}
