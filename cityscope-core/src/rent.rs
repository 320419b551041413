//! Rent observations and their reduction to one value per region.
//!
//! Observations arrive as long-format rows keyed by bedroom type and year.
//! A scoring run picks one [`RentKey`], averages the matching rows per
//! region, and optionally fills gaps with the median of what was observed.

use std::collections::BTreeMap;

/// One observed average rent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RentObservation {
    /// Region the observation belongs to.
    pub region_id: String,
    /// Survey year.
    pub year: u16,
    /// Bedroom type label, e.g. `"1br"` or `"bachelor"`.
    pub bed_type: String,
    /// Average monthly rent.
    pub avg_rent: f64,
}

/// Selector for the observations used in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RentKey {
    /// Bedroom type to keep.
    pub bed_type: String,
    /// Year to keep.
    pub year: u16,
}

/// One rent per region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionRents {
    rents: BTreeMap<String, f64>,
}

impl RegionRents {
    /// Rent for a region, if any.
    #[must_use]
    pub fn get(&self, region_id: &str) -> Option<f64> {
        self.rents.get(region_id).copied()
    }

    /// Number of regions with a rent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rents.len()
    }

    /// Report whether no region has a rent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rents.is_empty()
    }

    /// Median of the held rents, averaging the middle pair for even counts.
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        let mut values: Vec<f64> = self.rents.values().copied().collect();
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        match values.len() {
            0 => None,
            n if n % 2 == 1 => values.get(mid).copied(),
            _ => match (values.get(mid - 1), values.get(mid)) {
                (Some(lo), Some(hi)) => Some(f64::midpoint(*lo, *hi)),
                _ => None,
            },
        }
    }

    /// Give every listed region without a rent the median observed rent.
    ///
    /// When nothing was observed the rents stay empty and the rent dimension
    /// scores neutrally downstream.
    #[must_use]
    pub fn fill_missing<'a, I>(mut self, region_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some(median) = self.median() else {
            return self;
        };
        for id in region_ids {
            self.rents.entry(id.to_owned()).or_insert(median);
        }
        self
    }
}

/// Average the observations matching `key` per region.
///
/// Non-finite rents are skipped with a warning.
///
/// # Examples
/// ```
/// use cityscope_core::{RentKey, RentObservation, select_rents};
///
/// let rows = vec![
///     RentObservation { region_id: "a".into(), year: 2024, bed_type: "1br".into(), avg_rent: 1000.0 },
///     RentObservation { region_id: "a".into(), year: 2024, bed_type: "1br".into(), avg_rent: 1200.0 },
///     RentObservation { region_id: "a".into(), year: 2023, bed_type: "1br".into(), avg_rent: 900.0 },
/// ];
/// let key = RentKey { bed_type: "1br".into(), year: 2024 };
/// assert_eq!(select_rents(&rows, &key).get("a"), Some(1100.0));
/// ```
#[must_use]
pub fn select_rents(observations: &[RentObservation], key: &RentKey) -> RegionRents {
    let mut sums: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for obs in observations
        .iter()
        .filter(|obs| obs.year == key.year && obs.bed_type == key.bed_type)
    {
        if !obs.avg_rent.is_finite() {
            log::warn!(
                "skipping non-finite rent for region {} ({} {})",
                obs.region_id,
                obs.bed_type,
                obs.year
            );
            continue;
        }
        let entry = sums.entry(obs.region_id.clone()).or_insert((0.0, 0));
        entry.0 += obs.avg_rent;
        entry.1 += 1;
    }
    RegionRents {
        rents: sums
            .into_iter()
            .map(|(id, (sum, n))| (id, sum / f64::from(n)))
            .collect(),
    }
}
