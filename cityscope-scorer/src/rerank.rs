//! Intent-driven re-ranking with a templated rationale.

use crate::{Intent, ScoreTable, ScoredRegion, ScoringError, interpret};

/// First line of every rationale.
pub const RATIONALE_HEADER: &str =
    "Based on your description, here's how I interpreted your needs:";

/// Sentence used when no intent is active.
pub const FALLBACK_RATIONALE: &str =
    "I used your current weights and overall score to find the best matches.";

const BULLET: &str = "• ";

/// A scored region with its intent-adjusted score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedRegion {
    /// The region as scored by the composite scorer.
    pub region: ScoredRegion,
    /// Composite plus the active intents' adjustments.
    pub adjusted_score: f64,
}

/// Output of [`rerank`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendation {
    /// Intents recognised in the request text, in table order.
    pub intents: Vec<Intent>,
    /// Best regions by adjusted score, at most `top_n` of them.
    pub ranked: Vec<RankedRegion>,
    /// Header, blank line and one bullet per intent.
    pub rationale: String,
}

impl Recommendation {
    /// Bullet sentences of the rationale, without the header.
    #[must_use]
    pub fn bullets(&self) -> Vec<&str> {
        self.rationale
            .lines()
            .filter_map(|line| line.strip_prefix(BULLET))
            .collect()
    }
}

/// Adjusted score of one region under `intents`.
///
/// Contributions accumulate additively; an empty intent list returns the
/// composite unchanged.
#[expect(
    clippy::float_arithmetic,
    reason = "intent adjustments are additive score offsets"
)]
#[must_use]
pub fn adjusted_score(region: &ScoredRegion, intents: &[Intent]) -> f64 {
    intents
        .iter()
        .flat_map(|intent| intent.adjustments())
        .fold(region.composite, |acc, &(dimension, factor)| {
            acc + factor * region.score(dimension)
        })
}

/// Rationale text for the given active intents.
#[must_use]
pub fn rationale(intents: &[Intent]) -> String {
    let sentences: Vec<&str> = if intents.is_empty() {
        vec![FALLBACK_RATIONALE]
    } else {
        intents.iter().map(|intent| intent.rationale()).collect()
    };
    let bullets: Vec<String> = sentences
        .into_iter()
        .map(|sentence| format!("{BULLET}{sentence}"))
        .collect();
    format!("{RATIONALE_HEADER}\n\n{}", bullets.join("\n"))
}

/// Re-rank `table` by the intents found in `text` and keep the best `top_n`.
///
/// Ties on the adjusted score keep metric table input order. A `top_n` of
/// zero yields no regions but still explains the interpretation.
///
/// # Errors
/// Returns [`ScoringError::EmptyCandidateSet`] when `table` has no rows.
///
/// # Examples
/// ```
/// use cityscope_scorer::{ScoreTable, ScoringError, rerank};
///
/// assert_eq!(
///     rerank(&ScoreTable::default(), "cheap", 5),
///     Err(ScoringError::EmptyCandidateSet),
/// );
/// ```
pub fn rerank(
    table: &ScoreTable,
    text: &str,
    top_n: usize,
) -> Result<Recommendation, ScoringError> {
    if table.is_empty() {
        return Err(ScoringError::EmptyCandidateSet);
    }
    let intents = interpret(text);
    log::debug!("recognised intents {intents:?}");

    let mut ranked: Vec<RankedRegion> = table
        .iter()
        .map(|region| RankedRegion {
            adjusted_score: adjusted_score(region, &intents),
            region: region.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.adjusted_score
            .total_cmp(&a.adjusted_score)
            .then(a.region.input_index.cmp(&b.region.input_index))
    });
    ranked.truncate(top_n);

    Ok(Recommendation {
        rationale: rationale(&intents),
        intents,
        ranked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dimension, ScoreWeights, score};
    use cityscope_core::{Category, MetricRow, MetricTable};
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;

    fn row(id: &str, rent: f64, transit: u32, population: f64) -> MetricRow {
        MetricRow {
            region_id: id.into(),
            name: id.into(),
            city: None,
            area_km2: 1.0,
            counts: BTreeMap::from([(Category::Transit, transit)]),
            rent: Some(rent),
            population: Some(population),
            attributes: BTreeMap::new(),
        }
    }

    #[fixture]
    fn scored() -> ScoreTable {
        let table = MetricTable::from_rows(vec![
            row("busy", 1800.0, 40, 60_000.0),
            row("cheap", 1000.0, 5, 20_000.0),
            row("central", 1600.0, 30, 40_000.0),
        ]);
        let weights = ScoreWeights {
            size: 1.0,
            ..ScoreWeights::ZERO
        };
        score(&table, &weights).expect("valid weights")
    }

    #[rstest]
    fn no_intents_keep_composite_order(scored: ScoreTable) {
        let rec = rerank(&scored, "somewhere nice", 10).expect("non-empty");
        assert!(rec.intents.is_empty());
        let ids: Vec<_> = rec.ranked.iter().map(|r| r.region.region_id()).collect();
        assert_eq!(ids, scored.ranking());
        assert_eq!(rec.bullets(), [FALLBACK_RATIONALE]);
        for ranked in &rec.ranked {
            assert_eq!(ranked.adjusted_score, ranked.region.composite);
        }
    }

    #[rstest]
    fn budget_adds_affordability_bonus(scored: ScoreTable) {
        let rec = rerank(&scored, "something cheap", 3).expect("non-empty");
        for ranked in &rec.ranked {
            let expected =
                ranked.region.composite + 0.4 * ranked.region.score(Dimension::Affordability);
            assert!((ranked.adjusted_score - expected).abs() < 1e-9);
        }
        let ids: Vec<_> = rec.ranked.iter().map(|r| r.region.region_id()).collect();
        assert_eq!(ids, ["busy", "central", "cheap"]);
        let cheap = rec.ranked.last().expect("three regions");
        assert!((cheap.adjusted_score - 40.0).abs() < 1e-9);
    }

    #[rstest]
    fn quiet_penalizes_size(scored: ScoreTable) {
        let rec = rerank(&scored, "quiet", 3).expect("non-empty");
        let busy = rec
            .ranked
            .iter()
            .find(|r| r.region.region_id() == "busy")
            .expect("busy present");
        assert!((busy.adjusted_score - 80.0).abs() < 1e-9);
    }

    #[rstest]
    fn three_intents_give_three_bullets(scored: ScoreTable) {
        let rec = rerank(&scored, "cheap student near transit", 5).expect("non-empty");
        assert_eq!(rec.intents, [Intent::Budget, Intent::Student, Intent::Transit]);
        assert_eq!(
            rec.bullets(),
            [
                Intent::Budget.rationale(),
                Intent::Student.rationale(),
                Intent::Transit.rationale(),
            ]
        );
        assert!(rec.rationale.starts_with(RATIONALE_HEADER));
    }

    #[rstest]
    fn zero_top_n_still_explains(scored: ScoreTable) {
        let rec = rerank(&scored, "cheap", 0).expect("non-empty");
        assert!(rec.ranked.is_empty());
        assert_eq!(rec.bullets().len(), 1);
    }

    #[rstest]
    fn rerank_is_deterministic(scored: ScoreTable) {
        let text = "family near parks with coffee";
        assert_eq!(rerank(&scored, text, 3), rerank(&scored, text, 3));
    }

    #[rstest]
    fn rationale_layout() {
        assert_eq!(
            rationale(&[Intent::Transit]),
            format!("{RATIONALE_HEADER}\n\n• {}", Intent::Transit.rationale())
        );
    }
}
