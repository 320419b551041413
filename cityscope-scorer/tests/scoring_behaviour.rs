//! Behavioural tests for the composite scorer and candidate filter.

use cityscope_core::{MetricRow, MetricTable};
use cityscope_scorer::{CandidateFilter, ScoreTable, ScoreWeights, ScoringError, score};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::collections::BTreeMap;

fn row(id: &str, rent: f64) -> MetricRow {
    MetricRow {
        region_id: id.into(),
        name: id.into(),
        city: None,
        area_km2: 1.0,
        counts: BTreeMap::new(),
        rent: Some(rent),
        population: None,
        attributes: BTreeMap::new(),
    }
}

#[fixture]
fn table() -> RefCell<MetricTable> {
    RefCell::new(MetricTable::default())
}

#[fixture]
fn weights() -> RefCell<ScoreWeights> {
    RefCell::new(ScoreWeights::default())
}

#[fixture]
fn scored() -> RefCell<Option<ScoreTable>> {
    RefCell::new(None)
}

#[fixture]
fn filtered() -> RefCell<Option<Result<ScoreTable, ScoringError>>> {
    RefCell::new(None)
}

#[given("three regions with rents 1000, 1500 and 2000")]
fn given_regions(#[from(table)] table: &RefCell<MetricTable>) {
    *table.borrow_mut() = MetricTable::from_rows(vec![
        row("middle", 1500.0),
        row("dear", 2000.0),
        row("cheap", 1000.0),
    ]);
}

#[given("weights that only value rent")]
fn given_rent_weights(#[from(weights)] weights: &RefCell<ScoreWeights>) {
    *weights.borrow_mut() = ScoreWeights {
        rent: 1.0,
        ..ScoreWeights::ZERO
    };
}

#[given("weights that are all zero")]
fn given_zero_weights(#[from(weights)] weights: &RefCell<ScoreWeights>) {
    *weights.borrow_mut() = ScoreWeights::ZERO;
}

#[when("I score the regions")]
fn when_score(
    #[from(table)] table: &RefCell<MetricTable>,
    #[from(weights)] weights: &RefCell<ScoreWeights>,
    #[from(scored)] scored: &RefCell<Option<ScoreTable>>,
) {
    let result = score(&table.borrow(), &weights.borrow()).expect("valid weights");
    *scored.borrow_mut() = Some(result);
}

#[when("I keep only regions with rent below 500")]
fn when_filter(
    #[from(scored)] scored: &RefCell<Option<ScoreTable>>,
    #[from(filtered)] filtered: &RefCell<Option<Result<ScoreTable, ScoringError>>>,
) {
    let filter = CandidateFilter {
        max_rent: Some(500.0),
        ..CandidateFilter::default()
    };
    let scored = scored.borrow();
    *filtered.borrow_mut() = Some(filter.apply(scored.as_ref().expect("scored")));
}

#[then("the region with rent 1000 ranks first")]
fn then_cheap_first(#[from(scored)] scored: &RefCell<Option<ScoreTable>>) {
    let scored = scored.borrow();
    let table = scored.as_ref().expect("scored");
    assert_eq!(table.ranking().first(), Some(&"cheap"));
    let composites: Vec<f64> = table.iter().map(|r| r.composite).collect();
    assert_eq!(composites, [100.0, 50.0, 0.0]);
}

#[then("every composite score is zero")]
fn then_all_zero(#[from(scored)] scored: &RefCell<Option<ScoreTable>>) {
    let scored = scored.borrow();
    let table = scored.as_ref().expect("scored");
    assert!(table.iter().all(|r| r.composite == 0.0));
}

#[then("the candidate set is reported empty")]
fn then_empty(#[from(filtered)] filtered: &RefCell<Option<Result<ScoreTable, ScoringError>>>) {
    let filtered = filtered.borrow();
    assert_eq!(
        filtered.as_ref().expect("filter applied"),
        &Err(ScoringError::EmptyCandidateSet)
    );
}

#[scenario(path = "tests/features/scoring.feature", index = 0)]
fn rent_only_weights(
    table: RefCell<MetricTable>,
    weights: RefCell<ScoreWeights>,
    scored: RefCell<Option<ScoreTable>>,
    filtered: RefCell<Option<Result<ScoreTable, ScoringError>>>,
) {
    let _ = (table, weights, scored, filtered);
}

#[scenario(path = "tests/features/scoring.feature", index = 1)]
fn zero_weights(
    table: RefCell<MetricTable>,
    weights: RefCell<ScoreWeights>,
    scored: RefCell<Option<ScoreTable>>,
    filtered: RefCell<Option<Result<ScoreTable, ScoringError>>>,
) {
    let _ = (table, weights, scored, filtered);
}

#[scenario(path = "tests/features/scoring.feature", index = 2)]
fn empty_candidate_set(
    table: RefCell<MetricTable>,
    weights: RefCell<ScoreWeights>,
    scored: RefCell<Option<ScoreTable>>,
    filtered: RefCell<Option<Result<ScoreTable, ScoringError>>>,
) {
    let _ = (table, weights, scored, filtered);
}
