//! Focused unit tests covering CLI configuration and request handling.

use super::helpers::{RequestFile, region_ids, three_region_request};
use super::*;
use crate::recommend::{DEFAULT_TOP_N, RecommendConfig, run_recommend_with};
use crate::score::{ScoreConfig, WeightOverrides, run_score_with};
use cityscope_core::InputError;
use cityscope_scorer::{Dimension, FALLBACK_RATIONALE, ScoreWeights, ScoringError};
use rstest::rstest;
use serde_json::{Value, json};

fn score_args(file: &RequestFile) -> ScoreArgs {
    ScoreArgs {
        request_path: Some(file.path()),
        ..ScoreArgs::default()
    }
}

fn run_score_json(args: ScoreArgs) -> Value {
    let mut stdout = Vec::new();
    run_score_with(args, &mut stdout).expect("score succeeds");
    serde_json::from_slice(&stdout).expect("stdout is JSON")
}

#[rstest]
fn converting_score_without_request_errors() {
    let err = ScoreConfig::try_from(ScoreArgs::default()).expect_err("missing request");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_SCORE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_recommend_without_query_errors() {
    let args = RecommendArgs {
        request_path: Some("request.json".into()),
        ..RecommendArgs::default()
    };
    let err = RecommendConfig::try_from(args).expect_err("missing query");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_QUERY);
            assert_eq!(env, ENV_RECOMMEND_QUERY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn recommend_defaults_top_n() {
    let args = RecommendArgs {
        request_path: Some("request.json".into()),
        query: Some("cheap".into()),
        ..RecommendArgs::default()
    };
    let config = RecommendConfig::try_from(args).expect("config should build");
    assert_eq!(config.top_n, DEFAULT_TOP_N);
    assert_eq!(config.weights, WeightOverrides::default());
}

#[rstest]
fn overrides_replace_only_given_weights() {
    let overrides = WeightOverrides {
        transit: Some(0.9),
        schools: Some(0.1),
        ..WeightOverrides::default()
    };
    let weights = overrides.apply(ScoreWeights::default());
    assert_eq!(weights.weight(Dimension::Transit), 0.9);
    assert_eq!(weights.weight(Dimension::Schools), 0.1);
    assert_eq!(
        weights.weight(Dimension::Affordability),
        ScoreWeights::default().weight(Dimension::Affordability)
    );
}

#[rstest]
fn score_prints_ranked_table() {
    let file = RequestFile::with_json(&three_region_request());
    let output = run_score_json(score_args(&file));

    assert_eq!(output["unassigned_points"], json!(1));
    assert_eq!(region_ids(&output["regions"]), ["west", "centre", "east"]);
    assert_eq!(output["regions"][0]["rank"], json!(1));
    assert_eq!(output["regions"][0]["composite"], json!(100.0));
    assert_eq!(output["regions"][2]["metrics"]["rent"], json!(3000.0));
}

#[rstest]
fn command_line_weights_override_the_request() {
    let file = RequestFile::with_json(&three_region_request());
    let args = ScoreArgs {
        weight_rent: Some(0.0),
        weight_size: Some(1.0),
        ..score_args(&file)
    };
    let output = run_score_json(args);
    assert_eq!(region_ids(&output["regions"]), ["east", "centre", "west"]);
    assert_eq!(output["weights"]["size"], json!(1.0));
}

#[rstest]
fn request_filter_narrows_without_rescoring() {
    let mut request = three_region_request();
    request["filter"] = json!({ "city": "vancouver" });
    let file = RequestFile::with_json(&request);
    let output = run_score_json(score_args(&file));

    assert_eq!(region_ids(&output["regions"]), ["west", "east"]);
    assert_eq!(output["regions"][1]["rank"], json!(2));
    assert_eq!(output["regions"][1]["composite"], json!(0.0));
}

#[rstest]
fn missing_request_file_is_reported() {
    let file = RequestFile::new();
    let mut stdout = Vec::new();
    let err = run_score_with(score_args(&file), &mut stdout).expect_err("missing file");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, file.path());
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

#[rstest]
fn malformed_json_is_reported() {
    let file = RequestFile::new();
    file.write(b"{ not valid json");
    let err = run_score_with(score_args(&file), &mut Vec::new()).expect_err("bad json");
    assert!(matches!(err, CliError::ParseRequest { .. }));
}

#[rstest]
fn unknown_category_is_a_parse_error() {
    let mut request = three_region_request();
    request["points"][0]["category"] = json!("volcano");
    let file = RequestFile::with_json(&request);
    let err = run_score_with(score_args(&file), &mut Vec::new()).expect_err("bad category");
    assert!(matches!(err, CliError::ParseRequest { .. }));
}

#[rstest]
fn non_positive_area_is_invalid_input() {
    let mut request = three_region_request();
    request["regions"][0]["area_km2"] = json!(0.0);
    let file = RequestFile::with_json(&request);
    let err = run_score_with(score_args(&file), &mut Vec::new()).expect_err("zero area");
    match err {
        CliError::InvalidInput { source, .. } => assert_eq!(
            source,
            InputError::NonPositiveArea {
                region_id: "east".into(),
                area_km2: 0.0,
            }
        ),
        other => panic!("expected InvalidInput, found {other:?}"),
    }
}

#[rstest]
fn negative_population_is_invalid_input() {
    let mut request = three_region_request();
    request["regions"][1]["population"] = json!(-5.0);
    let file = RequestFile::with_json(&request);
    let err = run_score_with(score_args(&file), &mut Vec::new()).expect_err("bad population");
    match err {
        CliError::InvalidInput { source, .. } => assert_eq!(
            source,
            InputError::InvalidPopulation {
                region_id: "west".into(),
                population: -5.0,
            }
        ),
        other => panic!("expected InvalidInput, found {other:?}"),
    }
}

#[rstest]
fn negative_weight_is_a_scoring_error() {
    let file = RequestFile::with_json(&three_region_request());
    let args = ScoreArgs {
        weight_transit: Some(-1.0),
        ..score_args(&file)
    };
    let err = run_score_with(args, &mut Vec::new()).expect_err("negative weight");
    match err {
        CliError::Scoring { source, .. } => assert!(matches!(
            source,
            ScoringError::InvalidWeight {
                dimension: Dimension::Transit,
                ..
            }
        )),
        other => panic!("expected Scoring, found {other:?}"),
    }
}

#[rstest]
fn filter_rejecting_everything_is_empty_candidate_set() {
    let mut request = three_region_request();
    request["filter"] = json!({ "max_rent": 500.0 });
    let file = RequestFile::with_json(&request);
    let err = run_score_with(score_args(&file), &mut Vec::new()).expect_err("empty set");
    assert!(matches!(err, CliError::EmptyCandidateSet { .. }));
}

#[rstest]
fn recommend_prints_ranked_subset_and_rationale() {
    let file = RequestFile::with_json(&three_region_request());
    let args = RecommendArgs {
        request_path: Some(file.path()),
        query: Some("somewhere nice".into()),
        top_n: Some(2),
        ..RecommendArgs::default()
    };
    let mut stdout = Vec::new();
    run_recommend_with(args, &mut stdout).expect("recommend succeeds");
    let output: Value = serde_json::from_slice(&stdout).expect("stdout is JSON");

    let ranked = output["ranked"].as_array().expect("ranked array");
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["region"]["metrics"]["region_id"], json!("west"));
    assert_eq!(output["intents"], json!([]));
    let rationale = output["rationale"].as_str().expect("rationale text");
    assert!(rationale.ends_with(FALLBACK_RATIONALE));
    assert_eq!(output["query"], json!("somewhere nice"));
}
