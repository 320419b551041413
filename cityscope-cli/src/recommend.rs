//! Recommend command implementation for the CityScope CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use cityscope_scorer::{Recommendation, rerank};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::score::{
    WeightOverrides, require_existing, score_request, scoring_failure, write_json,
};
use crate::{
    ARG_QUERY, ARG_REQUEST, ARG_TOP_N, ARG_WEIGHT_AMENITIES, ARG_WEIGHT_RENT, ARG_WEIGHT_SCHOOLS,
    ARG_WEIGHT_SIZE, ARG_WEIGHT_TRANSIT, CliError, ENV_RECOMMEND_QUERY, ENV_RECOMMEND_REQUEST,
};

/// Number of regions returned when `--top-n` is not given.
pub(crate) const DEFAULT_TOP_N: usize = 5;

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a JSON scoring request, then re-rank the regions for \
                 a free-text description. Recognised keywords such as \
                 \"cheap\", \"family\" or \"near transit\" boost the matching \
                 dimensions, and the output explains which were used.",
    about = "Recommend regions for a free-text description"
)]
#[ortho_config(prefix = "CITYSCOPE")]
pub(crate) struct RecommendArgs {
    /// Path to a JSON file containing a scoring request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Free-text description of what the user is looking for.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Number of regions to return.
    #[arg(long = ARG_TOP_N, value_name = "count")]
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    /// Weight of affordability (lower rent scores higher).
    #[arg(long = ARG_WEIGHT_RENT, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_rent: Option<f64>,
    /// Weight of transit stop density.
    #[arg(long = ARG_WEIGHT_TRANSIT, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_transit: Option<f64>,
    /// Weight of amenity density.
    #[arg(long = ARG_WEIGHT_AMENITIES, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_amenities: Option<f64>,
    /// Weight of neighbourhood size (population).
    #[arg(long = ARG_WEIGHT_SIZE, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_size: Option<f64>,
    /// Weight of school density.
    #[arg(long = ARG_WEIGHT_SCHOOLS, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_schools: Option<f64>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecommendConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) query: String,
    pub(crate) top_n: usize,
    pub(crate) weights: WeightOverrides,
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_RECOMMEND_REQUEST,
        })?;
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_RECOMMEND_QUERY,
        })?;
        Ok(Self {
            request_path,
            query,
            top_n: args.top_n.unwrap_or(DEFAULT_TOP_N),
            weights: WeightOverrides {
                rent: args.weight_rent,
                transit: args.weight_transit,
                amenities: args.weight_amenities,
                size: args.weight_size,
                schools: args.weight_schools,
            },
        })
    }
}

/// JSON document printed by `recommend`.
#[derive(Debug, Serialize)]
struct RecommendOutput<'a> {
    unassigned_points: usize,
    query: &'a str,
    #[serde(flatten)]
    recommendation: &'a Recommendation,
}

pub(super) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &mut stdout)
}

pub(super) fn run_recommend_with(
    args: RecommendArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.request_path, ARG_REQUEST)?;
    let (evaluation, table) = score_request(&config.request_path, config.weights)?;
    let recommendation = rerank(&table, &config.query, config.top_n)
        .map_err(|source| scoring_failure(&config.request_path, source))?;
    log::info!(
        "recommending {} regions for {:?}",
        recommendation.ranked.len(),
        config.query
    );
    let output = RecommendOutput {
        unassigned_points: evaluation.unassigned_points,
        query: &config.query,
        recommendation: &recommendation,
    };
    write_json(writer, &output)
}
