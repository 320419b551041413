//! Score command implementation for the CityScope CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use cityscope_scorer::{Dimension, ScoreTable, ScoreWeights, ScoredRegion, ScoringError, score};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};

use crate::fs::{file_is_file, open_utf8_file};
use crate::request::{Evaluation, ScoringRequest};
use crate::{
    ARG_REQUEST, ARG_WEIGHT_AMENITIES, ARG_WEIGHT_RENT, ARG_WEIGHT_SCHOOLS, ARG_WEIGHT_SIZE,
    ARG_WEIGHT_TRANSIT, CliError, ENV_SCORE_REQUEST,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score the regions of a JSON scoring request. Points are \
                 assigned to regions, counted per category and turned into \
                 densities; rents are selected for the request's rent key; \
                 every dimension is normalized across the regions and \
                 combined with the configured weights.",
    about = "Score and rank the regions of a request"
)]
#[ortho_config(prefix = "CITYSCOPE")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing a scoring request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
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

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Per-dimension weights given on the command line or in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct WeightOverrides {
    pub(crate) rent: Option<f64>,
    pub(crate) transit: Option<f64>,
    pub(crate) amenities: Option<f64>,
    pub(crate) size: Option<f64>,
    pub(crate) schools: Option<f64>,
}

impl WeightOverrides {
    /// Replace the weights of `base` that have an override.
    pub(crate) fn apply(self, base: ScoreWeights) -> ScoreWeights {
        [
            (Dimension::Affordability, self.rent),
            (Dimension::Transit, self.transit),
            (Dimension::Amenities, self.amenities),
            (Dimension::Size, self.size),
            (Dimension::Schools, self.schools),
        ]
        .into_iter()
        .fold(base, |weights, (dimension, value)| match value {
            Some(weight) => weights.with(dimension, weight),
            None => weights,
        })
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Weights overriding those in the request file.
    pub(crate) weights: WeightOverrides,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_SCORE_REQUEST,
        })?;
        Ok(Self {
            request_path,
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

/// JSON document printed by `score`.
#[derive(Debug, Serialize)]
struct ScoreOutput<'a> {
    unassigned_points: usize,
    weights: Option<&'a ScoreWeights>,
    regions: &'a [ScoredRegion],
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

pub(super) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let (evaluation, table) = score_request(&config.request_path, config.weights)?;
    let output = ScoreOutput {
        unassigned_points: evaluation.unassigned_points,
        weights: table.weights(),
        regions: table.rows(),
    };
    write_json(writer, &output)
}

/// Load, evaluate, score and filter a request.
pub(crate) fn score_request(
    path: &Utf8Path,
    overrides: WeightOverrides,
) -> Result<(Evaluation, ScoreTable), CliError> {
    let request = load_request(path)?;
    let evaluation = request
        .evaluate()
        .map_err(|source| CliError::InvalidInput {
            path: path.to_path_buf(),
            source,
        })?;
    let weights = overrides.apply(request.base_weights());
    let scoring_error = |source: ScoringError| scoring_failure(path, source);
    let scored = score(&evaluation.table, &weights).map_err(scoring_error)?;
    let table = if request.filter.is_empty() {
        scored
    } else {
        request.filter.apply(&scored).map_err(scoring_error)?
    };
    Ok((evaluation, table))
}

pub(crate) fn scoring_failure(path: &Utf8Path, source: ScoringError) -> CliError {
    match source {
        ScoringError::EmptyCandidateSet => CliError::EmptyCandidateSet {
            path: path.to_path_buf(),
        },
        other => CliError::Scoring {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

/// Loads a JSON-encoded [`ScoringRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<ScoringRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
