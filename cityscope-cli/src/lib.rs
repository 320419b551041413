//! Command-line interface for scoring CityScope regions.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod recommend;
mod request;
mod score;

pub use error::CliError;

use recommend::RecommendArgs;
use score::ScoreArgs;

const ARG_REQUEST: &str = "request";
const ARG_QUERY: &str = "query";
const ARG_TOP_N: &str = "top-n";
const ARG_WEIGHT_RENT: &str = "weight-rent";
const ARG_WEIGHT_TRANSIT: &str = "weight-transit";
const ARG_WEIGHT_AMENITIES: &str = "weight-amenities";
const ARG_WEIGHT_SIZE: &str = "weight-size";
const ARG_WEIGHT_SCHOOLS: &str = "weight-schools";
const ENV_SCORE_REQUEST: &str = "CITYSCOPE_CMDS_SCORE_REQUEST_PATH";
const ENV_RECOMMEND_REQUEST: &str = "CITYSCOPE_CMDS_RECOMMEND_REQUEST_PATH";
const ENV_RECOMMEND_QUERY: &str = "CITYSCOPE_CMDS_RECOMMEND_QUERY";

/// Run the CityScope CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => score::run_score(args),
        Command::Recommend(args) => recommend::run_recommend(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "cityscope",
    about = "Score and rank city regions by density, affordability and size",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every region of a request and print the ranked table.
    Score(ScoreArgs),
    /// Score a request, then re-rank it for a free-text description.
    Recommend(RecommendArgs),
}

#[cfg(test)]
mod tests;
