//! Error types emitted by the CityScope CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use cityscope_core::InputError;
use cityscope_scorer::ScoringError;
use thiserror::Error;

/// Errors emitted by the CityScope CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the scoring request file failed.
    #[error("failed to open scoring request at {path:?}: {source}")]
    OpenRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Scoring request JSON could not be decoded.
    #[error("failed to parse scoring request JSON at {path:?}: {source}")]
    ParseRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A region or point in the request broke an input invariant.
    #[error("scoring request in {path:?} is invalid: {source}")]
    InvalidInput {
        path: Utf8PathBuf,
        #[source]
        source: InputError,
    },
    /// The request's weights were rejected.
    #[error("scoring request in {path:?} could not be scored: {source}")]
    Scoring {
        path: Utf8PathBuf,
        #[source]
        source: ScoringError,
    },
    /// No region survived the request's filter.
    #[error("no region in {path:?} satisfies the candidate filter")]
    EmptyCandidateSet { path: Utf8PathBuf },
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
