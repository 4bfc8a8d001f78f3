//! Error types emitted by the Nearbite CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use nearbite_core::{FilterError, LocationError};
use nearbite_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the Nearbite CLI.
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
    /// The configured coordinates are out of range.
    #[error("invalid location: {0}")]
    InvalidLocation(#[source] LocationError),
    /// The configured filter thresholds are not selectable.
    #[error("invalid filter: {0}")]
    InvalidFilter(#[source] FilterError),
    /// Constructing an HTTP collaborator failed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildProvider {
        service: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The geocoder had no match for the configured address.
    #[error("no location found for address {address:?}")]
    AddressNotFound { address: String },
    /// Serializing the discovery report failed.
    #[error("failed to serialize discovery report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing the discovery report failed.
    #[error("failed to write discovery report: {0}")]
    WriteOutput(#[source] std::io::Error),
}
