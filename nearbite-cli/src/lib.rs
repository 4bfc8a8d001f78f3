//! Command-line interface for one-shot Nearbite discovery runs.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod nearby;

pub use error::CliError;
use nearby::{NearbyArgs, run_nearby};

const ARG_LATITUDE: &str = "latitude";
const ARG_LONGITUDE: &str = "longitude";
const ARG_ADDRESS: &str = "address";
const ARG_PLACE_TYPE: &str = "place-type";
const ARG_RADIUS: &str = "radius";
const ARG_MIN_RATING: &str = "min-rating";
const ARG_PRICE_LEVEL: &str = "price-level";
const ARG_PLACES_URL: &str = "places-url";
const ARG_OSRM_URL: &str = "osrm-url";
const ARG_OSRM_PROFILE: &str = "osrm-profile";
const ARG_MAPBOX_TOKEN: &str = "mapbox-token";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_LATITUDE: &str = "NEARBITE_CMDS_NEARBY_LATITUDE";
const ENV_LONGITUDE: &str = "NEARBITE_CMDS_NEARBY_LONGITUDE";
const ENV_PLACES_URL: &str = "NEARBITE_CMDS_NEARBY_PLACES_URL";
const ENV_MAPBOX_TOKEN: &str = "NEARBITE_CMDS_NEARBY_MAPBOX_TOKEN";

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Run the Nearbite CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration merging, or the
/// discovery run fails. Collaborator failures during discovery are reported
/// in the output instead.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Nearby(args) => run_nearby(args),
    }
}

/// Install the process-wide logger, honouring `RUST_LOG`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "nearbite",
    about = "Find nearby places and route to the closest one",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search around a location, filter, and route to the nearest match.
    Nearby(NearbyArgs),
}

#[cfg(test)]
mod tests;
