//! Nearby command implementation for the Nearbite CLI.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use geo::Coord;
use log::{debug, info, warn};
use nearbite_core::{
    Candidate, DistanceMatrix, FilterState, Geocoder, Location, PlacesSearch,
    RESTAURANT_PLACE_TYPE, RoutingService, SearchSettings, ServiceError, Session,
    SessionServices, SessionSnapshot, Suggestion,
};
use nearbite_data::links::{photo_url, place_search_link};
use nearbite_data::routing::{DEFAULT_OSRM_URL, DEFAULT_PROFILE};
use nearbite_data::{
    HttpPlacesSearch, MapboxConfig, MapboxGeocoder, OsrmProvider, OsrmProviderConfig,
    PlacesConfig,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ADDRESS, ARG_LATITUDE, ARG_LONGITUDE, ARG_MAPBOX_TOKEN, ARG_MIN_RATING, ARG_OSRM_PROFILE,
    ARG_OSRM_URL, ARG_PLACE_TYPE, ARG_PLACES_URL, ARG_PRICE_LEVEL, ARG_RADIUS, ARG_TIMEOUT_SECS,
    CliError, ENV_LATITUDE, ENV_LONGITUDE, ENV_MAPBOX_TOKEN, ENV_PLACES_URL,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search for places around a location, rank them by road \
                 distance, apply the price and rating filters, and route to \
                 the nearest match. The location is given either as \
                 coordinates or as an address resolved through Mapbox.",
    about = "Find and route to the nearest matching place"
)]
#[ortho_config(prefix = "NEARBITE")]
pub(crate) struct NearbyArgs {
    /// Latitude of the reference location.
    #[arg(long = ARG_LATITUDE, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the reference location.
    #[arg(long = ARG_LONGITUDE, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Address to geocode, or a label for the given coordinates.
    #[arg(long = ARG_ADDRESS, value_name = "text")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Places-search type (defaults to "restaurant").
    #[arg(long = ARG_PLACE_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) place_type: Option<String>,
    /// Search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Minimum rating between 0 and 5; 0 clears the constraint.
    #[arg(long = ARG_MIN_RATING, value_name = "stars")]
    #[serde(default)]
    pub(crate) min_rating: Option<f32>,
    /// Exact price level to keep, 1 (inexpensive) to 4 (very expensive); 0 clears the constraint.
    #[arg(long = ARG_PRICE_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) price_level: Option<u8>,
    /// Base URL of the places-search backend.
    #[arg(long = ARG_PLACES_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) places_url: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long = ARG_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Mapbox access token, required with `--address`.
    #[arg(long = ARG_MAPBOX_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) mapbox_token: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Where the search starts from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Origin {
    /// Coordinates known up front.
    Coordinates(Location),
    /// Address resolved through the geocoder's first suggestion.
    Address(String),
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    pub(crate) origin: Origin,
    pub(crate) settings: SearchSettings,
    pub(crate) filter: FilterState,
    pub(crate) places_url: String,
    pub(crate) osrm_url: String,
    pub(crate) osrm_profile: String,
    pub(crate) mapbox_token: Option<String>,
    pub(crate) timeout: Duration,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let places_url = args.places_url.ok_or(CliError::MissingArgument {
            field: ARG_PLACES_URL,
            env: ENV_PLACES_URL,
        })?;
        let origin = resolve_origin(
            args.latitude,
            args.longitude,
            args.address,
            args.mapbox_token.is_some(),
        )?;
        let filter = FilterState::from_selector(args.price_level, args.min_rating)
            .map_err(CliError::InvalidFilter)?;

        let mut settings = SearchSettings::new(
            args.place_type
                .unwrap_or_else(|| RESTAURANT_PLACE_TYPE.to_owned()),
        );
        if let Some(radius) = args.radius {
            settings = settings.with_radius(radius);
        }

        Ok(Self {
            origin,
            settings,
            filter,
            places_url,
            osrm_url: args.osrm_url.unwrap_or_else(|| DEFAULT_OSRM_URL.to_owned()),
            osrm_profile: args
                .osrm_profile
                .unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
            mapbox_token: args.mapbox_token,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

fn resolve_origin(
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
    has_token: bool,
) -> Result<Origin, CliError> {
    match (latitude, longitude, address) {
        (Some(lat), Some(lng), label) => {
            let display_name = label.unwrap_or_else(|| format!("{lat}, {lng}"));
            Location::resolved(display_name, Coord { x: lng, y: lat })
                .map(Origin::Coordinates)
                .map_err(CliError::InvalidLocation)
        }
        (Some(_), None, _) => Err(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_LONGITUDE,
        }),
        (None, Some(_), _) => Err(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_LATITUDE,
        }),
        (None, None, Some(text)) if has_token => Ok(Origin::Address(text)),
        (None, None, Some(_)) => Err(CliError::MissingArgument {
            field: ARG_MAPBOX_TOKEN,
            env: ENV_MAPBOX_TOKEN,
        }),
        (None, None, None) => Err(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_LATITUDE,
        }),
    }
}

/// Owned collaborators for one `nearby` invocation.
pub(super) struct Collaborators {
    pub(super) places: Box<dyn PlacesSearch>,
    pub(super) distances: Box<dyn DistanceMatrix>,
    pub(super) routing: Box<dyn RoutingService>,
    pub(super) geocoder: Box<dyn Geocoder>,
}

impl Collaborators {
    fn services(&self) -> SessionServices<'_> {
        SessionServices {
            places: self.places.as_ref(),
            distances: self.distances.as_ref(),
            routing: self.routing.as_ref(),
            geocoder: self.geocoder.as_ref(),
        }
    }
}

/// Builds the collaborators for the current `nearby` invocation.
pub(super) trait CollaboratorBuilder {
    fn build(&self, config: &NearbyConfig) -> Result<Collaborators, CliError>;
}

pub(super) struct HttpCollaboratorBuilder;

impl CollaboratorBuilder for HttpCollaboratorBuilder {
    fn build(&self, config: &NearbyConfig) -> Result<Collaborators, CliError> {
        let places = HttpPlacesSearch::with_config(
            &PlacesConfig::new(config.places_url.clone()).with_timeout(config.timeout),
        )
        .map_err(|source| CliError::BuildProvider {
            service: "places",
            base_url: config.places_url.clone(),
            source,
        })?;
        let osrm = OsrmProvider::with_config(
            OsrmProviderConfig::new(config.osrm_url.clone())
                .with_profile(config.osrm_profile.clone())
                .with_timeout(config.timeout),
        )
        .map_err(|source| CliError::BuildProvider {
            service: "routing",
            base_url: config.osrm_url.clone(),
            source,
        })?;
        let geocoder: Box<dyn Geocoder> = match &config.mapbox_token {
            Some(token) => {
                let mapbox = MapboxConfig::new(token.clone()).with_timeout(config.timeout);
                let base_url = mapbox.base_url.clone();
                Box::new(MapboxGeocoder::with_config(mapbox).map_err(|source| {
                    CliError::BuildProvider {
                        service: "geocoder",
                        base_url,
                        source,
                    }
                })?)
            }
            None => Box::new(DisabledGeocoder),
        };
        Ok(Collaborators {
            places: Box::new(places),
            distances: Box::new(osrm.clone()),
            routing: Box::new(osrm),
            geocoder,
        })
    }
}

/// Geocoder used when no Mapbox token is configured; never suggests anything.
struct DisabledGeocoder;

#[async_trait(?Send)]
impl Geocoder for DisabledGeocoder {
    async fn suggest(&self, _text: &str) -> Result<Vec<Suggestion>, ServiceError> {
        Ok(Vec::new())
    }
}

/// Links shown next to a candidate.
#[derive(Debug, Serialize)]
struct CandidateLinks {
    id: String,
    map: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
}

impl CandidateLinks {
    fn for_candidate(candidate: &Candidate, places_url: &str) -> Self {
        let photo = candidate.photo_ref.as_deref().and_then(|reference| {
            match photo_url(places_url, reference) {
                Ok(url) => Some(url.to_string()),
                Err(err) => {
                    warn!("no photo link for {}: {err}", candidate.id);
                    None
                }
            }
        });
        Self {
            id: candidate.id.to_string(),
            map: place_search_link(candidate.location),
            photo,
        }
    }
}

/// JSON document written by `nearby`.
#[derive(Debug, Serialize)]
struct NearbyReport {
    #[serde(flatten)]
    snapshot: SessionSnapshot,
    map_center: Coord<f64>,
    route_geojson: serde_json::Value,
    links: Vec<CandidateLinks>,
}

impl NearbyReport {
    fn capture(session: &Session<'_>, places_url: &str) -> Self {
        let snapshot = session.snapshot();
        let links = snapshot
            .candidates
            .iter()
            .map(|candidate| CandidateLinks::for_candidate(candidate, places_url))
            .collect();
        Self {
            map_center: session.map_center(),
            route_geojson: snapshot.route.to_geojson(),
            snapshot,
            links,
        }
    }
}

pub(super) fn run_nearby(args: NearbyArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_nearby_with(&config, &HttpCollaboratorBuilder, &mut stdout)
}

pub(super) fn run_nearby_with(
    config: &NearbyConfig,
    builder: &dyn CollaboratorBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let collaborators = builder.build(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let session = Session::new(collaborators.services(), config.settings.clone());
    runtime.block_on(discover(&session, config))?;
    write_report(writer, &NearbyReport::capture(&session, &config.places_url))
}

async fn discover(session: &Session<'_>, config: &NearbyConfig) -> Result<(), CliError> {
    match &config.origin {
        Origin::Coordinates(location) => {
            let status = session.set_location(location.clone()).await;
            debug!("location applied: {status:?}");
        }
        Origin::Address(address) => {
            let status = session.edit_location_text(address).await;
            debug!("suggestions for {address:?}: {status:?}");
            if !session.select_suggestion(0).await {
                if let Some(err) = session.error() {
                    warn!("geocoding failed: {err}");
                }
                return Err(CliError::AddressNotFound {
                    address: address.clone(),
                });
            }
        }
    }

    let filter_status = session.set_filter(config.filter).await;
    debug!("filter applied: {filter_status:?}");
    let search_status = session.search().await;
    info!(
        "search {search_status:?}: {} of {} candidates pass the filter",
        session.filtered().len(),
        session.origin_set().len()
    );
    if let Some(err) = session.error() {
        warn!("discovery finished with an error: {err}");
    }
    Ok(())
}

fn write_report(writer: &mut dyn Write, report: &NearbyReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NearbyConfig, CliError> {
    let merged = NearbyArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NearbyConfig::try_from(merged)
}
