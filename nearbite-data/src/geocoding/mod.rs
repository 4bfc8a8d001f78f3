//! Address autocomplete backed by the Mapbox forward-geocoding API.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::{debug, warn};
use nearbite_core::{Geocoder, ServiceError, Suggestion};
use serde::Deserialize;

use crate::transport::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ProviderBuildError, Transport};

/// Mapbox API host.
pub const DEFAULT_MAPBOX_URL: &str = "https://api.mapbox.com";

/// Number of suggestions requested per keystroke.
pub const DEFAULT_SUGGESTION_LIMIT: u8 = 5;

/// Configuration for [`MapboxGeocoder`].
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// API host.
    pub base_url: String,
    /// Mapbox access token.
    pub access_token: String,
    /// Maximum number of suggestions, `1..=10`.
    pub limit: u8,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl MapboxConfig {
    /// Configuration for the public API with `access_token`.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_MAPBOX_URL.to_owned(),
            access_token: access_token.into(),
            limit: DEFAULT_SUGGESTION_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point at another host, e.g. a test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the suggestion limit; clamped to `1..=10`.
    #[must_use]
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.clamp(1, 10);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    place_name: String,
    /// `[lng, lat]`.
    center: Option<[f64; 2]>,
}

/// [`Geocoder`] over Mapbox `mapbox.places` autocomplete.
#[derive(Clone)]
pub struct MapboxGeocoder {
    transport: Transport,
    access_token: String,
    limit: u8,
}

impl std::fmt::Debug for MapboxGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxGeocoder")
            .field("transport", &self.transport)
            .field("access_token", &"<redacted>")
            .field("limit", &self.limit)
            .finish()
    }
}

impl MapboxGeocoder {
    /// Create a geocoder from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: MapboxConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            transport: Transport::new(&config.base_url, config.timeout, &config.user_agent)?,
            access_token: config.access_token,
            limit: config.limit,
        })
    }
}

#[async_trait(?Send)]
impl Geocoder for MapboxGeocoder {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, ServiceError> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.transport.endpoint("/geocoding/v5/mapbox.places")?;
        let label = url.to_string();
        url.path_segments_mut()
            .map_err(|()| ServiceError::Network {
                url: label,
                message: "base URL cannot carry a path".to_owned(),
            })?
            .push(&format!("{query}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("autocomplete", "true")
            .append_pair("limit", &self.limit.to_string());

        let collection: FeatureCollection = self.transport.get_json(url).await?;
        let suggestions: Vec<Suggestion> = collection
            .features
            .into_iter()
            .filter_map(|feature| {
                let Some([x, y]) = feature.center else {
                    warn!("skipping suggestion {:?} without a centre", feature.place_name);
                    return None;
                };
                Some(Suggestion {
                    display_name: feature.place_name,
                    coordinates: Coord { x, y },
                })
            })
            .collect();
        debug!("{} suggestions for {query:?}", suggestions.len());
        Ok(suggestions)
    }
}
