//! HTTP client for the places-search backend.
//!
//! The backend proxies a nearby-search API behind
//! `GET {base_url}/search-places?latitude=..&longitude=..&radius=..&placeType=..`
//! and answers with Google-style place records.

mod record;

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use nearbite_core::{Candidate, PlacesSearch, ServiceError};

use crate::transport::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ProviderBuildError, Transport};
use record::{PlaceRecord, PlacesPayload};

/// Configuration for [`HttpPlacesSearch`].
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base URL of the backend, e.g. `"https://api.example.com"`.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl PlacesConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`PlacesSearch`] over the places-search backend.
///
/// Records without an identifier or a position are skipped with a warning.
#[derive(Debug, Clone)]
pub struct HttpPlacesSearch {
    transport: Transport,
}

impl HttpPlacesSearch {
    /// Create a client with default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(&PlacesConfig::new(base_url))
    }

    /// Create a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: &PlacesConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            transport: Transport::new(&config.base_url, config.timeout, &config.user_agent)?,
        })
    }
}

#[async_trait(?Send)]
impl PlacesSearch for HttpPlacesSearch {
    async fn search(
        &self,
        place_type: &str,
        origin: Coord<f64>,
        radius_meters: u32,
    ) -> Result<Vec<Candidate>, ServiceError> {
        let mut url = self.transport.endpoint("/search-places")?;
        url.query_pairs_mut()
            .append_pair("latitude", &origin.y.to_string())
            .append_pair("longitude", &origin.x.to_string())
            .append_pair("radius", &radius_meters.to_string())
            .append_pair("placeType", place_type);

        let payload: PlacesPayload = self.transport.get_json(url).await?;
        let records = payload.into_records()?;
        let received = records.len();
        let candidates: Vec<Candidate> = records
            .into_iter()
            .filter_map(PlaceRecord::into_candidate)
            .collect();
        debug!(
            "places backend returned {received} records, {} usable",
            candidates.len()
        );
        Ok(candidates)
    }
}
