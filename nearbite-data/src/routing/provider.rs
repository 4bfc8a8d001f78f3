//! HTTP client for OSRM's Table and Route services.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use nearbite_core::{DistanceMatrix, DistanceRow, RouteAlternative, RoutingService, ServiceError};

use super::osrm::{RouteResponse, TableResponse};
use crate::transport::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ProviderBuildError, Transport, lng_lat,
};

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Routing profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "car";

/// OSRM code for two points the road network does not connect.
const NO_ROUTE: &str = "NoRoute";

/// Configuration for [`OsrmProvider`].
#[derive(Debug, Clone)]
pub struct OsrmProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Routing profile, e.g. `"car"` or `"foot"`.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
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

/// OSRM-backed [`DistanceMatrix`] and [`RoutingService`].
///
/// # Examples
///
/// ```no_run
/// use geo::Coord;
/// use nearbite_core::DistanceMatrix;
/// use nearbite_data::routing::OsrmProvider;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OsrmProvider::new("http://localhost:5000")?;
/// let row = provider
///     .distances_from_first(&[Coord { x: 106.0, y: 10.0 }, Coord { x: 106.01, y: 10.0 }])
///     .await?;
/// assert_eq!(row.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OsrmProvider {
    transport: Transport,
    config: OsrmProviderConfig,
}

impl OsrmProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: OsrmProviderConfig) -> Result<Self, ProviderBuildError> {
        let transport = Transport::new(&config.base_url, config.timeout, &config.user_agent)?;
        Ok(Self { transport, config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &OsrmProviderConfig {
        &self.config
    }

    /// Path of a service request: `/{service}/v1/{profile}/{lng,lat;...}`.
    fn service_path(&self, service: &str, coordinates: &[Coord<f64>]) -> String {
        let coords = coordinates
            .iter()
            .map(|coord| lng_lat(*coord))
            .collect::<Vec<_>>()
            .join(";");
        format!("/{service}/v1/{}/{coords}", self.config.profile)
    }

    fn convert_table(response: TableResponse) -> Result<DistanceRow, ServiceError> {
        if !response.is_ok() {
            return Err(ServiceError::Upstream {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        response
            .distances
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| ServiceError::Parse {
                message: "OSRM response missing distances row".to_owned(),
            })
    }

    fn convert_route(response: RouteResponse) -> Result<Vec<RouteAlternative>, ServiceError> {
        if response.code == NO_ROUTE {
            return Ok(Vec::new());
        }
        if !response.is_ok() {
            return Err(ServiceError::Upstream {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }
        Ok(response.into_alternatives())
    }
}

#[async_trait(?Send)]
impl DistanceMatrix for OsrmProvider {
    async fn distances_from_first(
        &self,
        coordinates: &[Coord<f64>],
    ) -> Result<DistanceRow, ServiceError> {
        if coordinates.is_empty() {
            return Err(ServiceError::EmptyInput);
        }

        let mut url = self
            .transport
            .endpoint(&self.service_path("table", coordinates))?;
        url.query_pairs_mut()
            .append_pair("sources", "0")
            .append_pair("destinations", "all")
            .append_pair("annotations", "distance");

        let row = Self::convert_table(self.transport.get_json(url).await?)?;
        debug!(
            "OSRM table returned {} distances for {} coordinates",
            row.len(),
            coordinates.len()
        );
        Ok(row)
    }
}

#[async_trait(?Send)]
impl RoutingService for OsrmProvider {
    async fn route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        let mut url = self
            .transport
            .endpoint(&self.service_path("route", &[origin, destination]))?;
        url.query_pairs_mut()
            .append_pair("steps", "true")
            .append_pair("geometries", "geojson")
            .append_pair("overview", "false");

        Self::convert_route(self.transport.get_json(url).await?)
    }
}
