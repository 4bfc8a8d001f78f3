//! Shared HTTP plumbing for the service adapters.

use std::time::Duration;

use log::trace;
use nearbite_core::ServiceError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "nearbite/0.1";

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    BaseUrl {
        /// Offending URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Client and timeout shared by every request of one adapter.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Transport {
    pub(crate) fn new(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ProviderBuildError> {
        Url::parse(base_url).map_err(|source| ProviderBuildError::BaseUrl {
            url: base_url.to_owned(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }

    /// Absolute URL for `path` below the base URL.
    ///
    /// `path` must start with `/` and may contain characters that need
    /// percent-encoding; the URL parser takes care of them.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|err| ServiceError::Network {
            url: raw,
            message: err.to_string(),
        })
    }

    /// GET `url` and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        let label = url.as_str().to_owned();
        trace!("GET {label}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &label))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &label))?;

        response.json().await.map_err(|err| {
            if err.is_timeout() {
                self.convert_reqwest_error(&err, &label)
            } else {
                ServiceError::Parse {
                    message: err.to_string(),
                }
            }
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ServiceError {
        if error.is_timeout() {
            return ServiceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ServiceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ServiceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Format a coordinate the way OSRM and most web APIs expect it: `lng,lat`.
pub(crate) fn lng_lat(coord: geo::Coord<f64>) -> String {
    format!("{},{}", coord.x, coord.y)
}
