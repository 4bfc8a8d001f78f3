//! OSRM-backed distance matrix and routing.
//!
//! [`OsrmProvider`] implements both [`nearbite_core::DistanceMatrix`] (Table
//! API with `annotations=distance`, the first coordinate as the only source)
//! and [`nearbite_core::RoutingService`] (Route API with per-step GeoJSON
//! geometry).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use nearbite_data::routing::{OsrmProvider, OsrmProviderConfig};
//!
//! let config = OsrmProviderConfig::new("http://localhost:5000")
//!     .with_profile("foot")
//!     .with_timeout(Duration::from_secs(10));
//! let provider = OsrmProvider::with_config(config)?;
//! # Ok::<(), nearbite_data::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_OSRM_URL, DEFAULT_PROFILE, OsrmProvider, OsrmProviderConfig};
