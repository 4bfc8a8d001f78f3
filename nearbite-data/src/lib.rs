//! HTTP adapters for the Nearbite engine.
//!
//! Responsibilities:
//! - Implement the collaborator traits of `nearbite-core` over HTTP.
//! - Translate wire formats into domain types and transport failures into
//!   [`nearbite_core::ServiceError`].
//!
//! Boundaries:
//! - Do not encode domain rules (live in `nearbite-core`).
//! - Adapters hold no per-request state; one client is reused per adapter.

#![forbid(unsafe_code)]

pub mod geocoding;
pub mod links;
pub mod places;
pub mod routing;
mod transport;

pub use geocoding::{MapboxConfig, MapboxGeocoder};
pub use places::{HttpPlacesSearch, PlacesConfig};
pub use routing::{OsrmProvider, OsrmProviderConfig};
pub use transport::{DEFAULT_USER_AGENT, ProviderBuildError};
