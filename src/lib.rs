//! Facade crate for the Nearbite discovery engine.
//!
//! This crate re-exports the core domain types and exposes the HTTP
//! collaborators behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use nearbite_core::{
    Candidate, CandidateId, DiscoveryError, DistanceMatrix, FilterState, FilteredSet, Geocoder,
    Location, OriginSet, Outcome, PlacesSearch, PriceLevel, RequestStatus, RoutePolyline,
    RoutingService, SearchSettings, ServiceError, ServiceKind, Session, SessionPhase,
    SessionServices, SessionSnapshot, Suggestion,
};

#[cfg(feature = "http")]
pub use nearbite_data::{
    HttpPlacesSearch, MapboxConfig, MapboxGeocoder, OsrmProvider, OsrmProviderConfig,
    PlacesConfig, ProviderBuildError,
};
