//! Collaborator services used by the discovery pipeline.
//!
//! The four traits here are the only I/O boundary of the core: places
//! search, distance matrix, routing and geocoding. Each method is a single
//! request/response exchange and is the only place where the pipeline
//! suspends. Implementations live in `nearbite-data` (HTTP) and in
//! [`crate::test_support`] (in-memory doubles).
//!
//! The traits are declared `?Send`: a session drives its collaborators from
//! one thread, so futures never need to cross threads.

mod error;
mod provider;

pub use error::ServiceError;
pub use provider::{
    DistanceMatrix, DistanceRow, Geocoder, PlacesSearch, RoutingService, Suggestion,
};
