//! Core domain types and orchestration for the Nearbite engine.
//!
//! The crate finds places near a reference location, ranks them by
//! road-network distance, filters them by price and rating, and routes to
//! the nearest one that remains. It talks to the outside world only through
//! the collaborator traits in [`service`]; concrete HTTP clients live in
//! `nearbite-data`.
//!
//! The stateless stages ([`resolve_suggestions`], [`search_candidates`],
//! [`augment_distances`], [`filter_candidates`], [`resolve_nearest_route`])
//! can be used on their own. [`Session`] wires them into a pipeline and
//! owns the resulting state.
//!
//! Collaborator failures never escape as errors. Each stage returns an
//! [`Outcome`]: the best available value, plus a [`DiscoveryError`] signal
//! when something went wrong.

#![forbid(unsafe_code)]

mod augment;
mod candidate;
mod candidate_set;
mod error;
mod filter;
mod geocode;
mod location;
mod price;
mod resolve;
mod route;
mod search;
pub mod service;
mod session;

#[doc(hidden)]
pub mod test_support;

pub use augment::augment_distances;
pub use candidate::{Candidate, CandidateError, CandidateId, MAX_RATING};
pub use candidate_set::{FilteredSet, OriginSet};
pub use error::{DiscoveryError, Outcome, ServiceKind};
pub use filter::{
    FilterError, FilterState, PRICE_OPTIONS, RATING_OPTIONS, SelectorOption, filter_candidates,
};
pub use geocode::resolve_suggestions;
pub use location::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, Location, LocationError};
pub use price::{PriceLevel, PriceLevelError};
pub use resolve::resolve_nearest_route;
pub use route::{RouteAlternative, RouteLeg, RoutePolyline, RouteStep};
pub use search::{
    DEFAULT_SEARCH_RADIUS_METERS, RESTAURANT_PLACE_TYPE, SearchSettings, search_candidates,
};
pub use service::{
    DistanceMatrix, DistanceRow, Geocoder, PlacesSearch, RoutingService, ServiceError, Suggestion,
};
pub use session::{RequestStatus, Session, SessionPhase, SessionServices, SessionSnapshot};
