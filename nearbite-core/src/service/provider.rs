//! Collaborator traits consumed by the discovery pipeline.

use async_trait::async_trait;
use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ServiceError;
use crate::{Candidate, Location, LocationError, RouteAlternative};

/// Distances in metres from the first coordinate of a request to every
/// coordinate of that request, index-aligned with the request.
///
/// `None` marks a destination the service could not reach.
pub type DistanceRow = Vec<Option<f64>>;

/// Search for places of a given type around a point.
#[async_trait(?Send)]
pub trait PlacesSearch {
    /// Return places of `place_type` within `radius_meters` of `origin`.
    ///
    /// Implementations must return `Ok(vec![])` rather than an error when
    /// nothing is found.
    async fn search(
        &self,
        place_type: &str,
        origin: Coord<f64>,
        radius_meters: u32,
    ) -> Result<Vec<Candidate>, ServiceError>;
}

/// Compute road-network distances from one source to many destinations.
#[async_trait(?Send)]
pub trait DistanceMatrix {
    /// Return the distance row for `coordinates[0]` as the sole source.
    ///
    /// Implementations must return `Err(ServiceError::EmptyInput)` when
    /// `coordinates` is empty.
    async fn distances_from_first(
        &self,
        coordinates: &[Coord<f64>],
    ) -> Result<DistanceRow, ServiceError>;
}

/// Compute turn-by-turn routes between two points.
#[async_trait(?Send)]
pub trait RoutingService {
    /// Return route alternatives from `origin` to `destination`, best first.
    async fn route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteAlternative>, ServiceError>;
}

/// One autocomplete entry for free-text location input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Suggestion {
    /// Text shown in the suggestion list.
    pub display_name: String,
    /// Position of the suggestion, `x = longitude`, `y = latitude`.
    pub coordinates: Coord<f64>,
}

impl Suggestion {
    /// Turn the suggestion into a resolved [`Location`].
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] when the service sent invalid coordinates.
    pub fn to_location(&self) -> Result<Location, LocationError> {
        Location::resolved(self.display_name.clone(), self.coordinates)
    }
}

/// Resolve free text into location suggestions.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Return suggestions for `text`, best first.
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, ServiceError>;
}
