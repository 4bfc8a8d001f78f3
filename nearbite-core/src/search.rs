//! Place discovery around the reference location.

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Candidate, DiscoveryError, Location, Outcome, PlacesSearch, ServiceKind};

/// Place type searched for by default.
pub const RESTAURANT_PLACE_TYPE: &str = "restaurant";

/// Search radius used by default, in metres.
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 2500;

/// What to search for and how far to look.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchSettings {
    /// Places-search type, e.g. `"restaurant"` or `"bus_station"`.
    pub place_type: String,
    /// Search radius in metres.
    pub radius_meters: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            place_type: RESTAURANT_PLACE_TYPE.to_owned(),
            radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
        }
    }
}

impl SearchSettings {
    /// Settings for `place_type` with the default radius.
    pub fn new(place_type: impl Into<String>) -> Self {
        Self {
            place_type: place_type.into(),
            ..Self::default()
        }
    }

    /// Override the radius.
    #[must_use]
    pub const fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }
}

/// Fetch raw candidates around `origin`.
///
/// An unresolved origin or a failing service yields an empty list plus a
/// signal. Candidates come back in the order the service returned them.
pub async fn search_candidates(
    places: &dyn PlacesSearch,
    settings: &SearchSettings,
    origin: &Location,
) -> Outcome<Vec<Candidate>> {
    let Some(center) = origin.coordinates() else {
        return Outcome::degraded(
            Vec::new(),
            DiscoveryError::UnresolvedLocation {
                operation: "place search",
            },
        );
    };
    match places
        .search(&settings.place_type, center, settings.radius_meters)
        .await
    {
        Ok(candidates) => {
            debug!(
                "found {} {} candidates within {} m",
                candidates.len(),
                settings.place_type,
                settings.radius_meters
            );
            Outcome::clean(candidates)
        }
        Err(error) => {
            warn!("place search failed: {error}");
            Outcome::degraded(
                Vec::new(),
                DiscoveryError::from_service(ServiceKind::PlacesSearch, error),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceError;
    use crate::test_support::StubPlaces;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn forwards_settings_to_the_service() {
        let places = StubPlaces::with_results(vec![Candidate::new(
            "r1",
            "Com Tam",
            "3 Le Loi",
            Coord { x: 106.7, y: 10.77 },
        )]);
        let origin = Location::resolved("Home", Coord { x: 106.0, y: 10.0 }).expect("valid");
        let settings = SearchSettings::new("cafe").with_radius(1000);

        let outcome = search_candidates(&places, &settings, &origin).await;

        assert_eq!(outcome.value().len(), 1);
        assert_eq!(
            places.requests(),
            vec![("cafe".to_owned(), Coord { x: 106.0, y: 10.0 }, 1000)]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failure_yields_empty_list() {
        let places = StubPlaces::with_error(ServiceError::Http {
            url: "http://places.test/search-places".to_owned(),
            status: 503,
            message: "unavailable".to_owned(),
        });
        let origin = Location::resolved("Home", Coord { x: 106.0, y: 10.0 }).expect("valid");

        let (candidates, signal) = search_candidates(&places, &SearchSettings::default(), &origin)
            .await
            .into_parts();

        assert!(candidates.is_empty());
        assert_eq!(signal.and_then(|s| s.service()), Some(ServiceKind::PlacesSearch));
    }

    #[rstest]
    fn defaults_search_restaurants_within_2500_m() {
        let settings = SearchSettings::default();
        assert_eq!(settings.place_type, "restaurant");
        assert_eq!(settings.radius_meters, 2500);
    }
}
