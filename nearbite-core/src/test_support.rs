//! Deterministic collaborator doubles for unit and behaviour tests.
//!
//! Every stub answers from a scripted response queue: each call takes the
//! next response, and the last response is repeated once the queue is down
//! to one entry. Requests are recorded so tests can assert on what was sent.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use geo::Coord;

use crate::{
    Candidate, DistanceMatrix, DistanceRow, Geocoder, PlacesSearch, RouteAlternative,
    RoutingService, ServiceError, Suggestion,
};

#[derive(Debug)]
struct Script<T> {
    responses: RefCell<VecDeque<Result<T, ServiceError>>>,
}

impl<T: Clone> Script<T> {
    fn new(responses: impl IntoIterator<Item = Result<T, ServiceError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
        }
    }

    fn next(&self) -> Result<T, ServiceError> {
        let mut responses = self.responses.borrow_mut();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.unwrap_or(Err(ServiceError::Upstream {
            code: "NoScript".to_owned(),
            message: "stub has no scripted response".to_owned(),
        }))
    }
}

/// Recorded places-search request: place type, origin and radius.
pub type PlacesRequest = (String, Coord<f64>, u32);

/// Scripted [`PlacesSearch`].
#[derive(Debug)]
pub struct StubPlaces {
    script: Script<Vec<Candidate>>,
    requests: RefCell<Vec<PlacesRequest>>,
}

impl StubPlaces {
    /// Always return `candidates`.
    #[must_use]
    pub fn with_results(candidates: Vec<Candidate>) -> Self {
        Self::with_sequence([Ok(candidates)])
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn with_error(error: ServiceError) -> Self {
        Self::with_sequence([Err(error)])
    }

    /// Answer successive calls from `responses`.
    pub fn with_sequence(
        responses: impl IntoIterator<Item = Result<Vec<Candidate>, ServiceError>>,
    ) -> Self {
        Self {
            script: Script::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<PlacesRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PlacesSearch for StubPlaces {
    async fn search(
        &self,
        place_type: &str,
        origin: Coord<f64>,
        radius_meters: u32,
    ) -> Result<Vec<Candidate>, ServiceError> {
        self.requests
            .borrow_mut()
            .push((place_type.to_owned(), origin, radius_meters));
        self.script.next()
    }
}

/// Scripted [`DistanceMatrix`].
#[derive(Debug)]
pub struct StubDistanceMatrix {
    script: Script<DistanceRow>,
    requests: RefCell<Vec<Vec<Coord<f64>>>>,
}

impl StubDistanceMatrix {
    /// Always return `row`, whatever was requested.
    #[must_use]
    pub fn with_row(row: DistanceRow) -> Self {
        Self::with_sequence([Ok(row)])
    }

    /// Always fail with `error` for non-empty input.
    #[must_use]
    pub fn with_error(error: ServiceError) -> Self {
        Self::with_sequence([Err(error)])
    }

    /// Answer successive calls from `responses`.
    pub fn with_sequence(responses: impl IntoIterator<Item = Result<DistanceRow, ServiceError>>) -> Self {
        Self {
            script: Script::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Coordinate lists received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Coord<f64>>> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl DistanceMatrix for StubDistanceMatrix {
    async fn distances_from_first(
        &self,
        coordinates: &[Coord<f64>],
    ) -> Result<DistanceRow, ServiceError> {
        if coordinates.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        self.requests.borrow_mut().push(coordinates.to_vec());
        self.script.next()
    }
}

/// Scripted [`RoutingService`].
#[derive(Debug)]
pub struct StubRouting {
    script: Script<Vec<RouteAlternative>>,
    requests: RefCell<Vec<(Coord<f64>, Coord<f64>)>>,
}

impl StubRouting {
    /// Always return `alternatives`.
    #[must_use]
    pub fn with_alternatives(alternatives: Vec<RouteAlternative>) -> Self {
        Self::with_sequence([Ok(alternatives)])
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn with_error(error: ServiceError) -> Self {
        Self::with_sequence([Err(error)])
    }

    /// Answer successive calls from `responses`.
    pub fn with_sequence(
        responses: impl IntoIterator<Item = Result<Vec<RouteAlternative>, ServiceError>>,
    ) -> Self {
        Self {
            script: Script::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Origin/destination pairs received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(Coord<f64>, Coord<f64>)> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl RoutingService for StubRouting {
    async fn route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        self.requests.borrow_mut().push((origin, destination));
        self.script.next()
    }
}

/// Scripted [`Geocoder`].
#[derive(Debug)]
pub struct StubGeocoder {
    script: Script<Vec<Suggestion>>,
    queries: RefCell<Vec<String>>,
}

impl StubGeocoder {
    /// Always return `suggestions`.
    #[must_use]
    pub fn with_suggestions(suggestions: Vec<Suggestion>) -> Self {
        Self::with_sequence([Ok(suggestions)])
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn with_error(error: ServiceError) -> Self {
        Self::with_sequence([Err(error)])
    }

    /// Answer successive calls from `responses`.
    pub fn with_sequence(
        responses: impl IntoIterator<Item = Result<Vec<Suggestion>, ServiceError>>,
    ) -> Self {
        Self {
            script: Script::new(responses),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Number of geocoder calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.queries.borrow().len()
    }

    /// Query texts received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Geocoder for StubGeocoder {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, ServiceError> {
        self.queries.borrow_mut().push(text.to_owned());
        self.script.next()
    }
}
