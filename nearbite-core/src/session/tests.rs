//! Unit tests for the session controller.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use geo::Coord;
use rstest::{fixture, rstest};
use tokio::sync::oneshot;

use super::*;
use crate::test_support::{StubDistanceMatrix, StubGeocoder, StubPlaces, StubRouting};
use crate::{
    Candidate, DistanceRow, PriceLevel, RouteAlternative, RouteLeg, RouteStep, ServiceError,
};

const HOME: Coord<f64> = Coord { x: 106.0, y: 10.0 };

fn home() -> Location {
    Location::resolved("Home", HOME).expect("valid location")
}

fn place(id: &str, x: f64) -> Candidate {
    Candidate::new(id, id.to_uppercase(), "", Coord { x, y: 10.0 })
}

fn nearby() -> Vec<Candidate> {
    vec![
        place("a", 106.01)
            .with_price_level(PriceLevel::Inexpensive)
            .with_rating(4.5)
            .expect("valid rating"),
        place("b", 106.02)
            .with_price_level(PriceLevel::Moderate)
            .with_rating(3.9)
            .expect("valid rating"),
        place("c", 106.03)
            .with_price_level(PriceLevel::Inexpensive)
            .with_rating(4.1)
            .expect("valid rating"),
    ]
}

fn row() -> DistanceRow {
    vec![Some(0.0), Some(500.0), Some(200.0), Some(800.0)]
}

fn one_route() -> Vec<RouteAlternative> {
    vec![RouteAlternative {
        legs: vec![RouteLeg {
            steps: vec![RouteStep {
                geometry: vec![HOME, Coord { x: 106.02, y: 10.0 }],
            }],
        }],
    }]
}

fn ids(set: &FilteredSet) -> Vec<&str> {
    set.iter().map(|c| c.id.as_str()).collect()
}

struct Stubs {
    places: StubPlaces,
    distances: StubDistanceMatrix,
    routing: StubRouting,
    geocoder: StubGeocoder,
}

impl Stubs {
    fn session(&self) -> Session<'_> {
        Session::new(
            SessionServices {
                places: &self.places,
                distances: &self.distances,
                routing: &self.routing,
                geocoder: &self.geocoder,
            },
            SearchSettings::default(),
        )
    }
}

#[fixture]
fn stubs() -> Stubs {
    Stubs {
        places: StubPlaces::with_results(nearby()),
        distances: StubDistanceMatrix::with_row(row()),
        routing: StubRouting::with_alternatives(one_route()),
        geocoder: StubGeocoder::with_suggestions(vec![Suggestion {
            display_name: "Ben Thanh Market".to_owned(),
            coordinates: HOME,
        }]),
    }
}

/// Responses handed over by the test through oneshot channels, one per call.
struct Gates<T> {
    pending: RefCell<VecDeque<oneshot::Receiver<T>>>,
}

impl<T> Gates<T> {
    fn new(receivers: impl IntoIterator<Item = oneshot::Receiver<T>>) -> Self {
        Self {
            pending: RefCell::new(receivers.into_iter().collect()),
        }
    }

    async fn next(&self) -> Result<T, ServiceError> {
        let gate = self.pending.borrow_mut().pop_front();
        let closed = || ServiceError::Network {
            url: "gate://closed".to_owned(),
            message: "gate closed".to_owned(),
        };
        let Some(receiver) = gate else {
            return Err(closed());
        };
        receiver.await.map_err(|_| closed())
    }
}

struct GatedMatrix(Gates<DistanceRow>);

#[async_trait(?Send)]
impl DistanceMatrix for GatedMatrix {
    async fn distances_from_first(&self, _: &[Coord<f64>]) -> Result<DistanceRow, ServiceError> {
        self.0.next().await
    }
}

struct GatedRouting(Gates<Vec<RouteAlternative>>);

#[async_trait(?Send)]
impl RoutingService for GatedRouting {
    async fn route(
        &self,
        _: Coord<f64>,
        _: Coord<f64>,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        self.0.next().await
    }
}

struct GatedGeocoder(Gates<Vec<Suggestion>>);

#[async_trait(?Send)]
impl Geocoder for GatedGeocoder {
    async fn suggest(&self, _: &str) -> Result<Vec<Suggestion>, ServiceError> {
        self.0.next().await
    }
}

#[rstest]
#[tokio::test]
async fn search_builds_sorted_filtered_set_and_routes_to_nearest(stubs: Stubs) {
    let session = stubs.session();
    assert_eq!(session.set_location(home()).await, RequestStatus::Skipped);

    assert_eq!(session.search().await, RequestStatus::Applied);

    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(ids(&session.filtered()), ["b", "a", "c"]);
    assert_eq!(session.origin_set().len(), 3);
    assert_eq!(session.route().len(), 2);
    assert_eq!(stubs.routing.requests(), vec![(HOME, Coord { x: 106.02, y: 10.0 })]);
    assert_eq!(session.error(), None);
}

#[rstest]
#[tokio::test]
async fn search_without_coordinates_is_skipped(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(Location::unresolved("Somewhere")).await;

    assert_eq!(session.search().await, RequestStatus::Skipped);

    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(stubs.places.requests().is_empty());
    assert_eq!(
        session.error(),
        Some(DiscoveryError::UnresolvedLocation {
            operation: "search"
        })
    );
}

#[rstest]
#[tokio::test]
async fn failed_search_completes_empty_with_error() {
    let stubs = Stubs {
        places: StubPlaces::with_error(ServiceError::Timeout {
            url: "http://places.test/search-places".to_owned(),
            timeout_secs: 30,
        }),
        ..stubs()
    };
    let session = stubs.session();
    let _status = session.set_location(home()).await;

    assert_eq!(session.search().await, RequestStatus::Applied);

    assert_eq!(session.phase(), SessionPhase::Ready);
    assert!(session.origin_set().is_empty());
    assert!(session.route().is_empty());
    assert!(stubs.routing.requests().is_empty());
    assert_eq!(
        session.error().and_then(|e| e.service()),
        Some(ServiceKind::PlacesSearch)
    );

    session.dismiss_error();
    assert_eq!(session.error(), None);
}

#[rstest]
#[tokio::test]
async fn failed_distance_lookup_keeps_candidates_unmeasured() {
    let stubs = Stubs {
        distances: StubDistanceMatrix::with_error(ServiceError::Upstream {
            code: "NoTable".to_owned(),
            message: "no table".to_owned(),
        }),
        ..stubs()
    };
    let session = stubs.session();
    let _status = session.set_location(home()).await;

    let _search = session.search().await;

    let filtered = session.filtered();
    assert_eq!(ids(&filtered), ["a", "b", "c"]);
    assert!(filtered.iter().all(|c| c.distance_meters.is_none()));
    assert_eq!(
        session.error().and_then(|e| e.service()),
        Some(ServiceKind::DistanceMatrix)
    );
}

#[rstest]
#[tokio::test]
async fn failed_route_keeps_the_candidate_list() {
    let stubs = Stubs {
        routing: StubRouting::with_error(ServiceError::Http {
            url: "http://osrm.test/route".to_owned(),
            status: 502,
            message: "bad gateway".to_owned(),
        }),
        ..stubs()
    };
    let session = stubs.session();
    let _status = session.set_location(home()).await;

    let _search = session.search().await;

    assert_eq!(session.filtered().len(), 3);
    assert!(session.route().is_empty());
    assert_eq!(
        session.error().and_then(|e| e.service()),
        Some(ServiceKind::Routing)
    );
}

#[rstest]
#[tokio::test]
async fn filter_change_reroutes_without_searching_again(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(home()).await;
    let _search = session.search().await;

    let filter = FilterState::default()
        .with_min_rating(4.0)
        .expect("valid rating");
    assert_eq!(session.set_filter(filter).await, RequestStatus::Applied);

    assert_eq!(ids(&session.filtered()), ["a", "c"]);
    assert_eq!(stubs.places.requests().len(), 1);
    assert_eq!(stubs.distances.requests().len(), 1);
    let routed_to: Vec<_> = stubs.routing.requests().into_iter().map(|(_, to)| to).collect();
    assert_eq!(
        routed_to,
        [Coord { x: 106.02, y: 10.0 }, Coord { x: 106.01, y: 10.0 }]
    );
}

#[rstest]
#[tokio::test]
async fn filter_excluding_everything_clears_the_route(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(home()).await;
    let _search = session.search().await;

    let filter = FilterState::default().with_price_level(PriceLevel::VeryExpensive);
    assert_eq!(session.set_filter(filter).await, RequestStatus::Skipped);

    assert!(session.filtered().is_empty());
    assert!(session.route().is_empty());
    assert_eq!(session.origin_set().len(), 3);
}

#[rstest]
#[tokio::test]
async fn selection_follows_the_filtered_set(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(home()).await;
    let _search = session.search().await;

    assert!(!session.set_active(Some(CandidateId::from("zzz"))));
    assert!(session.set_active(Some(CandidateId::from("b"))));
    assert_eq!(session.active(), Some(CandidateId::from("b")));

    let filter = FilterState::default().with_price_level(PriceLevel::Inexpensive);
    let _reroute = session.set_filter(filter).await;

    assert_eq!(session.active(), None);
}

#[rstest]
#[tokio::test]
async fn text_edit_clears_coordinates_and_route(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(home()).await;
    let _search = session.search().await;

    assert_eq!(
        session.edit_location_text("Ben Th").await,
        RequestStatus::Applied
    );

    assert!(!session.location().is_resolved());
    assert_eq!(session.location().display_name(), "Ben Th");
    assert!(session.route().is_empty());
    assert_eq!(session.suggestions().len(), 1);
    assert_eq!(stubs.geocoder.queries(), ["Ben Th"]);
}

#[rstest]
#[tokio::test]
async fn selecting_a_suggestion_resolves_the_location_and_reroutes(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(home()).await;
    let _search = session.search().await;
    let _edit = session.edit_location_text("Ben Th").await;

    assert!(session.select_suggestion(0).await);

    assert_eq!(session.location().coordinates(), Some(HOME));
    assert_eq!(session.location().display_name(), "Ben Thanh Market");
    assert!(session.suggestions().is_empty());
    assert_eq!(session.route().len(), 2);
    assert_eq!(stubs.routing.requests().len(), 2);
}

#[rstest]
#[tokio::test]
async fn selecting_a_missing_suggestion_changes_nothing(stubs: Stubs) {
    let session = stubs.session();

    assert!(!session.select_suggestion(3).await);

    assert_eq!(session.location(), Location::default());
}

#[rstest]
#[tokio::test]
async fn out_of_range_suggestion_is_reported_as_malformed() {
    let stubs = Stubs {
        geocoder: StubGeocoder::with_suggestions(vec![Suggestion {
            display_name: "Nowhere".to_owned(),
            coordinates: Coord { x: 0.0, y: 123.0 },
        }]),
        ..stubs()
    };
    let session = stubs.session();
    let _edit = session.edit_location_text("Now").await;

    assert!(!session.select_suggestion(0).await);

    assert!(matches!(
        session.error(),
        Some(DiscoveryError::MalformedResponse {
            service: ServiceKind::Geocoder,
            ..
        })
    ));
    assert!(!session.location().is_resolved());
}

#[rstest]
#[tokio::test]
async fn second_search_supersedes_the_first() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let places = StubPlaces::with_sequence([Ok(nearby()), Ok(vec![place("d", 106.04)])]);
    let distances = GatedMatrix(Gates::new([first_rx, second_rx]));
    let routing = StubRouting::with_alternatives(one_route());
    let geocoder = StubGeocoder::with_suggestions(Vec::new());
    let session = Session::new(
        SessionServices {
            places: &places,
            distances: &distances,
            routing: &routing,
            geocoder: &geocoder,
        },
        SearchSettings::default(),
    );
    let _status = session.set_location(home()).await;

    let (first, second, ()) = tokio::join!(session.search(), session.search(), async {
        let _late = second_tx.send(vec![Some(0.0), Some(300.0)]);
        let _stale = first_tx.send(row());
    });

    assert_eq!(first, RequestStatus::Superseded);
    assert_eq!(second, RequestStatus::Applied);
    assert_eq!(ids(&session.filtered()), ["d"]);
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(routing.requests(), vec![(HOME, Coord { x: 106.04, y: 10.0 })]);
}

#[rstest]
#[tokio::test]
async fn location_change_discards_the_search_in_flight() {
    let (tx, rx) = oneshot::channel();
    let places = StubPlaces::with_results(nearby());
    let distances = GatedMatrix(Gates::new([rx]));
    let routing = StubRouting::with_alternatives(one_route());
    let geocoder = StubGeocoder::with_suggestions(Vec::new());
    let session = Session::new(
        SessionServices {
            places: &places,
            distances: &distances,
            routing: &routing,
            geocoder: &geocoder,
        },
        SearchSettings::default(),
    );
    let _status = session.set_location(home()).await;
    let elsewhere =
        Location::resolved("Elsewhere", Coord { x: 105.8, y: 21.0 }).expect("valid location");

    let (searched, moved) = tokio::join!(session.search(), async {
        let status = session.set_location(elsewhere).await;
        let _sent = tx.send(row());
        status
    });

    assert_eq!(searched, RequestStatus::Superseded);
    assert_eq!(moved, RequestStatus::Skipped);
    assert!(session.origin_set().is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.location().display_name(), "Elsewhere");
}

#[rstest]
#[tokio::test]
async fn stale_suggestions_are_discarded() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let stubs = stubs();
    let geocoder = GatedGeocoder(Gates::new([first_rx, second_rx]));
    let session = Session::new(
        SessionServices {
            places: &stubs.places,
            distances: &stubs.distances,
            routing: &stubs.routing,
            geocoder: &geocoder,
        },
        SearchSettings::default(),
    );
    let suggestion = |name: &str| Suggestion {
        display_name: name.to_owned(),
        coordinates: HOME,
    };

    let (first, second, ()) = tokio::join!(
        session.edit_location_text("Ben"),
        session.edit_location_text("Ben Thanh"),
        async {
            let _fresh = second_tx.send(vec![suggestion("Ben Thanh Market")]);
            let _stale = first_tx.send(vec![suggestion("Ben Luc")]);
        }
    );

    assert_eq!(first, RequestStatus::Superseded);
    assert_eq!(second, RequestStatus::Applied);
    let names: Vec<_> = session
        .suggestions()
        .into_iter()
        .map(|s| s.display_name)
        .collect();
    assert_eq!(names, ["Ben Thanh Market"]);
}

fn route_through(points: &[(f64, f64)]) -> Vec<RouteAlternative> {
    vec![RouteAlternative {
        legs: vec![RouteLeg {
            steps: vec![RouteStep {
                geometry: points.iter().map(|&(x, y)| Coord { x, y }).collect(),
            }],
        }],
    }]
}

#[rstest]
#[tokio::test]
async fn filter_change_discards_the_route_of_the_search_in_flight(stubs: Stubs) {
    let (stale_tx, stale_rx) = oneshot::channel();
    let (fresh_tx, fresh_rx) = oneshot::channel();
    let routing = GatedRouting(Gates::new([stale_rx, fresh_rx]));
    let session = Session::new(
        SessionServices {
            places: &stubs.places,
            distances: &stubs.distances,
            routing: &routing,
            geocoder: &stubs.geocoder,
        },
        SearchSettings::default(),
    );
    let _status = session.set_location(home()).await;
    let stale = route_through(&[(106.0, 10.0), (106.01, 10.01), (106.015, 10.0), (106.02, 10.0)]);
    let fresh = route_through(&[(106.0, 10.0), (106.005, 10.0), (106.01, 10.0)]);
    let four_stars = FilterState::default()
        .with_min_rating(4.0)
        .expect("valid threshold");

    let (searched, filtered, ()) = tokio::join!(
        session.search(),
        session.set_filter(four_stars),
        async {
            let _fresh = fresh_tx.send(fresh.clone());
            let _stale = stale_tx.send(stale);
        }
    );

    assert_eq!(searched, RequestStatus::Applied);
    assert_eq!(filtered, RequestStatus::Applied);
    assert_eq!(ids(&session.filtered()), ["a", "c"]);
    assert_eq!(session.route(), RoutePolyline::from_alternatives(&fresh));
}

#[rstest]
#[tokio::test]
async fn older_route_response_arriving_last_is_superseded(stubs: Stubs) {
    let (initial_tx, initial_rx) = oneshot::channel();
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let routing = GatedRouting(Gates::new([initial_rx, first_rx, second_rx]));
    let session = Session::new(
        SessionServices {
            places: &stubs.places,
            distances: &stubs.distances,
            routing: &routing,
            geocoder: &stubs.geocoder,
        },
        SearchSettings::default(),
    );
    let _status = session.set_location(home()).await;
    let _initial = initial_tx.send(one_route());
    let _search = session.search().await;
    let to_b = route_through(&[(106.0, 10.0), (106.01, 10.01), (106.02, 10.0)]);
    let to_a = route_through(&[(106.0, 10.0), (106.01, 10.0)]);
    let moderate = FilterState::default().with_price_level(PriceLevel::Moderate);
    let four_stars = FilterState::default()
        .with_min_rating(4.0)
        .expect("valid threshold");

    let (first, second, ()) = tokio::join!(
        session.set_filter(moderate),
        session.set_filter(four_stars),
        async {
            let _fresh = second_tx.send(to_a.clone());
            let _stale = first_tx.send(to_b);
        }
    );

    assert_eq!(first, RequestStatus::Superseded);
    assert_eq!(second, RequestStatus::Applied);
    assert_eq!(session.filter_state(), four_stars);
    assert_eq!(session.route(), RoutePolyline::from_alternatives(&to_a));
}

#[rstest]
#[tokio::test]
async fn map_centre_follows_the_resolved_location(stubs: Stubs) {
    let session = stubs.session();
    assert_eq!(session.map_center(), DEFAULT_MAP_CENTER);

    let _status = session.set_location(home()).await;

    assert_eq!(session.map_center(), HOME);
}

#[rstest]
#[tokio::test]
async fn snapshot_names_the_routed_candidate(stubs: Stubs) {
    let session = stubs.session();
    let _status = session.set_location(home()).await;
    let _search = session.search().await;

    let snapshot = session.snapshot();

    assert_eq!(snapshot.nearest, Some(CandidateId::from("b")));
    assert_eq!(snapshot.candidates.len(), 3);
    assert_eq!(snapshot.route.len(), 2);
    assert_eq!(snapshot.error, None);
}
