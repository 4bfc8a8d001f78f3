//! Session state controller.
//!
//! A [`Session`] owns the reference location, the latest search results and
//! everything derived from them. Each mutating transition runs the
//! derivation pipeline explicitly:
//!
//! ```text
//! search:    places -> distances -> OriginSet -> FilteredSet -> route
//! filter:                                        FilteredSet -> route
//! location:                                                     route
//! ```
//!
//! Network calls are the only suspension points. State is never borrowed
//! across an `.await`; instead every asynchronous transition takes a token
//! from a monotonic sequence before suspending and discards its response if
//! a newer transition of the same kind has started in the meantime.

mod state;
#[cfg(test)]
mod tests;

use std::cell::RefCell;

use geo::Coord;
use log::{debug, info, warn};

pub use state::{RequestStatus, SessionPhase, SessionSnapshot};
use state::SessionState;

use crate::{
    CandidateId, DEFAULT_MAP_CENTER, DiscoveryError, DistanceMatrix, FilterState, FilteredSet,
    Geocoder, Location, OriginSet, PlacesSearch, RoutePolyline, RoutingService, SearchSettings,
    ServiceKind, Suggestion, augment_distances, resolve_nearest_route, resolve_suggestions,
    search_candidates,
};

/// Collaborators a [`Session`] talks to.
#[derive(Clone, Copy)]
pub struct SessionServices<'a> {
    /// Nearby place lookup.
    pub places: &'a dyn PlacesSearch,
    /// Road-network distances from the reference location.
    pub distances: &'a dyn DistanceMatrix,
    /// Route geometry between two points.
    pub routing: &'a dyn RoutingService,
    /// Address autocomplete.
    pub geocoder: &'a dyn Geocoder,
}

impl std::fmt::Debug for SessionServices<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionServices").finish_non_exhaustive()
    }
}

/// Discovery session for a single user.
///
/// All methods take `&self` so that overlapping transitions can be driven
/// from one task, e.g. a second [`Session::search`] started while the first
/// is still waiting on the network.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use nearbite_core::test_support::{StubDistanceMatrix, StubGeocoder, StubPlaces, StubRouting};
/// use nearbite_core::{Location, SearchSettings, Session, SessionServices};
///
/// let places = StubPlaces::with_results(Vec::new());
/// let distances = StubDistanceMatrix::with_row(Vec::new());
/// let routing = StubRouting::with_alternatives(Vec::new());
/// let geocoder = StubGeocoder::with_suggestions(Vec::new());
/// let session = Session::new(
///     SessionServices {
///         places: &places,
///         distances: &distances,
///         routing: &routing,
///         geocoder: &geocoder,
///     },
///     SearchSettings::default(),
/// );
/// assert_eq!(session.map_center(), nearbite_core::DEFAULT_MAP_CENTER);
/// ```
#[derive(Debug)]
pub struct Session<'a> {
    services: SessionServices<'a>,
    settings: SearchSettings,
    state: RefCell<SessionState>,
}

impl<'a> Session<'a> {
    /// Create an idle session with an unresolved, empty location.
    #[must_use]
    pub fn new(services: SessionServices<'a>, settings: SearchSettings) -> Self {
        Self {
            services,
            settings,
            state: RefCell::new(SessionState::default()),
        }
    }

    /// Search settings in use.
    #[must_use]
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Current reference location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.state.borrow().location.clone()
    }

    /// Current search phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    /// Every candidate of the latest applied search, nearest first.
    #[must_use]
    pub fn origin_set(&self) -> OriginSet {
        self.state.borrow().origin.clone()
    }

    /// Candidates passing the current filter, nearest first.
    #[must_use]
    pub fn filtered(&self) -> FilteredSet {
        self.state.borrow().filtered.clone()
    }

    /// Route to the nearest filtered candidate; empty when there is none.
    #[must_use]
    pub fn route(&self) -> RoutePolyline {
        self.state.borrow().route.clone()
    }

    /// Current filter.
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        self.state.borrow().filter
    }

    /// Autocomplete suggestions for the last text edit.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.state.borrow().suggestions.clone()
    }

    /// Pending error, shown until dismissed or replaced.
    #[must_use]
    pub fn error(&self) -> Option<DiscoveryError> {
        self.state.borrow().error.clone()
    }

    /// Selected or hovered candidate.
    #[must_use]
    pub fn active(&self) -> Option<CandidateId> {
        self.state.borrow().active.clone()
    }

    /// Where a map should be centred: the reference location once resolved,
    /// otherwise [`DEFAULT_MAP_CENTER`].
    #[must_use]
    pub fn map_center(&self) -> Coord<f64> {
        self.state
            .borrow()
            .location
            .coordinates()
            .unwrap_or(DEFAULT_MAP_CENTER)
    }

    /// Copy of everything a presentation layer renders.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state.borrow())
    }

    /// Clear the error overlay.
    pub fn dismiss_error(&self) {
        self.state.borrow_mut().error = None;
    }

    /// Select `candidate`, or clear the selection with `None`.
    ///
    /// Only members of the current [`FilteredSet`] can be selected; returns
    /// `false` and leaves the selection untouched otherwise.
    pub fn set_active(&self, candidate: Option<CandidateId>) -> bool {
        let mut state = self.state.borrow_mut();
        match candidate {
            Some(id) if !state.filtered.contains(&id) => false,
            selection => {
                state.active = selection;
                true
            }
        }
    }

    /// Replace the reference location.
    ///
    /// In-flight searches and suggestion lookups are invalidated. When the
    /// new location is resolved and candidates are on display, the route is
    /// recomputed from the new origin.
    pub async fn set_location(&self, location: Location) -> RequestStatus {
        debug!("location set to {:?}", location.display_name());
        self.state.borrow_mut().replace_location(location);
        self.refresh_route().await
    }

    /// Apply a manual edit of the location text and fetch suggestions.
    ///
    /// The edit clears the coordinates, so the route is cleared as well
    /// until a suggestion is selected. Suggestions for an older keystroke are
    /// discarded.
    pub async fn edit_location_text(&self, text: &str) -> RequestStatus {
        let token = {
            let mut state = self.state.borrow_mut();
            let edited = std::mem::take(&mut state.location).with_text_edit(text);
            state.replace_location(edited);
            state.routes.advance();
            state.route = RoutePolyline::empty();
            state.keystrokes.current()
        };

        let (suggestions, signal) = resolve_suggestions(self.services.geocoder, text)
            .await
            .into_parts();

        let mut state = self.state.borrow_mut();
        if !state.keystrokes.is_current(token) {
            debug!("discarding suggestions for stale text {text:?}");
            return RequestStatus::Superseded;
        }
        state.suggestions = suggestions;
        state.record(signal);
        RequestStatus::Applied
    }

    /// Resolve the location from the suggestion at `index`.
    ///
    /// Returns `false` if there is no such suggestion or its coordinates are
    /// out of range; the latter is recorded as a malformed geocoder response.
    pub async fn select_suggestion(&self, index: usize) -> bool {
        let picked = self.state.borrow().suggestions.get(index).cloned();
        let Some(suggestion) = picked else {
            return false;
        };
        match suggestion.to_location() {
            Ok(location) => {
                let status = self.set_location(location).await;
                debug!("suggestion {index} selected; route refresh {status:?}");
                true
            }
            Err(error) => {
                warn!("geocoder suggestion {index} is unusable: {error}");
                let mut state = self.state.borrow_mut();
                state.suggestions.clear();
                state.error = Some(DiscoveryError::MalformedResponse {
                    service: ServiceKind::Geocoder,
                    message: error.to_string(),
                });
                false
            }
        }
    }

    /// Search around the current location and rebuild every derived set.
    ///
    /// Without resolved coordinates nothing is requested, an
    /// [`DiscoveryError::UnresolvedLocation`] error is recorded and
    /// [`RequestStatus::Skipped`] is returned. A later search or location
    /// change supersedes this one; its results are then dropped.
    ///
    /// A failed place search completes with an empty [`OriginSet`]; a
    /// failed distance lookup keeps the candidates without distances. Both
    /// record an error, which replaces any earlier one. A clean search clears
    /// the error overlay.
    pub async fn search(&self) -> RequestStatus {
        let (token, origin) = {
            let mut state = self.state.borrow_mut();
            if !state.location.is_resolved() {
                warn!("search requested before the location was resolved");
                state.error = Some(DiscoveryError::UnresolvedLocation {
                    operation: "search",
                });
                return RequestStatus::Skipped;
            }
            state.phase = SessionPhase::Searching;
            (state.searches.advance(), state.location.clone())
        };

        let (found, places_signal) =
            search_candidates(self.services.places, &self.settings, &origin)
                .await
                .into_parts();
        if !self.state.borrow().searches.is_current(token) {
            debug!("search {token} superseded before distance lookup");
            return RequestStatus::Superseded;
        }

        let (augmented, distance_signal) =
            augment_distances(self.services.distances, &origin, found)
                .await
                .into_parts();

        {
            let mut state = self.state.borrow_mut();
            if !state.searches.is_current(token) {
                debug!("search {token} superseded; discarding its results");
                return RequestStatus::Superseded;
            }
            state.origin = OriginSet::from_augmented(augmented);
            state.phase = SessionPhase::Ready;
            state.error = places_signal.or(distance_signal);
            state.refilter();
            info!(
                "search around {:?} found {} candidates, {} pass the filter",
                origin.display_name(),
                state.origin.len(),
                state.filtered.len()
            );
        }

        let status = self.refresh_route().await;
        debug!("route after search {token}: {status:?}");
        RequestStatus::Applied
    }

    /// Replace the filter and recompute the filtered set and route.
    ///
    /// Never repeats the place search or distance lookup.
    pub async fn set_filter(&self, filter: FilterState) -> RequestStatus {
        {
            let mut state = self.state.borrow_mut();
            state.filter = filter;
            state.refilter();
            debug!(
                "filter {filter:?} keeps {} of {} candidates",
                state.filtered.len(),
                state.origin.len()
            );
        }
        self.refresh_route().await
    }

    async fn refresh_route(&self) -> RequestStatus {
        let (token, origin, filtered) = {
            let mut state = self.state.borrow_mut();
            let token = state.routes.advance();
            if !state.location.is_resolved() || state.filtered.is_empty() {
                state.route = RoutePolyline::empty();
                return RequestStatus::Skipped;
            }
            (token, state.location.clone(), state.filtered.clone())
        };

        let (route, signal) = resolve_nearest_route(self.services.routing, &origin, &filtered)
            .await
            .into_parts();

        let mut state = self.state.borrow_mut();
        if !state.routes.is_current(token) {
            debug!("route {token} superseded; discarding it");
            return RequestStatus::Superseded;
        }
        state.route = route;
        state.record(signal);
        RequestStatus::Applied
    }
}
