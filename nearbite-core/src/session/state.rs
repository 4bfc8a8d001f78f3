//! State owned by a [`super::Session`].

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    Candidate, CandidateId, DiscoveryError, FilterState, FilteredSet, Location, OriginSet,
    RoutePolyline, Suggestion, filter_candidates,
};

/// Search lifecycle of a session.
///
/// Errors are an overlay ([`super::Session::error`]) and never block a
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionPhase {
    /// No search has completed yet.
    #[default]
    Idle,
    /// A search is in flight.
    Searching,
    /// The latest search has completed, successfully or not.
    Ready,
}

/// What happened to the response of an asynchronous session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// The response was written into the session.
    Applied,
    /// A newer operation started first; the response was discarded.
    Superseded,
    /// Preconditions were not met, so nothing was requested.
    Skipped,
}

/// Monotonic request sequence used to recognise stale responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Sequence(u64);

impl Sequence {
    pub(super) const fn advance(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub(super) const fn current(self) -> u64 {
        self.0
    }

    pub(super) const fn is_current(self, token: u64) -> bool {
        self.0 == token
    }
}

#[derive(Debug, Default)]
pub(super) struct SessionState {
    pub(super) phase: SessionPhase,
    pub(super) location: Location,
    pub(super) suggestions: Vec<Suggestion>,
    pub(super) origin: OriginSet,
    pub(super) filter: FilterState,
    pub(super) filtered: FilteredSet,
    pub(super) route: RoutePolyline,
    pub(super) active: Option<CandidateId>,
    pub(super) error: Option<DiscoveryError>,
    pub(super) searches: Sequence,
    pub(super) routes: Sequence,
    pub(super) keystrokes: Sequence,
}

impl SessionState {
    /// Replace the location and invalidate everything derived from the old
    /// one that is still in flight.
    pub(super) fn replace_location(&mut self, location: Location) {
        self.location = location;
        self.searches.advance();
        self.keystrokes.advance();
        self.suggestions.clear();
        if self.phase == SessionPhase::Searching {
            self.phase = if self.origin.is_empty() {
                SessionPhase::Idle
            } else {
                SessionPhase::Ready
            };
        }
    }

    /// Recompute the filtered set from the origin set and filter.
    pub(super) fn refilter(&mut self) {
        self.filtered = filter_candidates(&self.origin, &self.filter);
        if self
            .active
            .as_ref()
            .is_some_and(|id| !self.filtered.contains(id))
        {
            self.active = None;
        }
    }

    pub(super) fn record(&mut self, signal: Option<DiscoveryError>) {
        if signal.is_some() {
            self.error = signal;
        }
    }
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SessionSnapshot {
    /// Current search phase.
    pub phase: SessionPhase,
    /// Reference location.
    pub location: Location,
    /// Active filter.
    pub filter: FilterState,
    /// Candidates passing the filter, nearest first.
    pub candidates: Vec<Candidate>,
    /// Candidate the route leads to.
    pub nearest: Option<CandidateId>,
    /// Selected or hovered candidate.
    pub active: Option<CandidateId>,
    /// Route to [`SessionSnapshot::nearest`].
    pub route: RoutePolyline,
    /// Pending error message, if not dismissed.
    pub error: Option<String>,
}

impl SessionSnapshot {
    pub(super) fn capture(state: &SessionState) -> Self {
        Self {
            phase: state.phase,
            location: state.location.clone(),
            filter: state.filter,
            candidates: state.filtered.as_slice().to_vec(),
            nearest: state.filtered.nearest().map(|c| c.id.clone()),
            active: state.active.clone(),
            route: state.route.clone(),
            error: state.error.as_ref().map(ToString::to_string),
        }
    }
}
