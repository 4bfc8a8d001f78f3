//! Discovery error taxonomy and the degraded-result carrier.
//!
//! Leaf components never fail outright. They return an [`Outcome`]: the
//! best value they could produce (often empty or unchanged) plus an
//! optional [`DiscoveryError`] describing what went wrong.

use std::fmt;

use thiserror::Error;

use crate::ServiceError;

/// Collaborator that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Free-text location suggestions.
    Geocoder,
    /// Place discovery around a point.
    PlacesSearch,
    /// One-to-many road distances.
    DistanceMatrix,
    /// Turn-by-turn routing.
    Routing,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Geocoder => "geocoder",
            Self::PlacesSearch => "places search",
            Self::DistanceMatrix => "distance matrix",
            Self::Routing => "routing",
        })
    }
}

/// Recoverable problems surfaced by the discovery pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// An operation needed coordinates but the location is unresolved.
    #[error("{operation} requires a resolved location")]
    UnresolvedLocation {
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// A collaborator request failed.
    #[error("{service} request failed: {source}")]
    CollaboratorFailure {
        /// Failing collaborator.
        service: ServiceKind,
        /// Underlying service error.
        #[source]
        source: ServiceError,
    },

    /// A collaborator answered with a payload of the wrong shape.
    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse {
        /// Failing collaborator.
        service: ServiceKind,
        /// What was wrong with the payload.
        message: String,
    },
}

impl DiscoveryError {
    /// Classify a collaborator error.
    #[must_use]
    pub fn from_service(service: ServiceKind, error: ServiceError) -> Self {
        match error {
            ServiceError::Parse { message } => Self::MalformedResponse { service, message },
            source => Self::CollaboratorFailure { service, source },
        }
    }

    /// Collaborator involved, if any.
    #[must_use]
    pub const fn service(&self) -> Option<ServiceKind> {
        match self {
            Self::UnresolvedLocation { .. } => None,
            Self::CollaboratorFailure { service, .. } | Self::MalformedResponse { service, .. } => {
                Some(*service)
            }
        }
    }
}

/// A value together with an optional failure signal.
///
/// # Examples
/// ```
/// use nearbite_core::{DiscoveryError, Outcome};
///
/// let clean = Outcome::clean(3);
/// assert!(clean.signal().is_none());
///
/// let degraded = Outcome::degraded(0, DiscoveryError::UnresolvedLocation { operation: "search" });
/// let (value, signal) = degraded.into_parts();
/// assert_eq!(value, 0);
/// assert!(signal.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    value: T,
    signal: Option<DiscoveryError>,
}

impl<T> Outcome<T> {
    /// A result produced without problems.
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            signal: None,
        }
    }

    /// A fallback result accompanied by the reason it is degraded.
    pub const fn degraded(value: T, signal: DiscoveryError) -> Self {
        Self {
            value,
            signal: Some(signal),
        }
    }

    /// Borrow the value.
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Borrow the failure signal, if any.
    pub const fn signal(&self) -> Option<&DiscoveryError> {
        self.signal.as_ref()
    }

    /// Whether the value was produced without problems.
    pub const fn is_clean(&self) -> bool {
        self.signal.is_none()
    }

    /// Split into value and signal.
    pub fn into_parts(self) -> (T, Option<DiscoveryError>) {
        (self.value, self.signal)
    }

    /// Take the value, discarding the signal.
    pub fn into_value(self) -> T {
        self.value
    }
}
