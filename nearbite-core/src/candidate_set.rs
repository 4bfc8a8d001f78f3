//! Ordered candidate collections owned by the session.
//!
//! [`OriginSet`] is the distance-sorted result of one search and is only
//! ever replaced wholesale. [`FilteredSet`] is derived from it by
//! [`crate::filter_candidates`] and cannot be built any other way, so it is
//! always an order-preserving subset of its origin.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Candidate, CandidateId};

/// Full, distance-augmented candidate list of the latest search.
///
/// Candidates are sorted ascending by [`Candidate::distance_meters`].
/// Unknown distances sort after every known distance; the sort is stable so
/// equal distances keep the order the search returned them in.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nearbite_core::{Candidate, OriginSet};
///
/// # fn main() -> Result<(), nearbite_core::CandidateError> {
/// let a = Candidate::new("a", "A", "", Coord { x: 0.0, y: 0.0 }).with_distance(500.0)?;
/// let b = Candidate::new("b", "B", "", Coord { x: 0.0, y: 0.0 }).with_distance(200.0)?;
/// let set = OriginSet::from_augmented(vec![a, b]);
/// let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
/// assert_eq!(ids, ["b", "a"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OriginSet(Vec<Candidate>);

impl OriginSet {
    /// Sort augmented candidates into a new origin set.
    #[must_use]
    pub fn from_augmented(mut candidates: Vec<Candidate>) -> Self {
        candidates.sort_by(|a, b| compare_distance(a.distance_meters, b.distance_meters));
        Self(candidates)
    }

    /// Candidates in distance order.
    #[must_use]
    pub const fn as_slice(&self) -> &[Candidate] {
        self.0.as_slice()
    }

    /// Iterate candidates in distance order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the search found nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a OriginSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [`OriginSet`] restricted by the active filter.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FilteredSet(Vec<Candidate>);

impl FilteredSet {
    pub(crate) const fn from_subset(candidates: Vec<Candidate>) -> Self {
        Self(candidates)
    }

    /// Candidates in distance order.
    #[must_use]
    pub const fn as_slice(&self) -> &[Candidate] {
        self.0.as_slice()
    }

    /// Iterate candidates in distance order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    /// Number of candidates that passed the filter.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no candidate passed the filter.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a candidate with `id` passed the filter.
    #[must_use]
    pub fn contains(&self, id: &CandidateId) -> bool {
        self.0.iter().any(|candidate| &candidate.id == id)
    }

    /// Nearest candidate; the first one wins on equal distances.
    ///
    /// Unknown distances only win when no candidate has a known distance.
    #[must_use]
    pub fn nearest(&self) -> Option<&Candidate> {
        self.0.iter().reduce(|best, next| {
            if compare_distance(next.distance_meters, best.distance_meters) == Ordering::Less {
                next
            } else {
                best
            }
        })
    }
}

impl<'a> IntoIterator for &'a FilteredSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn compare_distance(lhs: Option<f64>, rhs: Option<f64>) -> Ordering {
    match (lhs, rhs) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
