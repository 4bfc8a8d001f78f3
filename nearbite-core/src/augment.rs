//! Attach road-network distances to search results.
//!
//! One distance-matrix request is issued per search: the reference location
//! goes first and is the only source, every candidate follows in input
//! order. Entry `i + 1` of the returned row belongs to candidate `i`, so the
//! candidates must not be reordered before the distances are attached.

use geo::Coord;
use log::{debug, warn};

use crate::{Candidate, DiscoveryError, DistanceMatrix, Location, Outcome, ServiceKind};

/// Attach `distance_meters` to every candidate, keeping length and order.
///
/// Preconditions and degradations:
/// - unresolved `origin`: candidates are returned unchanged with an
///   [`DiscoveryError::UnresolvedLocation`] signal and no request is made;
/// - no candidates: nothing to do, no request is made;
/// - short row: candidates past the end keep `distance_meters == None`;
/// - `null`, negative or non-finite entries leave the distance unset;
/// - request failure: candidates are returned unchanged with a signal.
pub async fn augment_distances(
    matrix: &dyn DistanceMatrix,
    origin: &Location,
    candidates: Vec<Candidate>,
) -> Outcome<Vec<Candidate>> {
    let Some(source) = origin.coordinates() else {
        return Outcome::degraded(
            candidates,
            DiscoveryError::UnresolvedLocation {
                operation: "distance augmentation",
            },
        );
    };
    if candidates.is_empty() {
        return Outcome::clean(candidates);
    }

    let coordinates: Vec<Coord<f64>> = std::iter::once(source)
        .chain(candidates.iter().map(|candidate| candidate.location))
        .collect();

    let row = match matrix.distances_from_first(&coordinates).await {
        Ok(row) => row,
        Err(error) => {
            warn!("distance matrix request failed: {error}");
            return Outcome::degraded(
                candidates,
                DiscoveryError::from_service(ServiceKind::DistanceMatrix, error),
            );
        }
    };

    if row.len() < coordinates.len() {
        debug!(
            "distance row has {} entries for {} coordinates; trailing candidates stay unmeasured",
            row.len(),
            coordinates.len()
        );
    }

    let destinations = row.into_iter().skip(1).map(Some).chain(std::iter::repeat(None));
    let augmented = candidates
        .into_iter()
        .zip(destinations)
        .map(|(mut candidate, entry)| {
            candidate.distance_meters = entry.flatten().filter(|d| *d >= 0.0 && d.is_finite());
            candidate
        })
        .collect();
    Outcome::clean(augmented)
}
