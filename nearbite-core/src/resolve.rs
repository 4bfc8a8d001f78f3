//! Route to the nearest qualifying candidate.

use log::{debug, warn};

use crate::{
    Candidate, DiscoveryError, FilteredSet, Location, Outcome, RoutePolyline, RoutingService,
    ServiceKind,
};

/// Polyline towards the nearest candidate of `filtered`.
///
/// No request is made when `filtered` is empty or `origin` is unresolved;
/// both yield an empty polyline. A routing failure also yields an empty
/// polyline, together with a signal. A response without routes or legs is
/// not a failure: it simply has nothing to draw.
pub async fn resolve_nearest_route(
    routing: &dyn RoutingService,
    origin: &Location,
    filtered: &FilteredSet,
) -> Outcome<RoutePolyline> {
    let Some(target) = filtered.nearest() else {
        return Outcome::clean(RoutePolyline::empty());
    };
    let Some(start) = origin.coordinates() else {
        return Outcome::degraded(
            RoutePolyline::empty(),
            DiscoveryError::UnresolvedLocation {
                operation: "route resolution",
            },
        );
    };
    route_to(routing, start, target).await
}

async fn route_to(
    routing: &dyn RoutingService,
    start: geo::Coord<f64>,
    target: &Candidate,
) -> Outcome<RoutePolyline> {
    debug!("requesting route to {} ({})", target.name, target.id);
    match routing.route(start, target.location).await {
        Ok(alternatives) => {
            let polyline = RoutePolyline::from_alternatives(&alternatives);
            if polyline.is_empty() {
                debug!("routing service returned no drawable route to {}", target.id);
            }
            Outcome::clean(polyline)
        }
        Err(error) => {
            warn!("routing to {} failed: {error}", target.id);
            Outcome::degraded(
                RoutePolyline::empty(),
                DiscoveryError::from_service(ServiceKind::Routing, error),
            )
        }
    }
}
