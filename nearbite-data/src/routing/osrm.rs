//! OSRM API response types for the Table and Route services.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service> and
//! <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use geo::Coord;
use nearbite_core::{RouteAlternative, RouteLeg, RouteStep};
use serde::Deserialize;

/// OSRM Table API response requested with `annotations=distance`.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoTable"` - Table computation failed
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Matrix of distances in metres, one row per source.
    ///
    /// Values are `None` when no route exists between a pair.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// OSRM Route API response requested with `steps=true&geometries=geojson`.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM; `"NoRoute"` when the points are not connected.
    pub code: String,
    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,
    /// Route alternatives, best first.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Convert into domain route alternatives.
    #[must_use]
    pub fn into_alternatives(self) -> Vec<RouteAlternative> {
        self.routes.into_iter().map(OsrmRoute::into_domain).collect()
    }
}

/// One route alternative.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

impl OsrmRoute {
    fn into_domain(self) -> RouteAlternative {
        RouteAlternative {
            legs: self
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    steps: leg.steps.into_iter().map(OsrmStep::into_domain).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    geometry: Option<GeoJsonLine>,
}

impl OsrmStep {
    fn into_domain(self) -> RouteStep {
        let geometry = self
            .geometry
            .map(|line| {
                line.coordinates
                    .into_iter()
                    .map(|[x, y]| Coord { x, y })
                    .collect()
            })
            .unwrap_or_default();
        RouteStep { geometry }
    }
}

/// GeoJSON `LineString` geometry; positions are `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_table_response() {
        let json = r#"{
            "code": "Ok",
            "distances": [[0.0, 512.4, null]]
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let distances = response.distances.expect("should have distances");
        assert_eq!(distances, vec![vec![Some(0.0), Some(512.4), None]]);
    }

    #[test]
    fn deserialise_table_error_response() {
        let json = r#"{
            "code": "InvalidQuery",
            "message": "Coordinates are invalid"
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert_eq!(response.message.as_deref(), Some("Coordinates are invalid"));
        assert!(response.distances.is_none());
    }

    #[test]
    fn route_steps_become_domain_geometry() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 812.3,
                "legs": [{
                    "steps": [
                        {"geometry": {"type": "LineString", "coordinates": [[106.0, 10.0], [106.01, 10.0]]}},
                        {"geometry": {"type": "LineString", "coordinates": [[106.01, 10.0], [106.02, 10.01]]}}
                    ]
                }]
            }]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        let alternatives = response.into_alternatives();

        let steps = &alternatives
            .first()
            .and_then(|route| route.legs.first())
            .expect("one leg")
            .steps;
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps.last().map(|step| step.geometry.clone()),
            Some(vec![Coord { x: 106.01, y: 10.0 }, Coord { x: 106.02, y: 10.01 }])
        );
    }

    #[test]
    fn missing_routes_and_geometry_default_to_empty() {
        let json = r#"{"code": "Ok", "routes": [{"legs": [{"steps": [{}]}]}]}"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        let alternatives = response.into_alternatives();

        assert_eq!(
            alternatives,
            vec![RouteAlternative {
                legs: vec![RouteLeg {
                    steps: vec![RouteStep::default()]
                }]
            }]
        );

        let bare: RouteResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#)
                .expect("should deserialise");
        assert!(!bare.is_ok());
        assert!(bare.routes.is_empty());
    }
}
