//! Route geometry returned by the routing service.
//!
//! The routing service answers with a list of alternatives, each split into
//! legs and steps. Only the first leg of the first alternative is drawn; its
//! step geometries are concatenated into one [`RoutePolyline`].

use geo::{Coord, LineString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One manoeuvre of a route leg with its own geometry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteStep {
    /// Ordered coordinates, `x = longitude`, `y = latitude`.
    pub geometry: Vec<Coord<f64>>,
}

/// Part of a route between two waypoints.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteLeg {
    /// Steps in travel order.
    pub steps: Vec<RouteStep>,
}

/// One route alternative proposed by the routing service.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteAlternative {
    /// Legs in travel order.
    pub legs: Vec<RouteLeg>,
}

/// Ordered path from the reference location to the nearest candidate.
///
/// An empty polyline means "no route to display".
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nearbite_core::{RouteAlternative, RouteLeg, RoutePolyline, RouteStep};
///
/// let alternatives = vec![RouteAlternative {
///     legs: vec![RouteLeg {
///         steps: vec![
///             RouteStep { geometry: vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 }] },
///             RouteStep { geometry: vec![Coord { x: 0.0, y: 1.0 }, Coord { x: 1.0, y: 1.0 }] },
///         ],
///     }],
/// }];
/// let polyline = RoutePolyline::from_alternatives(&alternatives);
/// assert_eq!(polyline.len(), 4);
/// assert!(RoutePolyline::from_alternatives(&[]).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoutePolyline(LineString<f64>);

impl Default for RoutePolyline {
    fn default() -> Self {
        Self::empty()
    }
}

impl RoutePolyline {
    /// The "no route" polyline.
    #[must_use]
    pub fn empty() -> Self {
        Self(LineString::new(Vec::new()))
    }

    /// Wrap an ordered list of points.
    #[must_use]
    pub fn new(points: Vec<Coord<f64>>) -> Self {
        Self(LineString::new(points))
    }

    /// Flatten the first leg of the first alternative.
    ///
    /// Missing alternatives or legs yield an empty polyline. Points shared
    /// between consecutive steps are kept as the service sent them.
    #[must_use]
    pub fn from_alternatives(alternatives: &[RouteAlternative]) -> Self {
        let points = alternatives
            .first()
            .and_then(|route| route.legs.first())
            .map(|leg| {
                leg.steps
                    .iter()
                    .flat_map(|step| step.geometry.iter().copied())
                    .collect()
            })
            .unwrap_or_default();
        Self::new(points)
    }

    /// Points in travel order.
    #[must_use]
    pub const fn points(&self) -> &[Coord<f64>] {
        self.0.0.as_slice()
    }

    /// Number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.0.len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    /// Borrow the underlying line string.
    #[must_use]
    pub const fn as_line_string(&self) -> &LineString<f64> {
        &self.0
    }

    /// Render as a GeoJSON `Feature` with a `LineString` geometry.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn to_geojson(&self) -> serde_json::Value {
        let coordinates: Vec<[f64; 2]> = self.0.0.iter().map(|c| [c.x, c.y]).collect();
        serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn step(points: &[(f64, f64)]) -> RouteStep {
        RouteStep {
            geometry: points.iter().map(|&(x, y)| Coord { x, y }).collect(),
        }
    }

    #[rstest]
    fn flattens_steps_of_first_leg_only() {
        let alternatives = vec![
            RouteAlternative {
                legs: vec![
                    RouteLeg {
                        steps: vec![step(&[(1.0, 1.0), (1.0, 2.0)]), step(&[(1.0, 2.0), (2.0, 2.0)])],
                    },
                    RouteLeg {
                        steps: vec![step(&[(9.0, 9.0)])],
                    },
                ],
            },
            RouteAlternative {
                legs: vec![RouteLeg {
                    steps: vec![step(&[(5.0, 5.0)])],
                }],
            },
        ];

        let polyline = RoutePolyline::from_alternatives(&alternatives);

        let expected: Vec<Coord<f64>> = [(1.0, 1.0), (1.0, 2.0), (1.0, 2.0), (2.0, 2.0)]
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        assert_eq!(polyline.points(), expected.as_slice());
    }

    #[rstest]
    fn missing_legs_yield_empty_polyline() {
        let alternatives = vec![RouteAlternative { legs: Vec::new() }];
        assert!(RoutePolyline::from_alternatives(&alternatives).is_empty());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn renders_geojson_line_string() {
        let polyline = RoutePolyline::new(vec![Coord { x: 106.0, y: 10.0 }, Coord { x: 106.1, y: 10.1 }]);
        let feature = polyline.to_geojson();
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["geometry"]["type"], "LineString");
        assert_eq!(feature["geometry"]["coordinates"][1][0], 106.1);
    }
}
