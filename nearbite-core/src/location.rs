//! The user's reference location.
//!
//! A location always carries the text shown in the address box. Coordinates
//! are optional: they are present once a geocoder suggestion has been chosen
//! and cleared again by any manual edit of the text.

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default map centre used before any location is resolved (`x = lng`).
pub const DEFAULT_MAP_CENTER: Coord<f64> = Coord {
    x: -123.206_303_7,
    y: 49.257_706_2,
};

/// Default map zoom level paired with [`DEFAULT_MAP_CENTER`].
pub const DEFAULT_MAP_ZOOM: u8 = 12;

/// Reference location for discovery.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nearbite_core::Location;
///
/// # fn main() -> Result<(), nearbite_core::LocationError> {
/// let home = Location::resolved("Home", Coord { x: 106.0, y: 10.0 })?;
/// assert!(home.is_resolved());
///
/// let edited = home.with_text_edit("Hom");
/// assert!(!edited.is_resolved());
/// assert_eq!(edited.display_name(), "Hom");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    display_name: String,
    coordinates: Option<Coord<f64>>,
}

/// Errors returned by [`Location::resolved`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LocationError {
    /// Latitude was not finite or outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude was not finite or outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Location {
    /// Construct an unresolved location holding only display text.
    pub fn unresolved(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            coordinates: None,
        }
    }

    /// Construct a location with validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] when either axis is non-finite or out of
    /// range.
    pub fn resolved(
        display_name: impl Into<String>,
        coordinates: Coord<f64>,
    ) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&coordinates.y) {
            return Err(LocationError::Latitude(coordinates.y));
        }
        if !(-180.0..=180.0).contains(&coordinates.x) {
            return Err(LocationError::Longitude(coordinates.x));
        }
        Ok(Self {
            display_name: display_name.into(),
            coordinates: Some(coordinates),
        })
    }

    /// Apply a manual text edit. The result is always unresolved.
    #[must_use]
    pub fn with_text_edit(mut self, text: &str) -> Self {
        self.display_name.clear();
        self.display_name.push_str(text);
        self.coordinates = None;
        self
    }

    /// Text shown for this location.
    #[must_use]
    pub const fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Resolved coordinates, if any.
    #[must_use]
    pub const fn coordinates(&self) -> Option<Coord<f64>> {
        self.coordinates
    }

    /// Whether downstream operations may use this location.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}
