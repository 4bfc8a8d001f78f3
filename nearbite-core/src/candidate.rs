//! Places discovered around the reference location.

use std::fmt;

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PriceLevel;

/// Highest rating a place can carry.
pub const MAX_RATING: f32 = 5.0;

/// Stable, opaque identifier of a candidate.
///
/// Used for list keys and for selection state; nothing else about a
/// candidate takes part in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CandidateId(String);

impl CandidateId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A discovered place.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
/// `distance_meters` stays `None` until the distance augmenter has run, or
/// when the distance-matrix service could not reach the place.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nearbite_core::{Candidate, PriceLevel};
///
/// # fn main() -> Result<(), nearbite_core::CandidateError> {
/// let pho = Candidate::new("p1", "Pho 24", "12 Nguyen Hue", Coord { x: 106.7, y: 10.77 })
///     .with_rating(4.5)?
///     .with_rating_count(120)
///     .with_price_level(PriceLevel::Inexpensive);
/// assert_eq!(pho.rating, Some(4.5));
/// assert!(pho.distance_meters.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// Unique identifier.
    pub id: CandidateId,
    /// Display name.
    pub name: String,
    /// Display address.
    pub address: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Average rating in `[0, 5]`.
    pub rating: Option<f32>,
    /// Number of ratings behind [`Candidate::rating`].
    pub rating_count: Option<u32>,
    /// Price band.
    pub price_level: Option<PriceLevel>,
    /// Opaque thumbnail reference.
    pub photo_ref: Option<String>,
    /// Road-network distance from the reference location.
    pub distance_meters: Option<f64>,
}

/// Errors returned by the validating [`Candidate`] setters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CandidateError {
    /// Rating was not finite or outside `[0, 5]`.
    #[error("rating {0} is outside [0, 5]")]
    Rating(f32),
    /// Distance was negative or not finite.
    #[error("distance {0} must be a finite, non-negative number of metres")]
    Distance(f64),
}

impl Candidate {
    /// Construct a candidate with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        location: Coord<f64>,
    ) -> Self {
        Self {
            id: CandidateId::new(id),
            name: name.into(),
            address: address.into(),
            location,
            rating: None,
            rating_count: None,
            price_level: None,
            photo_ref: None,
            distance_meters: None,
        }
    }

    /// Set the rating.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::Rating`] for ratings outside `[0, 5]`.
    pub fn with_rating(mut self, rating: f32) -> Result<Self, CandidateError> {
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(CandidateError::Rating(rating));
        }
        self.rating = Some(rating);
        Ok(self)
    }

    /// Set the rating count.
    #[must_use]
    pub const fn with_rating_count(mut self, count: u32) -> Self {
        self.rating_count = Some(count);
        self
    }

    /// Set the price level.
    #[must_use]
    pub const fn with_price_level(mut self, level: PriceLevel) -> Self {
        self.price_level = Some(level);
        self
    }

    /// Set the thumbnail reference.
    #[must_use]
    pub fn with_photo_ref(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    /// Set the road-network distance.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::Distance`] for negative or non-finite input.
    pub fn with_distance(mut self, meters: f64) -> Result<Self, CandidateError> {
        if !(meters >= 0.0 && meters.is_finite()) {
            return Err(CandidateError::Distance(meters));
        }
        self.distance_meters = Some(meters);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bakery() -> Candidate {
        Candidate::new("b1", "Bakery", "1 Main St", Coord { x: 0.0, y: 0.0 })
    }

    #[rstest]
    #[case(0.0)]
    #[case(5.0)]
    fn accepts_boundary_ratings(bakery: Candidate, #[case] rating: f32) {
        let rated = bakery.with_rating(rating).expect("rating in range");
        assert_eq!(rated.rating, Some(rating));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(5.1)]
    #[case(f32::NAN)]
    fn rejects_out_of_range_rating(bakery: Candidate, #[case] rating: f32) {
        assert!(bakery.with_rating(rating).is_err());
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_distance(bakery: Candidate, #[case] meters: f64) {
        assert!(matches!(
            bakery.with_distance(meters),
            Err(CandidateError::Distance(_))
        ));
    }

    #[rstest]
    fn identity_is_the_id(bakery: Candidate) {
        assert_eq!(bakery.id, CandidateId::from("b1"));
        assert_eq!(bakery.id.to_string(), "b1");
    }
}
