//! Wire format of the places-search backend.
//!
//! Records follow the Google Places "nearby search" result shape. The
//! backend answers either with a bare array or with the upstream
//! `{"status": .., "results": [...]}` envelope. An envelope whose status is
//! not `OK` or `ZERO_RESULTS` is an upstream failure, not an empty result.

use geo::Coord;
use log::warn;
use nearbite_core::{Candidate, PriceLevel, ServiceError};
use serde::Deserialize;

/// Statuses of the upstream envelope that carry usable results.
const SUCCESS_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PlacesPayload {
    List(Vec<PlaceRecord>),
    Envelope(PlacesEnvelope),
}

impl PlacesPayload {
    /// Unwrap the records, or the upstream failure the envelope reports.
    pub(crate) fn into_records(self) -> Result<Vec<PlaceRecord>, ServiceError> {
        match self {
            Self::List(records) => Ok(records),
            Self::Envelope(envelope) => envelope.into_records(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesEnvelope {
    status: Option<String>,
    error_message: Option<String>,
    results: Option<Vec<PlaceRecord>>,
}

impl PlacesEnvelope {
    fn into_records(self) -> Result<Vec<PlaceRecord>, ServiceError> {
        match (self.status, self.results) {
            (Some(code), _) if !SUCCESS_STATUSES.contains(&code.as_str()) => {
                Err(ServiceError::Upstream {
                    message: self
                        .error_message
                        .unwrap_or_else(|| format!("places search returned {code}")),
                    code,
                })
            }
            (_, Some(results)) => Ok(results),
            (Some(_), None) => Ok(Vec::new()),
            (None, None) => Err(ServiceError::Parse {
                message: "places response has neither results nor a status".to_owned(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceRecord {
    place_id: Option<String>,
    reference: Option<String>,
    name: Option<String>,
    vicinity: Option<String>,
    rating: Option<f32>,
    user_ratings_total: Option<u32>,
    price_level: Option<u8>,
    #[serde(default)]
    photos: Vec<PhotoRecord>,
    geometry: Option<GeometryRecord>,
}

#[derive(Debug, Deserialize)]
struct PhotoRecord {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct GeometryRecord {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl PlaceRecord {
    /// Convert into a candidate, or `None` when the record has no identifier
    /// or position. Out-of-range ratings and price levels are dropped.
    pub(crate) fn into_candidate(self) -> Option<Candidate> {
        let Some(id) = self.place_id.or(self.reference) else {
            warn!("skipping place {:?} without an identifier", self.name);
            return None;
        };
        let Some(geometry) = self.geometry else {
            warn!("skipping place {id} without a location");
            return None;
        };
        let location = Coord {
            x: geometry.location.lng,
            y: geometry.location.lat,
        };

        let mut candidate = Candidate::new(
            id,
            self.name.unwrap_or_default(),
            self.vicinity.unwrap_or_default(),
            location,
        );
        if let Some(rating) = self.rating {
            match candidate.clone().with_rating(rating) {
                Ok(rated) => candidate = rated,
                Err(err) => warn!("ignoring rating of place {}: {err}", candidate.id),
            }
        }
        if let Some(count) = self.user_ratings_total {
            candidate = candidate.with_rating_count(count);
        }
        if let Some(raw) = self.price_level {
            match PriceLevel::try_from(raw) {
                Ok(level) => candidate = candidate.with_price_level(level),
                Err(err) => warn!("ignoring price level of place {}: {err}", candidate.id),
            }
        }
        if let Some(photo) = self.photos.into_iter().next() {
            candidate = candidate.with_photo_ref(photo.photo_reference);
        }
        Some(candidate)
    }
}
