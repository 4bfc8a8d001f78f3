//! Outbound links shown next to a candidate.

use geo::Coord;
use url::{Url, form_urlencoded};

/// Maximum thumbnail width requested from the photo proxy, in pixels.
pub const PHOTO_MAX_WIDTH: u32 = 400;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Google Maps search link for a position.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use nearbite_data::links::place_search_link;
///
/// let link = place_search_link(Coord { x: 106.7, y: 10.77 });
/// assert_eq!(link, "https://www.google.com/maps/search/?api=1&query=10.77%2C106.7");
/// ```
#[must_use]
pub fn place_search_link(position: Coord<f64>) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("api", "1")
        .append_pair("query", &format!("{},{}", position.y, position.x))
        .finish();
    format!("{MAPS_SEARCH_URL}?{query}")
}

/// Thumbnail URL served by the places backend's photo proxy.
///
/// # Errors
///
/// Returns an error when `api_base` is not an absolute URL.
pub fn photo_url(api_base: &str, photo_ref: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/google-image", api_base.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("photo_reference", photo_ref)
        .append_pair("maxwidth", &PHOTO_MAX_WIDTH.to_string());
    Ok(url)
}
