//! Free-text location suggestions.

use log::{debug, warn};

use crate::{DiscoveryError, Geocoder, Outcome, ServiceKind, Suggestion};

/// Fetch the suggestion list for one keystroke.
///
/// Blank input yields an empty list without contacting the geocoder. A
/// geocoder failure yields an empty list and a signal; it is logged and
/// never escalated.
pub async fn resolve_suggestions(geocoder: &dyn Geocoder, query: &str) -> Outcome<Vec<Suggestion>> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Outcome::clean(Vec::new());
    }
    match geocoder.suggest(trimmed).await {
        Ok(suggestions) => {
            debug!("geocoder returned {} suggestions for {trimmed:?}", suggestions.len());
            Outcome::clean(suggestions)
        }
        Err(error) => {
            warn!("geocoder failed for {trimmed:?}: {error}");
            Outcome::degraded(
                Vec::new(),
                DiscoveryError::from_service(ServiceKind::Geocoder, error),
            )
        }
    }
}
