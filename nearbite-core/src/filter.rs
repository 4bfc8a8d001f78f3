//! Price and rating filtering of the origin set.
//!
//! The price constraint is an exact match (it mirrors a single-choice price
//! selector); the rating constraint is a lower bound. A candidate without a
//! price level or rating never passes an active constraint on that
//! dimension.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Candidate, FilteredSet, MAX_RATING, OriginSet, PriceLevel};

/// One entry of a filter selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorOption<T> {
    /// Constraint value; `None` means "no constraint".
    pub value: Option<T>,
    /// Label shown to the user.
    pub label: &'static str,
}

/// Rating selector entries.
pub const RATING_OPTIONS: [SelectorOption<f32>; 6] = [
    SelectorOption { value: None, label: "All" },
    SelectorOption { value: Some(1.0), label: "1+" },
    SelectorOption { value: Some(2.0), label: "2+" },
    SelectorOption { value: Some(3.0), label: "3+" },
    SelectorOption { value: Some(4.0), label: "4+" },
    SelectorOption { value: Some(5.0), label: "5" },
];

/// Price selector entries.
pub const PRICE_OPTIONS: [SelectorOption<PriceLevel>; 6] = [
    SelectorOption { value: None, label: "$ - $$$" },
    SelectorOption { value: Some(PriceLevel::Free), label: PriceLevel::Free.label() },
    SelectorOption { value: Some(PriceLevel::Inexpensive), label: PriceLevel::Inexpensive.label() },
    SelectorOption { value: Some(PriceLevel::Moderate), label: PriceLevel::Moderate.label() },
    SelectorOption { value: Some(PriceLevel::Expensive), label: PriceLevel::Expensive.label() },
    SelectorOption { value: Some(PriceLevel::VeryExpensive), label: PriceLevel::VeryExpensive.label() },
];

/// Active filter constraints.
///
/// Zero on either dimension means "no constraint", so
/// [`PriceLevel::Free`] and a rating of `0` both clear their constraint.
///
/// # Examples
/// ```
/// use nearbite_core::{FilterState, PriceLevel};
///
/// let state = FilterState::from_selector(Some(2), Some(4.0))?;
/// assert_eq!(state.min_price_level(), Some(PriceLevel::Moderate));
/// assert_eq!(state.min_rating(), Some(4.0));
///
/// let cleared = FilterState::from_selector(Some(0), Some(0.0))?;
/// assert!(cleared.is_unconstrained());
/// # Ok::<(), nearbite_core::FilterError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterState {
    min_price_level: Option<PriceLevel>,
    min_rating: Option<f32>,
}

/// Errors returned when building a [`FilterState`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FilterError {
    /// The price selector value is not a known price level.
    #[error("price level {0} is outside 0..=4")]
    PriceLevel(u8),
    /// The rating threshold is not within `[0, 5]`.
    #[error("rating threshold {0} is outside [0, 5]")]
    Rating(f32),
}

impl FilterState {
    /// Build a filter from raw selector values.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when a value is out of range.
    pub fn from_selector(price: Option<u8>, rating: Option<f32>) -> Result<Self, FilterError> {
        let mut state = Self::default();
        if let Some(raw) = price {
            let level = PriceLevel::try_from(raw).map_err(|_| FilterError::PriceLevel(raw))?;
            state = state.with_price_level(level);
        }
        if let Some(threshold) = rating {
            state = state.with_min_rating(threshold)?;
        }
        Ok(state)
    }

    /// Require an exact price level.
    #[must_use]
    pub const fn with_price_level(mut self, level: PriceLevel) -> Self {
        self.min_price_level = match level {
            PriceLevel::Free => None,
            other => Some(other),
        };
        self
    }

    /// Require a rating of at least `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Rating`] for thresholds outside `[0, 5]`.
    pub fn with_min_rating(mut self, threshold: f32) -> Result<Self, FilterError> {
        if !(0.0..=MAX_RATING).contains(&threshold) {
            return Err(FilterError::Rating(threshold));
        }
        self.min_rating = (threshold > 0.0).then_some(threshold);
        Ok(self)
    }

    /// Required price level, if constrained.
    #[must_use]
    pub const fn min_price_level(&self) -> Option<PriceLevel> {
        self.min_price_level
    }

    /// Minimum rating, if constrained.
    #[must_use]
    pub const fn min_rating(&self) -> Option<f32> {
        self.min_rating
    }

    /// Whether every candidate passes.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.min_price_level.is_none() && self.min_rating.is_none()
    }

    /// Whether `candidate` satisfies every active constraint.
    #[must_use]
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        let price_ok = self
            .min_price_level
            .is_none_or(|wanted| candidate.price_level == Some(wanted));
        let rating_ok = self
            .min_rating
            .is_none_or(|threshold| candidate.rating.is_some_and(|rating| rating >= threshold));
        price_ok && rating_ok
    }
}

/// Derive the filtered set from an origin set.
///
/// Pure: the result depends only on the arguments and preserves the origin
/// set's order.
#[must_use]
pub fn filter_candidates(origin: &OriginSet, state: &FilterState) -> FilteredSet {
    FilteredSet::from_subset(
        origin
            .iter()
            .filter(|candidate| state.accepts(candidate))
            .cloned()
            .collect(),
    )
}
