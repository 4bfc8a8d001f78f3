//! Price levels as reported by places-search services.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse price band of a place, `0` (free) to `4` (very expensive).
///
/// # Examples
/// ```
/// use nearbite_core::PriceLevel;
///
/// let level = PriceLevel::try_from(2)?;
/// assert_eq!(level, PriceLevel::Moderate);
/// assert_eq!(level.symbols(), "$$");
/// assert_eq!(level.label(), "Moderate");
/// # Ok::<(), nearbite_core::PriceLevelError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum PriceLevel {
    /// Level 0.
    Free,
    /// Level 1.
    Inexpensive,
    /// Level 2.
    Moderate,
    /// Level 3.
    Expensive,
    /// Level 4.
    VeryExpensive,
}

/// Raised when a numeric price level is outside `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price level {0} is outside 0..=4")]
pub struct PriceLevelError(pub u8);

impl PriceLevel {
    /// Every level in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Free,
        Self::Inexpensive,
        Self::Moderate,
        Self::Expensive,
        Self::VeryExpensive,
    ];

    /// Numeric value of the level.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Inexpensive => 1,
            Self::Moderate => 2,
            Self::Expensive => 3,
            Self::VeryExpensive => 4,
        }
    }

    /// Human-readable selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Inexpensive => "Inexpensive",
            Self::Moderate => "Moderate",
            Self::Expensive => "Expensive",
            Self::VeryExpensive => "Very Expensive",
        }
    }

    /// One `$` per level; empty for [`PriceLevel::Free`].
    #[must_use]
    pub fn symbols(self) -> String {
        "$".repeat(usize::from(self.value()))
    }
}

impl TryFrom<u8> for PriceLevel {
    type Error = PriceLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| level.value() == value)
            .ok_or(PriceLevelError(value))
    }
}

impl From<PriceLevel> for u8 {
    fn from(level: PriceLevel) -> Self {
        level.value()
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, PriceLevel::Free, "")]
    #[case(1, PriceLevel::Inexpensive, "$")]
    #[case(4, PriceLevel::VeryExpensive, "$$$$")]
    fn converts_numeric_levels(
        #[case] raw: u8,
        #[case] expected: PriceLevel,
        #[case] symbols: &str,
    ) {
        let level = PriceLevel::try_from(raw).expect("level in range");
        assert_eq!(level, expected);
        assert_eq!(level.symbols(), symbols);
        assert_eq!(u8::from(level), raw);
    }

    #[rstest]
    fn rejects_out_of_range_level() {
        assert_eq!(PriceLevel::try_from(5), Err(PriceLevelError(5)));
    }
}
