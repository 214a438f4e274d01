use serde::{Deserialize, Serialize};

/// Smallest price the logarithmic scale will take the log of.
pub const MIN_LOG_VALUE: f64 = 1e-9;

/// Vertical mapping mode.
///
/// Every vertical computation goes through the mode's "working value": the
/// raw price in linear mode, `ln(price)` in logarithmic mode. Range math is
/// then done once, linearly, on working values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    /// Uniform spacing in raw price units.
    #[default]
    Linear,
    /// Uniform spacing in natural-log price units.
    Logarithmic,
}

impl ScaleMode {
    /// Maps a raw price into working space. Log mode floors at [`MIN_LOG_VALUE`].
    #[must_use]
    pub fn to_working(self, price: f64) -> f64 {
        match self {
            Self::Linear => price,
            Self::Logarithmic => price.max(MIN_LOG_VALUE).ln(),
        }
    }

    /// Maps a working value back into raw price space.
    #[must_use]
    pub fn from_working(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Logarithmic => value.exp(),
        }
    }

    /// Working-space bounds for a price range.
    #[must_use]
    pub fn working_range(self, min: f64, max: f64) -> (f64, f64) {
        (self.to_working(min), self.to_working(max))
    }

    /// Lowest price this mode accepts as the bottom of the visible range.
    #[must_use]
    pub fn price_floor(self) -> f64 {
        match self {
            Self::Linear => 0.0,
            Self::Logarithmic => MIN_LOG_VALUE,
        }
    }

    #[must_use]
    pub fn is_logarithmic(self) -> bool {
        matches!(self, Self::Logarithmic)
    }
}
