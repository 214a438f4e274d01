use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid surface size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Runtime conditions that event handlers absorb instead of returning.
///
/// None of these ever reaches the caller as an `Err`: each one degrades to the
/// last valid state and is reported through `tracing` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportIssue {
    /// Vertical or horizontal span collapsed to zero, negative or non-finite.
    DegenerateRange,
    /// Visible index range points before 0 or past the series end.
    OutOfBoundsIndex,
    /// Non-finite price/timestamp or malformed candle.
    InvalidInput,
    /// Drag recomputation arrived while the surface had no area.
    StaleSession,
}

impl ViewportIssue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DegenerateRange => "degenerate_range",
            Self::OutOfBoundsIndex => "out_of_bounds_index",
            Self::InvalidInput => "invalid_input",
            Self::StaleSession => "stale_session",
        }
    }
}
