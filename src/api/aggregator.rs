use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Candle, ViewportState, tail_candle_mut};
use crate::error::ViewportIssue;

/// One message from the price stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    pub price: f64,
    /// Unix seconds.
    pub timestamp: f64,
    pub instrument_id: String,
}

impl TickEvent {
    #[must_use]
    pub fn new(price: f64, timestamp: f64, instrument_id: impl Into<String>) -> Self {
        Self {
            price,
            timestamp,
            instrument_id: instrument_id.into(),
        }
    }
}

/// Merges a tick into the tail candle when it falls inside the tail's bucket.
///
/// - records `price` as the viewport's last tick price whenever it is finite,
///   whatever the bucket outcome
/// - inside `[time, time + granularity)`: `close = price`, `high`/`low`
///   widened to include it
/// - outside the window, empty series, or non-finite input: series untouched
///
/// Returns `true` only when a candle field actually changed. Opening a new
/// bucket is left to the data layer.
pub fn apply_tick(
    price: f64,
    tick_timestamp: f64,
    series: &mut [Candle],
    granularity: i64,
    viewport: &mut ViewportState,
) -> bool {
    if !price.is_finite() {
        trace!(price, issue = ViewportIssue::InvalidInput.as_str(), "tick skipped");
        return false;
    }
    viewport.set_last_tick_price(price);

    if !tick_timestamp.is_finite() || granularity <= 0 {
        trace!(
            tick_timestamp,
            granularity,
            issue = ViewportIssue::InvalidInput.as_str(),
            "tick not merged"
        );
        return false;
    }
    let Some(tail) = tail_candle_mut(series) else {
        return false;
    };
    if !tail.contains_time(tick_timestamp, granularity) {
        trace!(
            tick_timestamp,
            candle_time = tail.time,
            granularity,
            "tick outside tail bucket"
        );
        return false;
    }

    let before = *tail;
    tail.close = price;
    tail.high = tail.high.max(price);
    tail.low = tail.low.min(price);
    *tail != before
}
