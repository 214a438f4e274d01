use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{
    datetime_to_unix_seconds, decimal_to_f64, unix_seconds_to_datetime,
};
use crate::error::{ChartError, ChartResult};

/// One OHLCV bar covering `[time, time + granularity)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start in unix seconds.
    pub time: i64,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all numeric fields are finite
    /// - `low <= min(open, close)` and `high >= max(open, close)`
    pub fn new(
        time: i64,
        low: f64,
        high: f64,
        open: f64,
        close: f64,
        volume: f64,
    ) -> ChartResult<Self> {
        let candle = Self {
            time,
            low,
            high,
            open,
            close,
            volume,
        };
        if !candle.is_finite() {
            return Err(ChartError::InvalidData(
                "candle values must be finite".to_owned(),
            ));
        }
        if !candle.is_consistent() {
            return Err(ChartError::InvalidData(
                "candle low/high must enclose open and close".to_owned(),
            ));
        }
        Ok(candle)
    }

    /// Converts decimal prices and a UTC timestamp into a validated candle.
    pub fn from_decimal(
        time: DateTime<Utc>,
        low: Decimal,
        high: Decimal,
        open: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(low, "low")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(open, "open")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(volume, "volume")?,
        )
    }

    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.low.is_finite()
            && self.high.is_finite()
            && self.open.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    #[must_use]
    pub fn is_consistent(self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    /// Bucket start as a UTC timestamp, for axis and tooltip labels.
    #[must_use]
    pub fn start_time(self) -> Option<DateTime<Utc>> {
        unix_seconds_to_datetime(self.time)
    }

    /// Whether `timestamp` (seconds) falls inside this candle's bucket window.
    #[must_use]
    pub fn contains_time(self, timestamp: f64, granularity: i64) -> bool {
        let start = self.time as f64;
        timestamp >= start && timestamp < start + granularity as f64
    }
}

/// Mutable access to the live tail bar, the only candle the core ever edits.
pub fn tail_candle_mut(series: &mut [Candle]) -> Option<&mut Candle> {
    series.last_mut()
}
