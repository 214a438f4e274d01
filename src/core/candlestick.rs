use serde::{Deserialize, Serialize};

use crate::core::transform::{candle_band, price_to_y};
use crate::core::{Candle, SurfaceSize, ViewportState};

/// Projected candle geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub index: usize,
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

/// Projects the candles that fall inside the visible index range.
///
/// Slots outside `[0, series.len())` are blank and produce nothing; candles
/// with non-finite fields are skipped.
#[must_use]
pub fn project_visible_candles(
    series: &[Candle],
    viewport: &ViewportState,
    surface: SurfaceSize,
    body_width_ratio: f64,
) -> Vec<CandleGeometry> {
    if !surface.is_valid() {
        return Vec::new();
    }
    let (start, end) = viewport.visible_index_range();
    let len = i64::try_from(series.len()).unwrap_or(i64::MAX);
    let from = start.clamp(0, len);
    let to = end.clamp(0, len);

    let mut out = Vec::with_capacity(usize::try_from(to - from).unwrap_or(0));
    for index in from..to {
        let Ok(position) = usize::try_from(index) else {
            continue;
        };
        let candle = series[position];
        if !candle.is_finite() {
            continue;
        }
        let band = candle_band(index, surface.width, viewport, body_width_ratio);
        let half = band.body_width / 2.0;
        let open_y = price_to_y(candle.open, surface.height, viewport);
        let close_y = price_to_y(candle.close, surface.height, viewport);
        out.push(CandleGeometry {
            index: position,
            center_x: band.center,
            body_left: band.center - half,
            body_right: band.center + half,
            body_top: open_y.min(close_y),
            body_bottom: open_y.max(close_y),
            wick_top: price_to_y(candle.high, surface.height, viewport),
            wick_bottom: price_to_y(candle.low, surface.height, viewport),
            is_bullish: candle.is_bullish(),
        });
    }
    out
}
