//! Pixel <-> price/index transforms.
//!
//! All functions here are pure and total: every finite or non-finite input
//! yields a finite output (or `None` where "no candle" is the answer), so
//! axis, grid and crosshair code never has to check for NaN.

use serde::{Deserialize, Serialize};

use crate::core::{Candle, ViewportState};

/// Working-space spans narrower than this are treated as degenerate.
pub const DEGENERATE_SPAN_EPSILON: f64 = 1e-12;

/// Maps a price to a vertical pixel (0 at the top).
///
/// Degenerate ranges and non-finite prices resolve to the vertical midpoint
/// of the surface.
#[must_use]
pub fn price_to_y(price: f64, surface_height: f64, viewport: &ViewportState) -> f64 {
    let height = finite_or_zero(surface_height);
    let midpoint = height / 2.0;
    let (w_min, w_max) = viewport.working_price_range();
    let span = w_max - w_min;
    if !is_usable_span(span) || !price.is_finite() {
        return midpoint;
    }

    let value = viewport.scale_mode().to_working(price);
    let y = height - (value - w_min) / span * height;
    if y.is_finite() { y } else { midpoint }
}

/// Inverse of [`price_to_y`].
///
/// Degenerate ranges resolve to the midpoint of the visible price range.
#[must_use]
pub fn y_to_price(pixel_y: f64, surface_height: f64, viewport: &ViewportState) -> f64 {
    let mode = viewport.scale_mode();
    let (w_min, w_max) = viewport.working_price_range();
    let span = w_max - w_min;
    let fallback = mode.from_working((w_min + w_max) / 2.0);
    if !is_usable_span(span)
        || !pixel_y.is_finite()
        || !surface_height.is_finite()
        || surface_height <= 0.0
    {
        return fallback;
    }

    let value = w_min + (surface_height - pixel_y) / surface_height * span;
    let price = mode.from_working(value);
    if price.is_finite() { price } else { fallback }
}

/// Left edge of the slot for (possibly fractional) `index`.
#[must_use]
pub fn index_to_x(index: f64, surface_width: f64, viewport: &ViewportState) -> f64 {
    let width = finite_or_zero(surface_width);
    if !index.is_finite() {
        return width / 2.0;
    }
    let count = viewport.visible_count() as f64;
    let x = (index - viewport.visible_start_index() as f64) * width / count;
    if x.is_finite() { x } else { width / 2.0 }
}

/// Inverse of [`index_to_x`]; returns a fractional index.
#[must_use]
pub fn x_to_index(pixel_x: f64, surface_width: f64, viewport: &ViewportState) -> f64 {
    let start = viewport.visible_start_index() as f64;
    let count = viewport.visible_count() as f64;
    if !pixel_x.is_finite() || !surface_width.is_finite() || surface_width <= 0.0 {
        return start + count / 2.0;
    }
    start + pixel_x / surface_width * count
}

/// Pixel band of one candle slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleBand {
    pub left: f64,
    pub right: f64,
    pub center: f64,
    /// Body width after applying the renderer's body/slot ratio.
    pub body_width: f64,
}

/// Slot `[i * w/n, (i + 1) * w/n)` relative to the visible start.
#[must_use]
pub fn candle_band(
    index: i64,
    surface_width: f64,
    viewport: &ViewportState,
    body_width_ratio: f64,
) -> CandleBand {
    let left = index_to_x(index as f64, surface_width, viewport);
    let right = index_to_x(index as f64 + 1.0, surface_width, viewport);
    let ratio = if body_width_ratio.is_finite() {
        body_width_ratio.clamp(0.0, 1.0)
    } else {
        1.0
    };
    CandleBand {
        left,
        right,
        center: (left + right) / 2.0,
        body_width: (right - left) * ratio,
    }
}

/// Series position under `pixel_x`, or `None` when the slot is blank
/// (before index 0 or past the series end).
#[must_use]
pub fn candle_at_x(
    series_len: usize,
    pixel_x: f64,
    surface_width: f64,
    viewport: &ViewportState,
) -> Option<usize> {
    let index = x_to_index(pixel_x, surface_width, viewport).floor();
    if !index.is_finite() || index < 0.0 {
        return None;
    }
    let index = index as usize;
    (index < series_len).then_some(index)
}

/// Timestamp for a fractional index, extrapolating with `granularity`
/// outside the series. Returns `None` only for an empty series.
#[must_use]
pub fn time_at_index(series: &[Candle], granularity: i64, index: f64) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    if !index.is_finite() {
        return None;
    }
    let step = granularity as f64;
    let last_index = (series.len() - 1) as f64;

    if index < 0.0 {
        return Some(first.time as f64 + index * step);
    }
    if index >= last_index {
        return Some(last.time as f64 + (index - last_index) * step);
    }
    let whole = index.floor();
    let candle = series[whole as usize];
    Some(candle.time as f64 + (index - whole) * step)
}

/// Fractional index for a timestamp; inverse of [`time_at_index`].
#[must_use]
pub fn index_at_time(series: &[Candle], granularity: i64, time: f64) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    if !time.is_finite() || granularity <= 0 {
        return None;
    }
    let step = granularity as f64;
    let last_index = (series.len() - 1) as f64;

    if time < first.time as f64 {
        return Some((time - first.time as f64) / step);
    }
    if time >= last.time as f64 {
        return Some(last_index + (time - last.time as f64) / step);
    }
    let after = series.partition_point(|candle| (candle.time as f64) <= time);
    let slot = after.saturating_sub(1);
    let within = ((time - series[slot].time as f64) / step).min(1.0);
    Some(slot as f64 + within)
}

fn is_usable_span(span: f64) -> bool {
    span.is_finite() && span > DEGENERATE_SPAN_EPSILON
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
