use tracing::debug;

use crate::core::{GuardedPriceRange, ScaleMode, SurfaceSize, ViewportState, guard_price_range};
use crate::error::ViewportIssue;
use crate::interaction::{DragMode, DragSession};

use super::ViewportLimits;
use super::zoom::place_window;

/// Fields a drag move writes back to the live viewport.
///
/// Only the axes the mode controls are present, so fields owned by other
/// writers (last tick price, scale mode, granularity) are never touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub index_range: Option<(i64, i64)>,
    pub price_range: Option<GuardedPriceRange>,
}

impl DragUpdate {
    /// Writes the update into `viewport`; returns `true` when anything changed.
    pub fn apply_to(&self, viewport: &mut ViewportState) -> bool {
        let before = *viewport;
        if let Some((start, end)) = self.index_range {
            viewport.set_index_range(start, end);
        }
        if let Some(range) = self.price_range {
            viewport.set_guarded_price_range(range);
        }
        before != *viewport
    }
}

/// Recomputes the view for a pointer at `(x, y)` during `session`.
///
/// Derives everything from the session snapshot, never from the live view.
/// Returns `None` when the surface has no area or the pointer is not finite.
#[must_use]
pub fn drag_update(
    session: &DragSession,
    x: f64,
    y: f64,
    surface: SurfaceSize,
    series_len: usize,
    limits: ViewportLimits,
) -> Option<DragUpdate> {
    if !surface.is_valid() {
        debug!(?surface, issue = ViewportIssue::StaleSession.as_str(), "drag move ignored");
        return None;
    }
    if !x.is_finite() || !y.is_finite() {
        debug!(x, y, issue = ViewportIssue::InvalidInput.as_str(), "drag move ignored");
        return None;
    }

    let (dx, dy) = session.delta(x, y);
    let snapshot = session.snapshot();
    let series_len = i64::try_from(series_len).unwrap_or(i64::MAX);
    let update = match session.mode() {
        DragMode::Pan => DragUpdate {
            index_range: Some(pan_index_range(snapshot, dx, surface.width)),
            price_range: pan_price_range(snapshot, dy, surface.height, limits),
        },
        DragMode::ScaleVertical => DragUpdate {
            index_range: None,
            price_range: scale_price_range(snapshot, dy, surface.height, limits),
        },
        DragMode::ScaleHorizontal => DragUpdate {
            index_range: Some(scale_index_range(
                snapshot,
                dx,
                surface.width,
                series_len,
                limits,
            )),
            price_range: None,
        },
    };
    Some(update)
}

/// Whole-candle shift; unclamped so the view may run past either data edge.
fn pan_index_range(snapshot: &ViewportState, dx: f64, width: f64) -> (i64, i64) {
    let pixels_per_candle = snapshot.pixels_per_candle(width);
    let shift = (dx / pixels_per_candle).round();
    let shift = if shift.is_finite() { shift as i64 } else { 0 };
    let (start, end) = snapshot.visible_index_range();
    (start.saturating_sub(shift), end.saturating_sub(shift))
}

fn pan_price_range(
    snapshot: &ViewportState,
    dy: f64,
    height: f64,
    limits: ViewportLimits,
) -> Option<GuardedPriceRange> {
    let mode = snapshot.scale_mode();
    let (w_min, w_max) = snapshot.working_price_range();
    let shift = dy / height * (w_max - w_min);
    let mut min = mode.from_working(w_min + shift);
    let mut max = mode.from_working(w_max + shift);
    if mode == ScaleMode::Linear && min < 0.0 {
        max -= min;
        min = 0.0;
    }
    guard_price_range(min, max, mode, limits.span_limits)
}

/// `2^(dy / height * sensitivity)` applied to the snapshot span around the
/// snapshot midpoint: dragging down widens the range, up narrows it.
fn scale_price_range(
    snapshot: &ViewportState,
    dy: f64,
    height: f64,
    limits: ViewportLimits,
) -> Option<GuardedPriceRange> {
    let mode = snapshot.scale_mode();
    let factor = 2f64.powf(dy / height * limits.axis_scale_sensitivity);
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }
    let (w_min, w_max) = snapshot.working_price_range();
    let mid = (w_min + w_max) / 2.0;
    let half = (w_max - w_min) / 2.0 * factor;
    let guarded = guard_price_range(
        mode.from_working(mid - half),
        mode.from_working(mid + half),
        mode,
        limits.span_limits,
    )?;
    if guarded.recovered {
        debug!(
            min = guarded.min,
            max = guarded.max,
            issue = ViewportIssue::DegenerateRange.as_str(),
            "axis scale hit minimum span"
        );
    }
    Some(guarded)
}

/// `2^(-dx / width * sensitivity)` applied to the snapshot candle count
/// around the snapshot center: dragging right shows fewer candles.
fn scale_index_range(
    snapshot: &ViewportState,
    dx: f64,
    width: f64,
    series_len: i64,
    limits: ViewportLimits,
) -> (i64, i64) {
    let factor = 2f64.powf(-dx / width * limits.axis_scale_sensitivity);
    let count = snapshot.visible_count();
    let scaled = (count as f64 * factor).round();
    let target = if scaled.is_finite() {
        scaled.min(i64::MAX as f64) as i64
    } else {
        count
    };
    let new_count = limits.clamp_visible_count(target, series_len);

    let (start, end) = snapshot.visible_index_range();
    let center = (start + end) as f64 / 2.0;
    place_window(center - new_count as f64 / 2.0, new_count, series_len)
}
