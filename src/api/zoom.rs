use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::transform::{x_to_index, y_to_price};
use crate::core::{GuardedPriceRange, SurfaceSize, ViewportState, guard_price_range};
use crate::error::ViewportIssue;

use super::ViewportLimits;

/// Wheel/gesture zoom direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelDirection {
    In,
    Out,
}

impl WheelDirection {
    /// Negative wheel delta zooms in, positive zooms out, zero is no-op.
    #[must_use]
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return None;
        }
        Some(if delta_y < 0.0 { Self::In } else { Self::Out })
    }

    fn signed(self, step: f64) -> f64 {
        match self {
            Self::In => 1.0 - step,
            Self::Out => 1.0 + step,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub cursor_x: f64,
    pub cursor_y: f64,
    pub delta_y: f64,
}

impl WheelEvent {
    #[must_use]
    pub fn new(cursor_x: f64, cursor_y: f64, delta_y: f64) -> Self {
        Self {
            cursor_x,
            cursor_y,
            delta_y,
        }
    }
}

/// Cursor-anchored zoom on both axes at once.
///
/// The working value (price or log-price) and the index under the cursor
/// keep their screen position, up to integer rounding of the index window
/// and the edge clamps. An invalid surface or a non-finite cursor returns
/// the input unchanged.
#[must_use]
pub fn zoom_at_cursor(
    viewport: &ViewportState,
    cursor_x: f64,
    cursor_y: f64,
    surface: SurfaceSize,
    direction: WheelDirection,
    series_len: usize,
    limits: ViewportLimits,
) -> ViewportState {
    let mut next = *viewport;
    if !surface.is_valid() || !cursor_x.is_finite() || !cursor_y.is_finite() {
        debug!(?surface, cursor_x, cursor_y, "zoom skipped: no usable surface or cursor");
        return next;
    }

    if let Some(range) = zoom_price_range(viewport, cursor_y, surface.height, direction, limits) {
        next.set_guarded_price_range(range);
    }

    let series_len = i64::try_from(series_len).unwrap_or(i64::MAX);
    let (start, end) = zoom_index_range(
        viewport,
        cursor_x,
        surface.width,
        direction,
        series_len,
        limits,
    );
    next.set_index_range(start, end);

    trace!(
        ?direction,
        start,
        end,
        min = next.min_visible_price(),
        max = next.max_visible_price(),
        "zoom applied"
    );
    next
}

fn zoom_price_range(
    viewport: &ViewportState,
    cursor_y: f64,
    height: f64,
    direction: WheelDirection,
    limits: ViewportLimits,
) -> Option<GuardedPriceRange> {
    let mode = viewport.scale_mode();
    let (w_min, w_max) = viewport.working_price_range();
    let span = w_max - w_min;
    let fraction_from_top = (cursor_y / height).clamp(0.0, 1.0);
    let anchor = mode.to_working(y_to_price(cursor_y.clamp(0.0, height), height, viewport));

    let new_span = span * direction.signed(limits.zoom_step_y);
    let new_max = anchor + fraction_from_top * new_span;
    let new_min = new_max - new_span;

    let guarded = guard_price_range(
        mode.from_working(new_min),
        mode.from_working(new_max),
        mode,
        limits.span_limits,
    )?;
    if guarded.recovered {
        debug!(
            min = guarded.min,
            max = guarded.max,
            issue = ViewportIssue::DegenerateRange.as_str(),
            "zoom price range re-centered at minimum span"
        );
    }
    Some(guarded)
}

fn zoom_index_range(
    viewport: &ViewportState,
    cursor_x: f64,
    width: f64,
    direction: WheelDirection,
    series_len: i64,
    limits: ViewportLimits,
) -> (i64, i64) {
    let count = viewport.visible_count();
    // No series means no upper bound to clamp against yet.
    if series_len <= 0 {
        return viewport.visible_index_range();
    }
    let mut target = (count as f64 * direction.signed(limits.zoom_step_x)).round() as i64;
    // Small counts would otherwise round back to themselves forever.
    if target == count {
        target = match direction {
            WheelDirection::In => count - 1,
            WheelDirection::Out => count + 1,
        };
    }
    let new_count = limits.clamp_visible_count(target, series_len);

    let fraction = (cursor_x / width).clamp(0.0, 1.0);
    let anchor_index = x_to_index(cursor_x.clamp(0.0, width), width, viewport);
    place_window(anchor_index - fraction * new_count as f64, new_count, series_len)
}

/// Clamps a window start into `[0, series_len]`, caps the end at
/// `series_len`, then re-derives the start from the capped end so the count
/// is kept exactly. An empty series keeps the window at `[0, count)`.
pub(crate) fn place_window(raw_start: f64, count: i64, series_len: i64) -> (i64, i64) {
    let count = count.max(1);
    if series_len <= 0 {
        return (0, count);
    }
    let start = if raw_start.is_finite() {
        (raw_start.round() as i64).clamp(0, series_len)
    } else {
        0
    };
    let end = start.saturating_add(count).min(series_len);
    (end - count, end)
}

#[cfg(test)]
mod tests {
    use super::{WheelDirection, place_window};

    #[test]
    fn wheel_direction_follows_delta_sign() {
        assert_eq!(WheelDirection::from_wheel_delta(-120.0), Some(WheelDirection::In));
        assert_eq!(WheelDirection::from_wheel_delta(3.0), Some(WheelDirection::Out));
        assert_eq!(WheelDirection::from_wheel_delta(0.0), None);
        assert_eq!(WheelDirection::from_wheel_delta(f64::NAN), None);
    }

    #[test]
    fn place_window_keeps_count_when_end_is_clamped() {
        assert_eq!(place_window(95.0, 10, 100), (90, 100));
        assert_eq!(place_window(-7.0, 10, 100), (0, 10));
        assert_eq!(place_window(40.4, 10, 100), (40, 50));
    }

    #[test]
    fn place_window_extends_left_when_count_exceeds_series() {
        assert_eq!(place_window(0.0, 30, 20), (-10, 20));
    }

    #[test]
    fn place_window_on_empty_series_starts_at_zero() {
        assert_eq!(place_window(12.0, 8, 0), (0, 8));
    }
}
