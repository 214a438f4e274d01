use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::transform::{index_to_x, price_to_y, time_at_index};
use crate::core::{Candle, ScaleMode, ViewportState};

/// Upper bound on generated ticks per call, whatever the step looks like.
pub const TICK_ITERATION_CAP: usize = 500;
/// Smallest step [`nice_step`] will ever return.
pub const MIN_STEP: f64 = 1e-12;

const NICE_MANTISSAS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

pub type TickValues = SmallVec<[f64; 16]>;

/// Rounds `range / max_tick_count` up to the nearest `{1, 2, 5, 10} x 10^k`.
///
/// Always strictly positive and finite: pathological ranges are clamped to
/// `max(step, range * 1e-6, MIN_STEP)`.
#[must_use]
pub fn nice_step(range: f64, max_tick_count: usize) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return MIN_STEP;
    }
    let rough = range / max_tick_count.max(1) as f64;
    let magnitude = 10f64.powf(rough.log10().floor());

    let snapped = if magnitude.is_finite() && magnitude > 0.0 {
        NICE_MANTISSAS
            .iter()
            .map(|mantissa| mantissa * magnitude)
            .find(|candidate| *candidate >= rough * (1.0 - 1e-12))
            .unwrap_or(10.0 * magnitude)
    } else {
        rough
    };
    let step = if snapped.is_finite() { snapped } else { rough };

    let clamped = step.max(range * 1e-6).max(MIN_STEP);
    if clamped.is_finite() { clamped } else { f64::MAX }
}

/// Multiples of `step` inside `[min, max]`, starting at the first multiple
/// `>= min`. Bounded by [`TICK_ITERATION_CAP`].
#[must_use]
pub fn ticks_in_range(min: f64, max: f64, step: f64) -> TickValues {
    let mut out = TickValues::new();
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || step <= 0.0 || max < min {
        return out;
    }

    let first = (min / step).ceil() * step;
    let tolerance = step * 1e-9;
    for i in 0..TICK_ITERATION_CAP {
        let value = first + i as f64 * step;
        if !value.is_finite() || value > max + tolerance {
            break;
        }
        out.push(value);
    }
    out
}

/// Price-axis label/gridline position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub price: f64,
    pub y: f64,
}

/// Time-axis label/gridline position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeTick {
    pub index: f64,
    pub x: f64,
    /// Extrapolated bucket time; `None` only when the series is empty.
    pub time: Option<f64>,
}

/// Price ticks for the current view.
///
/// Linear mode uses nice steps. Log mode uses a 1-2-5 decade ladder once the
/// range covers at least one decade and falls back to nice steps otherwise.
#[must_use]
pub fn price_axis_ticks(
    viewport: &ViewportState,
    surface_height: f64,
    max_tick_count: usize,
) -> Vec<PriceTick> {
    if max_tick_count == 0 {
        return Vec::new();
    }
    let (min, max) = viewport.price_range();
    let values = match viewport.scale_mode() {
        ScaleMode::Logarithmic if max / min >= 10.0 => log_ladder(min, max, max_tick_count),
        _ => ticks_in_range(min, max, nice_step(max - min, max_tick_count)),
    };

    values
        .into_iter()
        .map(|price| PriceTick {
            price,
            y: price_to_y(price, surface_height, viewport),
        })
        .collect()
}

/// Index ticks at integer candle positions, spaced by a nice step of at
/// least one candle.
#[must_use]
pub fn time_axis_ticks(
    series: &[Candle],
    viewport: &ViewportState,
    surface_width: f64,
    max_tick_count: usize,
) -> Vec<TimeTick> {
    if max_tick_count == 0 {
        return Vec::new();
    }
    let (start, end) = viewport.visible_index_range();
    let step = nice_step(viewport.visible_count() as f64, max_tick_count)
        .ceil()
        .max(1.0);

    ticks_in_range(start as f64, (end - 1) as f64, step)
        .into_iter()
        .map(|index| TimeTick {
            index,
            x: index_to_x(index, surface_width, viewport),
            time: time_at_index(series, viewport.granularity(), index),
        })
        .collect()
}

fn log_ladder(min: f64, max: f64, max_tick_count: usize) -> TickValues {
    let min_exp = min.log10().floor() as i32;
    let max_exp = max.log10().ceil() as i32;

    let mut ladder = TickValues::new();
    let mut decades = TickValues::new();
    for exp in min_exp..=max_exp {
        if ladder.len() >= TICK_ITERATION_CAP {
            break;
        }
        let decade = 10f64.powi(exp);
        for multiplier in [1.0, 2.0, 5.0] {
            let candidate = decade * multiplier;
            if candidate >= min && candidate <= max {
                ladder.push(candidate);
                if multiplier == 1.0 {
                    decades.push(candidate);
                }
            }
        }
    }

    if ladder.len() <= max_tick_count {
        return ladder;
    }
    if decades.len() <= max_tick_count {
        return decades;
    }
    let stride = decades.len().div_ceil(max_tick_count);
    decades.into_iter().step_by(stride).collect()
}
