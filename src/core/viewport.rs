use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Candle, MIN_LOG_VALUE, ScaleMode};
use crate::error::{ChartError, ChartResult};

/// Tuning used when a default view is rebuilt from a fresh series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultViewTuning {
    /// How many trailing candles the default view shows.
    pub visible_candles: usize,
    /// Padding added above and below the observed low/high, as a ratio of
    /// the working-space span.
    pub padding_ratio: f64,
    pub span_limits: PriceSpanLimits,
}

impl Default for DefaultViewTuning {
    fn default() -> Self {
        Self {
            visible_candles: 100,
            padding_ratio: 0.10,
            span_limits: PriceSpanLimits::default(),
        }
    }
}

/// Minimum vertical span per scale mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSpanLimits {
    /// Linear mode: smallest allowed `max - min`.
    pub min_linear_span: f64,
    /// Log mode: smallest allowed `max / min`.
    pub min_log_ratio: f64,
}

impl Default for PriceSpanLimits {
    fn default() -> Self {
        Self {
            min_linear_span: 1e-6,
            min_log_ratio: 1.001,
        }
    }
}

/// Result of pushing a candidate price range through [`guard_price_range`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardedPriceRange {
    pub min: f64,
    pub max: f64,
    /// `true` when the candidate was degenerate and had to be re-centered
    /// or clamped to the minimum span.
    pub recovered: bool,
}

/// Visible price/time window shared by the controllers and the renderer.
///
/// Fields are private: only the zoom, drag and tick paths in this crate
/// write them, and deserialization re-runs [`ViewportState::new`], so the
/// invariants below hold at every observation point.
///
/// - `visible_end_index > visible_start_index` (either may lie outside the series)
/// - `max_visible_price > min_visible_price`
/// - linear: `min_visible_price >= 0`; log: both `>= MIN_LOG_VALUE`
/// - `granularity > 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportStateRepr")]
pub struct ViewportState {
    visible_start_index: i64,
    visible_end_index: i64,
    min_visible_price: f64,
    max_visible_price: f64,
    scale_mode: ScaleMode,
    granularity: i64,
    #[serde(default)]
    last_tick_price: Option<f64>,
}

/// Wire shape of [`ViewportState`]; deserialization goes through
/// [`ViewportState::new`] so persisted views are re-validated.
#[derive(Deserialize)]
struct ViewportStateRepr {
    visible_start_index: i64,
    visible_end_index: i64,
    min_visible_price: f64,
    max_visible_price: f64,
    scale_mode: ScaleMode,
    granularity: i64,
    #[serde(default)]
    last_tick_price: Option<f64>,
}

impl TryFrom<ViewportStateRepr> for ViewportState {
    type Error = ChartError;

    fn try_from(repr: ViewportStateRepr) -> ChartResult<Self> {
        let mut state = Self::new(
            repr.visible_start_index,
            repr.visible_end_index,
            repr.min_visible_price,
            repr.max_visible_price,
            repr.scale_mode,
            repr.granularity,
        )?;
        state.last_tick_price = repr.last_tick_price.filter(|price| price.is_finite());
        Ok(state)
    }
}

impl ViewportState {
    /// Creates a state from explicit ranges, rejecting anything that breaks
    /// the invariants instead of repairing it.
    pub fn new(
        visible_start_index: i64,
        visible_end_index: i64,
        min_visible_price: f64,
        max_visible_price: f64,
        scale_mode: ScaleMode,
        granularity: i64,
    ) -> ChartResult<Self> {
        if visible_end_index <= visible_start_index {
            return Err(ChartError::InvalidData(
                "visible end index must be > start index".to_owned(),
            ));
        }
        if !min_visible_price.is_finite() || !max_visible_price.is_finite() {
            return Err(ChartError::InvalidData(
                "visible price range must be finite".to_owned(),
            ));
        }
        if max_visible_price <= min_visible_price {
            return Err(ChartError::InvalidData(
                "max visible price must be > min visible price".to_owned(),
            ));
        }
        if min_visible_price < scale_mode.price_floor() {
            return Err(ChartError::InvalidData(format!(
                "min visible price must be >= {} in {scale_mode:?} mode",
                scale_mode.price_floor()
            )));
        }
        if granularity <= 0 {
            return Err(ChartError::InvalidData(
                "granularity must be > 0".to_owned(),
            ));
        }

        Ok(Self {
            visible_start_index,
            visible_end_index,
            min_visible_price,
            max_visible_price,
            scale_mode,
            granularity,
            last_tick_price: None,
        })
    }

    /// Builds the default view for a freshly loaded series: the trailing
    /// `visible_candles` bars, price range = their low/high envelope padded
    /// in working space.
    pub fn default_for_series(
        series: &[Candle],
        granularity: i64,
        scale_mode: ScaleMode,
        tuning: DefaultViewTuning,
    ) -> ChartResult<Self> {
        if granularity <= 0 {
            return Err(ChartError::InvalidData(
                "granularity must be > 0".to_owned(),
            ));
        }
        let visible_candles = i64::try_from(tuning.visible_candles.max(1)).unwrap_or(i64::MAX);
        let len = i64::try_from(series.len()).unwrap_or(i64::MAX);
        let (start, end) = if len == 0 {
            (0, visible_candles)
        } else {
            ((len - visible_candles).max(0), len)
        };

        let (min, max) = visible_envelope(series, start, end)
            .map(|(low, high)| pad_in_working_space(low, high, scale_mode, tuning.padding_ratio))
            .unwrap_or((0.0, 1.0));
        let guarded = guard_price_range(min, max, scale_mode, tuning.span_limits)
            .unwrap_or(GuardedPriceRange {
                min: scale_mode.price_floor().max(MIN_LOG_VALUE),
                max: 1.0,
                recovered: true,
            });

        trace!(
            start,
            end,
            min = guarded.min,
            max = guarded.max,
            ?scale_mode,
            "built default viewport"
        );

        Ok(Self {
            visible_start_index: start,
            visible_end_index: end,
            min_visible_price: guarded.min,
            max_visible_price: guarded.max,
            scale_mode,
            granularity,
            last_tick_price: None,
        })
    }

    #[must_use]
    pub fn visible_start_index(&self) -> i64 {
        self.visible_start_index
    }

    #[must_use]
    pub fn visible_end_index(&self) -> i64 {
        self.visible_end_index
    }

    /// Half-open `[start, end)` index range.
    #[must_use]
    pub fn visible_index_range(&self) -> (i64, i64) {
        (self.visible_start_index, self.visible_end_index)
    }

    #[must_use]
    pub fn visible_count(&self) -> i64 {
        self.visible_end_index - self.visible_start_index
    }

    #[must_use]
    pub fn min_visible_price(&self) -> f64 {
        self.min_visible_price
    }

    #[must_use]
    pub fn max_visible_price(&self) -> f64 {
        self.max_visible_price
    }

    #[must_use]
    pub fn price_range(&self) -> (f64, f64) {
        (self.min_visible_price, self.max_visible_price)
    }

    /// Price range in the active mode's working space.
    #[must_use]
    pub fn working_price_range(&self) -> (f64, f64) {
        self.scale_mode
            .working_range(self.min_visible_price, self.max_visible_price)
    }

    #[must_use]
    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    #[must_use]
    pub fn granularity(&self) -> i64 {
        self.granularity
    }

    #[must_use]
    pub fn last_tick_price(&self) -> Option<f64> {
        self.last_tick_price
    }

    /// Horizontal pixels occupied by one candle slot.
    #[must_use]
    pub fn pixels_per_candle(&self, surface_width: f64) -> f64 {
        surface_width / self.visible_count() as f64
    }

    pub(crate) fn set_index_range(&mut self, start: i64, end: i64) -> bool {
        if end <= start {
            return false;
        }
        self.visible_start_index = start;
        self.visible_end_index = end;
        true
    }

    /// Writes an already-guarded price range.
    pub(crate) fn set_guarded_price_range(&mut self, range: GuardedPriceRange) {
        self.min_visible_price = range.min;
        self.max_visible_price = range.max;
    }

    pub(crate) fn set_last_tick_price(&mut self, price: f64) {
        self.last_tick_price = Some(price);
    }

    pub(crate) fn clear_last_tick_price(&mut self) {
        self.last_tick_price = None;
    }

    /// Switches scale mode, re-guarding the price range for the new mode.
    pub(crate) fn set_scale_mode(&mut self, mode: ScaleMode, limits: PriceSpanLimits) {
        self.scale_mode = mode;
        if let Some(range) =
            guard_price_range(self.min_visible_price, self.max_visible_price, mode, limits)
        {
            self.set_guarded_price_range(range);
        }
    }

    /// Refits the price range to the padded low/high envelope of the
    /// visible candles. Returns `false` when no visible candle is usable.
    pub(crate) fn fit_price_to_visible(
        &mut self,
        series: &[Candle],
        padding_ratio: f64,
        limits: PriceSpanLimits,
    ) -> bool {
        let Some((low, high)) =
            visible_envelope(series, self.visible_start_index, self.visible_end_index)
        else {
            return false;
        };
        let (min, max) = pad_in_working_space(low, high, self.scale_mode, padding_ratio);
        match guard_price_range(min, max, self.scale_mode, limits) {
            Some(range) => {
                self.set_guarded_price_range(range);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_granularity(&mut self, granularity: i64) -> bool {
        if granularity <= 0 {
            return false;
        }
        self.granularity = granularity;
        true
    }
}

/// Single recovery path for candidate price ranges.
///
/// Returns `None` for non-finite input so the caller keeps its previous
/// range. Otherwise orders the bounds, applies the mode's floor and widens
/// collapsed spans around their center (arithmetic in linear mode,
/// geometric in log mode).
#[must_use]
pub fn guard_price_range(
    min: f64,
    max: f64,
    mode: ScaleMode,
    limits: PriceSpanLimits,
) -> Option<GuardedPriceRange> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let (mut lo, mut hi) = if min <= max { (min, max) } else { (max, min) };
    let mut recovered = min > max;

    match mode {
        ScaleMode::Linear => {
            let min_span = positive_or(limits.min_linear_span, 1e-6);
            if lo < 0.0 {
                lo = 0.0;
                recovered = true;
            }
            if hi - lo < min_span {
                let center = (lo + hi) / 2.0;
                lo = center - min_span / 2.0;
                hi = center + min_span / 2.0;
                if lo < 0.0 {
                    lo = 0.0;
                    hi = min_span;
                }
                recovered = true;
            }
        }
        ScaleMode::Logarithmic => {
            let min_ratio = if limits.min_log_ratio.is_finite() && limits.min_log_ratio > 1.0 {
                limits.min_log_ratio
            } else {
                1.001
            };
            if lo < MIN_LOG_VALUE {
                lo = MIN_LOG_VALUE;
                recovered = true;
            }
            if hi < MIN_LOG_VALUE {
                hi = MIN_LOG_VALUE;
                recovered = true;
            }
            if hi / lo < min_ratio {
                let center = (lo * hi).sqrt();
                let half_ratio = min_ratio.sqrt();
                lo = center / half_ratio;
                hi = center * half_ratio;
                if lo < MIN_LOG_VALUE {
                    lo = MIN_LOG_VALUE;
                    hi = MIN_LOG_VALUE * min_ratio;
                }
                recovered = true;
            }
        }
    }

    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return None;
    }
    Some(GuardedPriceRange {
        min: lo,
        max: hi,
        recovered,
    })
}

fn visible_envelope(series: &[Candle], start: i64, end: i64) -> Option<(f64, f64)> {
    let from = usize::try_from(start.max(0)).ok()?;
    let to = usize::try_from(end.max(0)).ok()?.min(series.len());
    if from >= to {
        return None;
    }

    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for candle in series[from..to].iter().filter(|c| c.is_finite()) {
        low = low.min(candle.low);
        high = high.max(candle.high);
    }
    (low.is_finite() && high.is_finite()).then_some((low, high))
}

fn pad_in_working_space(low: f64, high: f64, mode: ScaleMode, padding_ratio: f64) -> (f64, f64) {
    let ratio = if padding_ratio.is_finite() && padding_ratio >= 0.0 {
        padding_ratio
    } else {
        0.0
    };
    let (w_low, w_high) = mode.working_range(low, high);
    let pad = (w_high - w_low) * ratio;
    (mode.from_working(w_low - pad), mode.from_working(w_high + pad))
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
