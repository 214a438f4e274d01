use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::Candle;
use crate::error::ViewportIssue;
use crate::render::Renderer;

use super::aggregator::apply_tick;
use super::{ChartEngine, RedrawTopic, TickEvent};

/// What a tick did to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TickOutcome {
    /// Instrument matched and the tick was consumed.
    pub accepted: bool,
    /// The tail candle changed.
    pub candle_updated: bool,
    /// The live price indicator moved.
    pub last_price_changed: bool,
}

impl TickOutcome {
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        self.candle_updated || self.last_price_changed
    }
}

impl<R: Renderer> ChartEngine<R> {
    /// Replaces the series wholesale and resets to the default view.
    ///
    /// Candles with non-finite fields, inconsistent low/high or times that
    /// do not strictly increase are dropped. Returns how many were kept.
    pub fn set_series(&mut self, candles: Vec<Candle>) -> usize {
        let original_count = candles.len();
        let series = canonicalize_series(candles);
        if series.len() != original_count {
            warn!(
                original_count,
                kept = series.len(),
                issue = ViewportIssue::InvalidInput.as_str(),
                "dropped malformed candles from series"
            );
        }
        debug!(count = series.len(), "set series");

        self.series = series;
        self.interaction.end_drag();
        self.redraw.request(RedrawTopic::Series);
        self.rebuild_default_view();
        self.series.len()
    }

    /// Appends a new bucket opened by the data layer.
    ///
    /// The candle must be well-formed and strictly newer than the tail.
    pub fn push_candle(&mut self, candle: Candle) -> bool {
        let newer = self.series.last().is_none_or(|tail| candle.time > tail.time);
        if !is_well_formed(candle) || !newer {
            warn!(
                time = candle.time,
                issue = ViewportIssue::InvalidInput.as_str(),
                "rejected appended candle"
            );
            return false;
        }
        self.series.push(candle);
        trace!(count = self.series.len(), "append candle");
        self.redraw.request(RedrawTopic::Series);
        true
    }

    /// Switches the instrument whose ticks are consumed.
    ///
    /// The previous instrument's last tick price no longer applies, so the
    /// live price indicator is cleared until the next matching tick.
    pub fn set_instrument(&mut self, instrument_id: impl Into<String>) {
        let instrument_id = instrument_id.into();
        if instrument_id == self.instrument_id {
            return;
        }
        debug!(from = %self.instrument_id, to = %instrument_id, "switch instrument");
        self.instrument_id = instrument_id;
        if self.viewport.last_tick_price().is_some() {
            self.viewport.clear_last_tick_price();
            self.redraw.request(RedrawTopic::LastPrice);
        }
    }

    /// Feeds one stream message through the live-candle aggregator.
    ///
    /// Ticks for other instruments are ignored.
    pub fn on_tick(&mut self, event: &TickEvent) -> TickOutcome {
        if event.instrument_id != self.instrument_id {
            trace!(
                instrument_id = %event.instrument_id,
                active = %self.instrument_id,
                "tick for other instrument ignored"
            );
            return TickOutcome::default();
        }

        let previous_price = self.viewport.last_tick_price();
        let granularity = self.viewport.granularity();
        let candle_updated = apply_tick(
            event.price,
            event.timestamp,
            &mut self.series,
            granularity,
            &mut self.viewport,
        );
        let last_price_changed = self.viewport.last_tick_price() != previous_price;

        if candle_updated {
            self.redraw.request(RedrawTopic::Series);
        }
        if last_price_changed {
            self.redraw.request(RedrawTopic::LastPrice);
        }
        TickOutcome {
            accepted: true,
            candle_updated,
            last_price_changed,
        }
    }

    /// Switches bucket size.
    ///
    /// Bars of the old size cannot absorb ticks of the new one, so the series
    /// is cleared until the data layer supplies a new one via `set_series`.
    pub fn on_granularity_change(&mut self, granularity: i64) -> bool {
        if granularity <= 0 {
            warn!(
                granularity,
                issue = ViewportIssue::InvalidInput.as_str(),
                "granularity change rejected"
            );
            return false;
        }
        if granularity == self.viewport.granularity() {
            return false;
        }
        debug!(
            from = self.viewport.granularity(),
            to = granularity,
            "granularity change"
        );

        self.viewport.set_granularity(granularity);
        self.series.clear();
        self.interaction.end_drag();
        self.redraw.request(RedrawTopic::Series);
        self.rebuild_default_view();
        true
    }
}

fn is_well_formed(candle: Candle) -> bool {
    candle.is_finite() && candle.is_consistent()
}

fn canonicalize_series(candles: Vec<Candle>) -> Vec<Candle> {
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        if !is_well_formed(candle) {
            continue;
        }
        if out.last().is_some_and(|tail| candle.time <= tail.time) {
            continue;
        }
        out.push(candle);
    }
    out
}
