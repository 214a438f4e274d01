use std::time::Instant;

use tracing::{debug, trace};

use crate::core::{MIN_LOG_VALUE, ScaleMode};
use crate::error::ViewportIssue;
use crate::interaction::{DragMode, DragSession, PointerRegion};
use crate::render::Renderer;

use super::drag::drag_update;
use super::zoom::zoom_at_cursor;
use super::{ChartEngine, RedrawTopic, WheelDirection, WheelEvent};

impl<R: Renderer> ChartEngine<R> {
    /// Cursor-anchored wheel zoom. Returns `true` when the view changed.
    pub fn on_wheel(&mut self, event: WheelEvent) -> bool {
        let Some(direction) = WheelDirection::from_wheel_delta(event.delta_y) else {
            return false;
        };
        let surface = self.surface();
        let next = zoom_at_cursor(
            &self.viewport,
            event.cursor_x,
            event.cursor_y,
            surface,
            direction,
            self.series.len(),
            self.config.viewport_limits(),
        );
        self.replace_viewport(next)
    }

    /// Starts a drag session over `region` at `(x, y)`.
    ///
    /// A session already in progress is replaced.
    pub fn on_pointer_down(&mut self, region: PointerRegion, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            debug!(x, y, issue = ViewportIssue::InvalidInput.as_str(), "pointer down ignored");
            return false;
        }
        let mode = DragMode::from(region);
        self.interaction
            .begin_drag(DragSession::new(mode, x, y, self.viewport));
        self.interaction.set_cursor(x, y);
        debug!(?mode, x, y, "drag session started");
        true
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.on_pointer_move_at(x, y, Instant::now())
    }

    /// Pointer move with an explicit clock, for hosts with their own frame
    /// time and for tests.
    ///
    /// Returns `true` only when an active drag session recomputed the view.
    /// Moves arriving inside the throttle interval are dropped.
    pub fn on_pointer_move_at(&mut self, x: f64, y: f64, now: Instant) -> bool {
        if x.is_finite() && y.is_finite() {
            self.interaction.set_cursor(x, y);
        }
        let Some(session) = self.interaction.session().copied() else {
            return false;
        };
        // Rejected moves must not use up the throttle slot.
        let surface = self.surface();
        if !surface.is_valid() {
            debug!(?surface, issue = ViewportIssue::StaleSession.as_str(), "drag move ignored");
            return false;
        }
        if !x.is_finite() || !y.is_finite() {
            debug!(x, y, issue = ViewportIssue::InvalidInput.as_str(), "drag move ignored");
            return false;
        }
        if !self.interaction.try_acquire_update(now) {
            trace!(x, y, "drag move throttled");
            return false;
        }

        let Some(update) = drag_update(
            &session,
            x,
            y,
            surface,
            self.series.len(),
            self.config.viewport_limits(),
        ) else {
            return false;
        };
        let changed = update.apply_to(&mut self.viewport);
        if changed {
            self.redraw.request(RedrawTopic::Viewport);
        }
        changed
    }

    /// Ends the drag session, keeping the last computed view.
    pub fn on_pointer_up(&mut self) -> bool {
        let ended = self.interaction.end_drag();
        if let Some(session) = ended {
            debug!(mode = ?session.mode(), "drag session ended");
        }
        ended.is_some()
    }

    /// Pointer left the window: ends any drag and hides the cursor.
    pub fn on_pointer_leave(&mut self) -> bool {
        self.interaction.clear_cursor();
        self.on_pointer_up()
    }

    /// Resets to the default view for the current series.
    pub fn on_double_click(&mut self) -> bool {
        self.interaction.end_drag();
        let changed = self.rebuild_default_view();
        debug!(changed, "view reset");
        changed
    }

    /// Switches between linear and logarithmic mapping.
    pub fn on_scale_mode_change(&mut self, mode: ScaleMode) -> bool {
        if mode == self.viewport.scale_mode() {
            return false;
        }
        // A session snapshot in the old mode would write back incompatible ranges.
        self.interaction.end_drag();
        let mut next = self.viewport;
        let floored =
            mode == ScaleMode::Logarithmic && next.min_visible_price() < MIN_LOG_VALUE;
        next.set_scale_mode(mode, self.config.span_limits());
        // A floored minimum would span many empty decades below the data.
        if floored
            && next.fit_price_to_visible(
                &self.series,
                self.config.price_padding_ratio,
                self.config.span_limits(),
            )
        {
            debug!(
                min = next.min_visible_price(),
                max = next.max_visible_price(),
                "log price range refit to visible candles"
            );
        }
        debug!(?mode, "scale mode change");
        self.replace_viewport(next)
    }
}
