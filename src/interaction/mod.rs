use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::ViewportState;

/// Hit region a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerRegion {
    /// Candle plot area: drag pans both axes.
    Plot,
    /// Price-axis label strip: drag rescales the price range.
    PriceAxis,
    /// Time-axis label strip: drag rescales the visible candle count.
    TimeAxis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragMode {
    Pan,
    ScaleVertical,
    ScaleHorizontal,
}

impl From<PointerRegion> for DragMode {
    fn from(region: PointerRegion) -> Self {
        match region {
            PointerRegion::Plot => Self::Pan,
            PointerRegion::PriceAxis => Self::ScaleVertical,
            PointerRegion::TimeAxis => Self::ScaleHorizontal,
        }
    }
}

/// Immutable snapshot taken at pointer-down.
///
/// Every move is computed from `origin` and `snapshot` only, so replaying a
/// delta gives the same viewport no matter how many moves came before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    mode: DragMode,
    origin_x: f64,
    origin_y: f64,
    snapshot: ViewportState,
}

impl DragSession {
    #[must_use]
    pub fn new(mode: DragMode, origin_x: f64, origin_y: f64, snapshot: ViewportState) -> Self {
        Self {
            mode,
            origin_x,
            origin_y,
            snapshot,
        }
    }

    #[must_use]
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    #[must_use]
    pub fn snapshot(&self) -> &ViewportState {
        &self.snapshot
    }

    /// Pointer displacement from the drag origin.
    #[must_use]
    pub fn delta(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.origin_x, y - self.origin_y)
    }
}

/// Rate limiter for pointer-move recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateThrottle {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl UpdateThrottle {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Accepts `now` when at least `min_interval` has passed since the last
    /// accepted instant. Instants older than the last accepted one are
    /// rejected.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let accepted = match self.last_accepted {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.min_interval),
        };
        if accepted {
            self.last_accepted = Some(now);
        }
        accepted
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Live pointer state owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    session: Option<DragSession>,
    throttle: UpdateThrottle,
    cursor: Option<(f64, f64)>,
}

impl InteractionState {
    #[must_use]
    pub fn new(throttle_interval: Duration) -> Self {
        Self {
            session: None,
            throttle: UpdateThrottle::new(throttle_interval),
            cursor: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.session.map(|session| session.mode())
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn begin_drag(&mut self, session: DragSession) {
        self.session = Some(session);
        self.throttle.reset();
    }

    /// Ends the active session, returning it. The viewport is left as the
    /// last accepted move computed it.
    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    pub fn try_acquire_update(&mut self, now: Instant) -> bool {
        self.throttle.try_acquire(now)
    }

    pub fn set_throttle_interval(&mut self, interval: Duration) {
        self.throttle = UpdateThrottle::new(interval);
    }
}
