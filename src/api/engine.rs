use tracing::{debug, trace};

use crate::core::{
    Candle, ScaleMode, SurfaceSize, ViewportState, price_axis_ticks, price_to_y,
    project_visible_candles, time_axis_ticks,
};
use crate::error::{ChartError, ChartResult, ViewportIssue};
use crate::interaction::InteractionState;
use crate::render::{RenderFrame, Renderer};

use super::{ChartViewConfig, RedrawQueue, RedrawTopic, RedrawTopics};

/// Main facade consumed by host applications.
///
/// Owns the viewport, the candle series supplied by the data layer, the
/// drag session and the pending redraw set. Every mutation goes through the
/// event handlers on this type, one event at a time, and every handler
/// reports whether it changed anything instead of failing.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartViewConfig,
    pub(super) viewport: ViewportState,
    pub(super) series: Vec<Candle>,
    pub(super) instrument_id: String,
    pub(super) interaction: InteractionState,
    pub(super) redraw: RedrawQueue,
}

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine with an empty series and the default view.
    pub fn new(
        renderer: R,
        config: ChartViewConfig,
        instrument_id: impl Into<String>,
        granularity: i64,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        if granularity <= 0 {
            return Err(ChartError::InvalidData(
                "granularity must be > 0".to_owned(),
            ));
        }
        let viewport = ViewportState::default_for_series(
            &[],
            granularity,
            ScaleMode::default(),
            config.default_view_tuning(),
        )?;
        let instrument_id = instrument_id.into();
        debug!(%instrument_id, granularity, "chart engine created");

        let mut redraw = RedrawQueue::default();
        redraw.request(RedrawTopic::Viewport);
        Ok(Self {
            renderer,
            config,
            viewport,
            series: Vec::new(),
            instrument_id,
            interaction: InteractionState::new(config.pointer_throttle()),
            redraw,
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartViewConfig {
        self.config
    }

    /// Replaces tuning; the current view is kept.
    pub fn set_config(&mut self, config: ChartViewConfig) -> ChartResult<()> {
        let config = config.validate()?;
        self.interaction
            .set_throttle_interval(config.pointer_throttle());
        self.config = config;
        self.redraw.request(RedrawTopic::Viewport);
        Ok(())
    }

    /// Read-only snapshot of the current view.
    #[must_use]
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    #[must_use]
    pub fn series(&self) -> &[Candle] {
        &self.series
    }

    #[must_use]
    pub fn tail_candle(&self) -> Option<&Candle> {
        self.series.last()
    }

    #[must_use]
    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Current surface geometry, asked from the renderer every time.
    #[must_use]
    pub fn surface(&self) -> SurfaceSize {
        self.renderer.surface_size()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.redraw.is_pending()
    }

    /// Drains the coalesced redraw request, if any.
    pub fn take_pending_redraw(&mut self) -> Option<RedrawTopics> {
        self.redraw.take()
    }

    /// Builds the frame for the current state without touching the queue.
    #[must_use]
    pub fn build_frame(&self, topics: RedrawTopics) -> RenderFrame {
        let surface = self.surface();
        let (start, end) = self.viewport.visible_index_range();
        let len = i64::try_from(self.series.len()).unwrap_or(i64::MAX);
        if start < 0 || end > len {
            trace!(
                start,
                end,
                len,
                issue = ViewportIssue::OutOfBoundsIndex.as_str(),
                "view extends past series, blank slots left empty"
            );
        }
        let candles = project_visible_candles(
            &self.series,
            &self.viewport,
            surface,
            self.config.body_width_ratio,
        );
        let price_ticks = price_axis_ticks(
            &self.viewport,
            surface.height,
            self.config.max_price_ticks,
        );
        let time_ticks = time_axis_ticks(
            &self.series,
            &self.viewport,
            surface.width,
            self.config.max_time_ticks,
        );
        let last_price_y = self
            .viewport
            .last_tick_price()
            .map(|price| price_to_y(price, surface.height, &self.viewport));

        RenderFrame {
            viewport: self.viewport,
            surface,
            topics,
            candles,
            price_ticks,
            time_ticks,
            last_price_y,
        }
    }

    /// Renders one frame if a redraw is pending.
    ///
    /// Returns `Ok(false)` without calling the renderer when nothing changed
    /// or the surface currently has no area (the request stays pending).
    pub fn render(&mut self) -> ChartResult<bool> {
        if !self.redraw.is_pending() {
            return Ok(false);
        }
        if !self.surface().is_valid() {
            debug!("render deferred: surface has no area");
            return Ok(false);
        }
        let Some(topics) = self.redraw.take() else {
            return Ok(false);
        };
        let frame = self.build_frame(topics);
        self.renderer.render(&frame)?;
        Ok(true)
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        crate::core::price_to_y(price, self.surface().height, &self.viewport)
    }

    pub fn y_to_price(&self, pixel_y: f64) -> f64 {
        crate::core::y_to_price(pixel_y, self.surface().height, &self.viewport)
    }

    pub fn index_to_x(&self, index: f64) -> f64 {
        crate::core::index_to_x(index, self.surface().width, &self.viewport)
    }

    pub fn x_to_index(&self, pixel_x: f64) -> f64 {
        crate::core::x_to_index(pixel_x, self.surface().width, &self.viewport)
    }

    /// Candle under a horizontal pixel, `None` for blank slots.
    pub fn candle_at_x(&self, pixel_x: f64) -> Option<&Candle> {
        let index = crate::core::candle_at_x(
            self.series.len(),
            pixel_x,
            self.surface().width,
            &self.viewport,
        )?;
        self.series.get(index)
    }

    pub(super) fn replace_viewport(&mut self, next: ViewportState) -> bool {
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.redraw.request(RedrawTopic::Viewport);
        true
    }

    /// Rebuilds the default view for the current series, keeping the last
    /// tick price.
    pub(super) fn rebuild_default_view(&mut self) -> bool {
        let rebuilt = ViewportState::default_for_series(
            &self.series,
            self.viewport.granularity(),
            self.viewport.scale_mode(),
            self.config.default_view_tuning(),
        );
        match rebuilt {
            Ok(mut next) => {
                if let Some(price) = self.viewport.last_tick_price() {
                    next.set_last_tick_price(price);
                }
                self.replace_viewport(next)
            }
            Err(err) => {
                debug!(error = %err, "default view rebuild skipped");
                false
            }
        }
    }
}
