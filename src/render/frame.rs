use serde::{Deserialize, Serialize};

use crate::api::RedrawTopics;
use crate::core::{CandleGeometry, PriceTick, SurfaceSize, TimeTick, ViewportState};
use crate::error::{ChartError, ChartResult};

/// Everything an external painter needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: ViewportState,
    pub surface: SurfaceSize,
    /// Topics that triggered this frame.
    pub topics: RedrawTopics,
    pub candles: Vec<CandleGeometry>,
    pub price_ticks: Vec<PriceTick>,
    pub time_ticks: Vec<TimeTick>,
    pub last_price_y: Option<f64>,
}

impl RenderFrame {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.surface.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.surface.width,
                height: self.surface.height,
            });
        }

        let candle_values = self.candles.iter().flat_map(|c| {
            [
                c.center_x,
                c.body_left,
                c.body_right,
                c.body_top,
                c.body_bottom,
                c.wick_top,
                c.wick_bottom,
            ]
        });
        let tick_values = self
            .price_ticks
            .iter()
            .flat_map(|t| [t.price, t.y])
            .chain(self.time_ticks.iter().flat_map(|t| [t.index, t.x]));
        if candle_values
            .chain(tick_values)
            .chain(self.last_price_y)
            .any(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "render frame geometry must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty() && self.price_ticks.is_empty() && self.time_ticks.is_empty()
    }
}
