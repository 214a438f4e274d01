pub mod candle;
pub mod candlestick;
pub mod primitives;
pub mod scale;
pub mod ticks;
pub mod transform;
pub mod types;
pub mod viewport;

pub use candle::{Candle, tail_candle_mut};
pub use candlestick::{CandleGeometry, project_visible_candles};
pub use scale::{MIN_LOG_VALUE, ScaleMode};
pub use ticks::{
    MIN_STEP, PriceTick, TICK_ITERATION_CAP, TimeTick, nice_step, price_axis_ticks,
    ticks_in_range, time_axis_ticks,
};
pub use transform::{
    CandleBand, candle_at_x, candle_band, index_at_time, index_to_x, price_to_y, time_at_index,
    x_to_index, y_to_price,
};
pub use types::SurfaceSize;
pub use viewport::{
    DefaultViewTuning, GuardedPriceRange, PriceSpanLimits, ViewportState, guard_price_range,
};
