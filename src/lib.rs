//! chart-viewport: viewport and coordinate engine for candlestick charts.
//!
//! The crate owns the "what is visible" model of an interactive OHLCV chart:
//! pixel <-> price/index transforms in linear and logarithmic modes,
//! cursor-anchored wheel zoom, drag pan/rescale sessions, nice-step axis
//! ticks and the live tick-to-candle merge. Painting, data fetching and
//! transport stay with the host.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartViewConfig};
pub use error::{ChartError, ChartResult, ViewportIssue};
