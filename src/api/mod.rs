mod aggregator;
mod config;
mod data_controller;
mod drag;
mod engine;
mod interaction_controller;
mod redraw;
mod zoom;

pub use aggregator::{TickEvent, apply_tick};
pub use config::{CHART_VIEW_CONFIG_JSON_SCHEMA_V1, ChartViewConfig, ViewportLimits};
pub use data_controller::TickOutcome;
pub use drag::{DragUpdate, drag_update};
pub use engine::ChartEngine;
pub use redraw::{RedrawQueue, RedrawTopic, RedrawTopics};
pub use zoom::{WheelDirection, WheelEvent, zoom_at_cursor};
