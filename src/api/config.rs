use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{DefaultViewTuning, PriceSpanLimits};
use crate::error::{ChartError, ChartResult};

pub const CHART_VIEW_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Public engine tuning.
///
/// Serializable so hosts can persist and reload it; every field has a serde
/// default so partial JSON documents stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartViewConfig {
    /// Fractional change of visible candle count per wheel notch.
    #[serde(default = "default_zoom_step")]
    pub zoom_step_x: f64,
    /// Fractional change of visible price span per wheel notch.
    #[serde(default = "default_zoom_step")]
    pub zoom_step_y: f64,
    #[serde(default = "default_min_visible_candles")]
    pub min_visible_candles: usize,
    /// Visible candle count may grow to `series_len * max_visible_multiplier`.
    #[serde(default = "default_max_visible_multiplier")]
    pub max_visible_multiplier: usize,
    #[serde(default = "default_visible_candles")]
    pub default_visible_candles: usize,
    #[serde(default = "default_price_padding_ratio")]
    pub price_padding_ratio: f64,
    #[serde(default = "default_min_price_range_span")]
    pub min_price_range_span: f64,
    #[serde(default = "default_min_log_range_ratio")]
    pub min_log_range_ratio: f64,
    /// Exponent multiplier for axis-drag rescale: `2^(delta / extent * s)`.
    #[serde(default = "default_axis_scale_sensitivity")]
    pub axis_scale_sensitivity: f64,
    #[serde(default = "default_pointer_throttle_ms")]
    pub pointer_throttle_ms: u64,
    #[serde(default = "default_max_ticks")]
    pub max_price_ticks: usize,
    #[serde(default = "default_max_ticks")]
    pub max_time_ticks: usize,
    /// Candle body width as a share of its slot.
    #[serde(default = "default_body_width_ratio")]
    pub body_width_ratio: f64,
}

impl Default for ChartViewConfig {
    fn default() -> Self {
        Self {
            zoom_step_x: default_zoom_step(),
            zoom_step_y: default_zoom_step(),
            min_visible_candles: default_min_visible_candles(),
            max_visible_multiplier: default_max_visible_multiplier(),
            default_visible_candles: default_visible_candles(),
            price_padding_ratio: default_price_padding_ratio(),
            min_price_range_span: default_min_price_range_span(),
            min_log_range_ratio: default_min_log_range_ratio(),
            axis_scale_sensitivity: default_axis_scale_sensitivity(),
            pointer_throttle_ms: default_pointer_throttle_ms(),
            max_price_ticks: default_max_ticks(),
            max_time_ticks: default_max_ticks(),
            body_width_ratio: default_body_width_ratio(),
        }
    }
}

impl ChartViewConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_zoom_steps(mut self, zoom_step_x: f64, zoom_step_y: f64) -> Self {
        self.zoom_step_x = zoom_step_x;
        self.zoom_step_y = zoom_step_y;
        self
    }

    #[must_use]
    pub fn with_visible_candle_limits(
        mut self,
        min_visible_candles: usize,
        max_visible_multiplier: usize,
    ) -> Self {
        self.min_visible_candles = min_visible_candles;
        self.max_visible_multiplier = max_visible_multiplier;
        self
    }

    #[must_use]
    pub fn with_default_visible_candles(mut self, count: usize) -> Self {
        self.default_visible_candles = count;
        self
    }

    #[must_use]
    pub fn with_price_padding_ratio(mut self, ratio: f64) -> Self {
        self.price_padding_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_axis_scale_sensitivity(mut self, sensitivity: f64) -> Self {
        self.axis_scale_sensitivity = sensitivity;
        self
    }

    #[must_use]
    pub fn with_pointer_throttle_ms(mut self, millis: u64) -> Self {
        self.pointer_throttle_ms = millis;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, step) in [
            ("zoom_step_x", self.zoom_step_x),
            ("zoom_step_y", self.zoom_step_y),
        ] {
            if !step.is_finite() || step <= 0.0 || step >= 1.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and in (0, 1)"
                )));
            }
        }
        if self.min_visible_candles == 0 {
            return Err(ChartError::InvalidConfig(
                "min_visible_candles must be > 0".to_owned(),
            ));
        }
        if self.max_visible_multiplier == 0 {
            return Err(ChartError::InvalidConfig(
                "max_visible_multiplier must be > 0".to_owned(),
            ));
        }
        if self.default_visible_candles == 0 {
            return Err(ChartError::InvalidConfig(
                "default_visible_candles must be > 0".to_owned(),
            ));
        }
        if !self.price_padding_ratio.is_finite() || self.price_padding_ratio < 0.0 {
            return Err(ChartError::InvalidConfig(
                "price_padding_ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.min_price_range_span.is_finite() || self.min_price_range_span <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "min_price_range_span must be finite and > 0".to_owned(),
            ));
        }
        if !self.min_log_range_ratio.is_finite() || self.min_log_range_ratio <= 1.0 {
            return Err(ChartError::InvalidConfig(
                "min_log_range_ratio must be finite and > 1".to_owned(),
            ));
        }
        if !self.axis_scale_sensitivity.is_finite() || self.axis_scale_sensitivity <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "axis_scale_sensitivity must be finite and > 0".to_owned(),
            ));
        }
        if !self.body_width_ratio.is_finite()
            || self.body_width_ratio <= 0.0
            || self.body_width_ratio > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "body_width_ratio must be in (0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn span_limits(&self) -> PriceSpanLimits {
        PriceSpanLimits {
            min_linear_span: self.min_price_range_span,
            min_log_ratio: self.min_log_range_ratio,
        }
    }

    #[must_use]
    pub fn default_view_tuning(&self) -> DefaultViewTuning {
        DefaultViewTuning {
            visible_candles: self.default_visible_candles,
            padding_ratio: self.price_padding_ratio,
            span_limits: self.span_limits(),
        }
    }

    #[must_use]
    pub fn viewport_limits(&self) -> ViewportLimits {
        ViewportLimits {
            zoom_step_x: self.zoom_step_x,
            zoom_step_y: self.zoom_step_y,
            axis_scale_sensitivity: self.axis_scale_sensitivity,
            min_visible_candles: i64::try_from(self.min_visible_candles).unwrap_or(i64::MAX),
            max_visible_multiplier: i64::try_from(self.max_visible_multiplier)
                .unwrap_or(i64::MAX),
            span_limits: self.span_limits(),
        }
    }

    #[must_use]
    pub fn pointer_throttle(&self) -> Duration {
        Duration::from_millis(self.pointer_throttle_ms)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        let payload = ChartViewConfigJsonContractV1 {
            schema_version: CHART_VIEW_CONFIG_JSON_SCHEMA_V1,
            config: *self,
        };
        serde_json::to_string_pretty(&payload)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Parses either a bare config object or a versioned contract payload,
    /// then validates it.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        if let Ok(payload) = serde_json::from_str::<ChartViewConfigJsonContractV1>(input) {
            if payload.schema_version != CHART_VIEW_CONFIG_JSON_SCHEMA_V1 {
                return Err(ChartError::InvalidConfig(format!(
                    "unsupported config schema version: {}",
                    payload.schema_version
                )));
            }
            return payload.config.validate();
        }
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config json: {e}")))?;
        config.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ChartViewConfigJsonContractV1 {
    schema_version: u32,
    config: ChartViewConfig,
}

/// Limits shared by the zoom and drag controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportLimits {
    pub zoom_step_x: f64,
    pub zoom_step_y: f64,
    pub axis_scale_sensitivity: f64,
    pub min_visible_candles: i64,
    pub max_visible_multiplier: i64,
    pub span_limits: PriceSpanLimits,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        ChartViewConfig::default().viewport_limits()
    }
}

impl ViewportLimits {
    /// Clamps a candle count to `[min_visible_candles, series_len * multiplier]`.
    #[must_use]
    pub fn clamp_visible_count(&self, count: i64, series_len: i64) -> i64 {
        let min = self.min_visible_candles.max(1);
        let max = series_len
            .saturating_mul(self.max_visible_multiplier)
            .max(min);
        count.clamp(min, max)
    }
}

fn default_zoom_step() -> f64 {
    0.1
}

fn default_min_visible_candles() -> usize {
    5
}

fn default_max_visible_multiplier() -> usize {
    5
}

fn default_visible_candles() -> usize {
    100
}

fn default_price_padding_ratio() -> f64 {
    0.1
}

fn default_min_price_range_span() -> f64 {
    1e-6
}

fn default_min_log_range_ratio() -> f64 {
    1.001
}

fn default_axis_scale_sensitivity() -> f64 {
    2.0
}

fn default_pointer_throttle_ms() -> u64 {
    16
}

fn default_max_ticks() -> usize {
    8
}

fn default_body_width_ratio() -> f64 {
    0.7
}
